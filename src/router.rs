use crate::api::{ListingForm, PredictRequest, PredictResponse};
use crate::errors::ServerError;
use crate::responses::{
    error_to_response, html_response, html_status_response, json_error_response, json_response,
};
use crate::responses::ResultResp;
use crate::state::AppState;
use crate::templates;
use astra::Request;
use serde_json::json;
use std::io::Read;
use tracing::{debug, warn};

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    debug!(%method, %path, "request");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => html_response(templates::pages::home_page(&ListingForm::default(), None)),
        ("POST", "/") => submit_form(req, state),

        ("GET", "/health") => json_response(200, &json!({ "status": "ok" })),
        ("POST", "/predict") => Ok(predict(req, state).unwrap_or_else(|err| {
            warn!(error = %err, "prediction request failed");
            json_error_response(err)
        })),

        _ => Err(ServerError::NotFound),
    }
}

fn read_body(req: Request) -> Result<Vec<u8>, ServerError> {
    let mut body = Vec::new();
    req.into_body()
        .reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("could not read request body: {e}")))?;

    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest(format!(
            "request body exceeds {MAX_BODY_BYTES} bytes"
        )));
    }
    Ok(body)
}

/// `POST /predict`: column batch in, one log-price per row out.
fn predict(req: Request, state: &AppState) -> ResultResp {
    let body = read_body(req)?;
    let batch: PredictRequest = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON batch: {e}")))?;

    let records = batch.into_records()?;
    let predictor = state.predictor()?;
    let predictions = predictor.predict(&records)?;

    json_response(200, &PredictResponse { predictions })
}

/// `POST /`: the operator form, answered with a result page. A rejected
/// submission re-renders the form with the reason.
fn submit_form(req: Request, state: &AppState) -> ResultResp {
    let form = ListingForm::from_urlencoded(&read_body(req)?);

    let batch = match form.to_request() {
        Ok(batch) => batch,
        Err(ServerError::BadRequest(msg)) => {
            let page = templates::pages::home_page(&form, Some(&msg));
            return html_status_response(400, page);
        }
        Err(other) => return Err(other),
    };

    match predict_one(batch.clone(), state) {
        Ok(log_price) => html_response(templates::pages::result_page(&batch, log_price)),
        Err(err) => {
            warn!(error = %err, "form prediction failed");
            Ok(error_to_response(err))
        }
    }
}

fn predict_one(batch: PredictRequest, state: &AppState) -> Result<f64, ServerError> {
    let records = batch.into_records()?;
    let predictor = state.predictor()?;
    let predictions = predictor.predict(&records)?;
    predictions.first().copied().ok_or(ServerError::InternalError)
}
