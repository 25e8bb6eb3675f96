// responses/errors.rs
use crate::errors::ServerError;
use crate::templates::html_error_response;
use astra::Response;

pub use crate::errors::ResultResp;

/// Convert a ServerError into the HTML error page the form routes show.
pub fn error_to_response(err: ServerError) -> Response {
    html_error_response(err)
}
