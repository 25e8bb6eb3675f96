// templates/pages/result.rs

use crate::api::PredictRequest;
use crate::templates::{card, desktop_layout};
use maud::{html, Markup};

/// One row of the submitted batch, rendered as `column: value` pairs.
fn submitted_rows(req: &PredictRequest) -> Vec<(&'static str, String)> {
    fn first_num(col: &Option<Vec<Option<f64>>>) -> String {
        col.as_ref()
            .and_then(|v| v.first().copied().flatten())
            .map(|n| n.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    }
    fn first_text(col: &Option<Vec<Option<String>>>) -> String {
        col.as_ref()
            .and_then(|v| v.first().cloned().flatten())
            .unwrap_or_else(|| "n/a".to_string())
    }
    let amenities = req
        .amenities
        .as_ref()
        .and_then(|v| v.first())
        .and_then(|v| v.as_str())
        .unwrap_or("n/a")
        .to_string();

    vec![
        ("accommodates", first_num(&req.accommodates)),
        ("bathrooms", first_num(&req.bathrooms)),
        ("latitude", first_num(&req.latitude)),
        ("longitude", first_num(&req.longitude)),
        ("number_of_reviews", first_num(&req.number_of_reviews)),
        ("review_scores_rating", first_num(&req.review_scores_rating)),
        ("bedrooms", first_num(&req.bedrooms)),
        ("beds", first_num(&req.beds)),
        ("property_type", first_text(&req.property_type)),
        ("room_type", first_text(&req.room_type)),
        ("amenities", amenities),
        ("bed_type", first_text(&req.bed_type)),
        ("cancellation_policy", first_text(&req.cancellation_policy)),
        ("cleaning_fee", first_text(&req.cleaning_fee)),
        ("city", first_text(&req.city)),
        ("host_has_profile_pic", first_text(&req.host_has_profile_pic)),
        ("host_identity_verified", first_text(&req.host_identity_verified)),
        ("host_response_rate", first_text(&req.host_response_rate)),
        ("instant_bookable", first_text(&req.instant_bookable)),
    ]
}

pub fn result_page(req: &PredictRequest, log_price: f64) -> Markup {
    desktop_layout(
        "Estimate",
        html! {
            main {
                h1 { "Estimate" }

                (card("Predicted price", html! {
                    p { "log(price): " strong id="log-price" { (format!("{log_price:.4}")) } }
                    p { "Nightly price: " strong { (format!("{:.2}", log_price.exp())) } }
                }))

                (card("Submitted listing", html! {
                    table {
                        tbody {
                            @for (column, value) in submitted_rows(req) {
                                tr {
                                    th { (column) }
                                    td { (value) }
                                }
                            }
                        }
                    }
                }))

                p { a href="/" { "← Estimate another listing" } }
            }
        },
    )
}
