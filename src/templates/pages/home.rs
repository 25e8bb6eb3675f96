// templates/pages/home.rs

use crate::api::form::{
    ListingForm, BED_TYPES, CANCELLATION_POLICIES, PROPERTY_TYPES, ROOM_TYPES,
};
use crate::templates::{
    components::{card, checkbox, select_field, text_field},
    desktop_layout,
};
use maud::{html, Markup};

/// The single-listing form. `error` is shown above the fields when a
/// previous submission was rejected.
pub fn home_page(form: &ListingForm, error: Option<&str>) -> Markup {
    desktop_layout(
        "Estimate a listing",
        html! {
            main {
                h1 { "Estimate a listing's price" }
                p {
                    "Fill in one listing. Amenities accept "
                    code { "Wifi;Kitchen" } ", " code { "Wifi,Kitchen" } " or "
                    code { "{\"Wireless Internet\",Kitchen}" } "."
                }

                @if let Some(msg) = error {
                    p class="error" { (msg) }
                }

                form method="post" action="/" {
                    (card("Capacity & location", html! {
                        div class="grid" {
                            (text_field("Accommodates", "accommodates", &form.accommodates))
                            (text_field("Bathrooms", "bathrooms", &form.bathrooms))
                            (text_field("Bedrooms", "bedrooms", &form.bedrooms))
                            (text_field("Beds", "beds", &form.beds))
                            (text_field("Latitude", "latitude", &form.latitude))
                            (text_field("Longitude", "longitude", &form.longitude))
                            (text_field("City", "city", &form.city))
                        }
                    }))

                    (card("Reviews", html! {
                        div class="grid" {
                            (text_field("Number of reviews", "number_of_reviews", &form.number_of_reviews))
                            (text_field("Review score", "review_scores_rating", &form.review_scores_rating))
                        }
                    }))

                    (card("Listing", html! {
                        div class="grid" {
                            (select_field("Property type", "property_type", &PROPERTY_TYPES, &form.property_type))
                            (select_field("Room type", "room_type", &ROOM_TYPES, &form.room_type))
                            (select_field("Bed type", "bed_type", &BED_TYPES, &form.bed_type))
                            (select_field("Cancellation policy", "cancellation_policy", &CANCELLATION_POLICIES, &form.cancellation_policy))
                        }
                        (text_field("Amenities", "amenities", &form.amenities))
                    }))

                    (card("Host & policies", html! {
                        div class="grid" {
                            (text_field("Host response rate", "host_response_rate", &form.host_response_rate))
                            div {
                                (checkbox("Cleaning fee", "cleaning_fee", form.cleaning_fee))
                                (checkbox("Host has profile picture", "host_has_profile_pic", form.host_has_profile_pic))
                                (checkbox("Host identity verified", "host_identity_verified", form.host_identity_verified))
                                (checkbox("Instant bookable", "instant_bookable", form.instant_bookable))
                            }
                        }
                    }))

                    button type="submit" { "Predict" }
                }
            }
        },
    )
}
