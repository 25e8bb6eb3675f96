use crate::config::ReadinessPolicy;
use crate::router::handle;
use crate::tests::utils::{body_string, test_state, trained_state};
use astra::Body;
use http::{Method, Request};

fn post_form(body: &str) -> astra::Request {
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.as_bytes().to_vec()))
        .unwrap()
}

const VALID_FORM: &str = "accommodates=4&bathrooms=1&latitude=40.75&longitude=-73.98\
&number_of_reviews=15&review_scores_rating=96&bedrooms=2&beds=2\
&property_type=Apartment&room_type=Entire+home%2Fapt&amenities=Wifi%2CKitchen\
&bed_type=Real+Bed&cancellation_policy=flexible&cleaning_fee=on&city=NYC\
&host_has_profile_pic=on&host_response_rate=95%25";

#[test]
fn form_page_loads() {
    let (_dir, state) = test_state(ReadinessPolicy::Reject);
    let req = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("form"));
    assert!(body.contains("name=\"accommodates\""));
    assert!(body.contains("Entire home/apt"));
}

#[test]
fn valid_submission_shows_the_estimate() {
    let (_dir, state) = trained_state();

    let resp = handle(post_form(VALID_FORM), &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("log-price"));
    assert!(body.contains("Nightly price"));
    assert!(body.contains("NYC"));
}

#[test]
fn invalid_numbers_re_render_the_form() {
    let (_dir, state) = trained_state();
    let body = VALID_FORM.replace("beds=2", "beds=").replace("latitude=40.75", "latitude=north");

    let resp = handle(post_form(&body), &state).expect("Handler failed");
    assert_eq!(resp.status(), 400);

    let page = body_string(resp);
    assert!(page.contains("latitude"));
    assert!(page.contains("beds"));
    assert!(page.contains("invalid or empty numeric fields"));
}

#[test]
fn submission_without_model_shows_an_error_page() {
    let (_dir, state) = test_state(ReadinessPolicy::Reject);

    let resp = handle(post_form(VALID_FORM), &state).expect("Handler failed");
    assert_eq!(resp.status(), 503);
    assert!(body_string(resp).contains("not ready"));
}

#[test]
fn oversized_form_is_rejected() {
    let (_dir, state) = test_state(ReadinessPolicy::Reject);
    let body = format!(
        "{VALID_FORM}&amenities={}",
        "a".repeat(crate::router::MAX_BODY_BYTES as usize)
    );

    match handle(post_form(&body), &state) {
        Err(err) => assert_eq!(err.status(), 400),
        Ok(resp) => panic!("expected 400, got {}", resp.status()),
    }
}
