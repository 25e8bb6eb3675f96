// src/api/form.rs

//! The operator form: one listing typed in by hand, sent as a length-1 batch.

use crate::api::batch::PredictRequest;
use crate::errors::ServerError;

pub const PROPERTY_TYPES: [&str; 5] = ["Apartment", "House", "Condominium", "Loft", "Other"];
pub const ROOM_TYPES: [&str; 4] = ["Entire home/apt", "Private room", "Shared room", "Hotel room"];
pub const BED_TYPES: [&str; 5] = ["Real Bed", "Pull-out Sofa", "Futon", "Airbed", "Couch"];
pub const CANCELLATION_POLICIES: [&str; 4] = ["flexible", "moderate", "strict", "super_strict_30"];

/// Raw form fields as typed. Numeric fields stay text until validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingForm {
    pub accommodates: String,
    pub bathrooms: String,
    pub latitude: String,
    pub longitude: String,
    pub number_of_reviews: String,
    pub review_scores_rating: String,
    pub bedrooms: String,
    pub beds: String,

    pub property_type: String,
    pub room_type: String,
    pub amenities: String,
    pub bed_type: String,
    pub cancellation_policy: String,
    pub cleaning_fee: bool,
    pub city: String,
    pub host_has_profile_pic: bool,
    pub host_identity_verified: bool,
    pub host_response_rate: String,
    pub instant_bookable: bool,
}

impl Default for ListingForm {
    /// A Manhattan apartment.
    fn default() -> Self {
        Self {
            accommodates: "4".into(),
            bathrooms: "1.0".into(),
            latitude: "40.754321".into(),
            longitude: "-73.983210".into(),
            number_of_reviews: "15".into(),
            review_scores_rating: "96".into(),
            bedrooms: "2".into(),
            beds: "2".into(),
            property_type: PROPERTY_TYPES[0].into(),
            room_type: ROOM_TYPES[0].into(),
            amenities: r#"{"Wireless Internet","Air conditioning",Kitchen,Heating,"Family/kid friendly",Essentials,"Hair dryer",Iron,"Smoke detector","Fire extinguisher"}"#.into(),
            bed_type: BED_TYPES[0].into(),
            cancellation_policy: CANCELLATION_POLICIES[0].into(),
            cleaning_fee: true,
            city: "NYC".into(),
            host_has_profile_pic: true,
            host_identity_verified: true,
            host_response_rate: "95%".into(),
            instant_bookable: true,
        }
    }
}

/// `t`/`f`, as the host flags appear in the historical data.
fn tf(flag: bool) -> String {
    let s = if flag { "t" } else { "f" };
    s.to_string()
}

/// `True`/`False`, as `cleaning_fee` appears in the historical data.
fn true_false(flag: bool) -> String {
    let s = if flag { "True" } else { "False" };
    s.to_string()
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer fields accept decimal text and truncate it.
fn parse_int(s: &str) -> Option<f64> {
    parse_float(s).map(f64::trunc)
}

impl ListingForm {
    /// Decode an `application/x-www-form-urlencoded` body. Absent text fields
    /// are empty; absent checkboxes are unchecked.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        let mut form = Self {
            accommodates: String::new(),
            bathrooms: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            number_of_reviews: String::new(),
            review_scores_rating: String::new(),
            bedrooms: String::new(),
            beds: String::new(),
            property_type: String::new(),
            room_type: String::new(),
            amenities: String::new(),
            bed_type: String::new(),
            cancellation_policy: String::new(),
            cleaning_fee: false,
            city: String::new(),
            host_has_profile_pic: false,
            host_identity_verified: false,
            host_response_rate: String::new(),
            instant_bookable: false,
        };

        for (key, value) in url::form_urlencoded::parse(body) {
            let value = value.into_owned();
            match key.as_ref() {
                "accommodates" => form.accommodates = value,
                "bathrooms" => form.bathrooms = value,
                "latitude" => form.latitude = value,
                "longitude" => form.longitude = value,
                "number_of_reviews" => form.number_of_reviews = value,
                "review_scores_rating" => form.review_scores_rating = value,
                "bedrooms" => form.bedrooms = value,
                "beds" => form.beds = value,
                "property_type" => form.property_type = value,
                "room_type" => form.room_type = value,
                "amenities" => form.amenities = value,
                "bed_type" => form.bed_type = value,
                "cancellation_policy" => form.cancellation_policy = value,
                "cleaning_fee" => form.cleaning_fee = true,
                "city" => form.city = value,
                "host_has_profile_pic" => form.host_has_profile_pic = true,
                "host_identity_verified" => form.host_identity_verified = true,
                "host_response_rate" => form.host_response_rate = value,
                "instant_bookable" => form.instant_bookable = true,
                _ => {}
            }
        }
        form
    }

    /// Validate numeric fields and package the form as a length-1 batch.
    ///
    /// Every empty or unparsable numeric field is named in the error.
    pub fn to_request(&self) -> Result<PredictRequest, ServerError> {
        let numeric = [
            ("accommodates", parse_int(&self.accommodates)),
            ("bathrooms", parse_float(&self.bathrooms)),
            ("latitude", parse_float(&self.latitude)),
            ("longitude", parse_float(&self.longitude)),
            ("number_of_reviews", parse_int(&self.number_of_reviews)),
            ("review_scores_rating", parse_float(&self.review_scores_rating)),
            ("bedrooms", parse_int(&self.bedrooms)),
            ("beds", parse_int(&self.beds)),
        ];

        let invalid: Vec<&str> = numeric
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !invalid.is_empty() {
            return Err(ServerError::BadRequest(format!(
                "invalid or empty numeric fields: {}",
                invalid.join(", ")
            )));
        }

        let one = |v: Option<f64>| Some(vec![v]);
        let text = |s: &str| Some(vec![non_empty(s)]);

        Ok(PredictRequest {
            accommodates: one(numeric[0].1),
            bathrooms: one(numeric[1].1),
            latitude: one(numeric[2].1),
            longitude: one(numeric[3].1),
            number_of_reviews: one(numeric[4].1),
            review_scores_rating: one(numeric[5].1),
            bedrooms: one(numeric[6].1),
            beds: one(numeric[7].1),
            property_type: text(&self.property_type),
            room_type: text(&self.room_type),
            amenities: Some(vec![non_empty(&self.amenities)
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null)]),
            bed_type: text(&self.bed_type),
            cancellation_policy: text(&self.cancellation_policy),
            cleaning_fee: Some(vec![Some(true_false(self.cleaning_fee))]),
            city: text(&self.city),
            host_has_profile_pic: Some(vec![Some(tf(self.host_has_profile_pic))]),
            host_identity_verified: Some(vec![Some(tf(self.host_identity_verified))]),
            host_response_rate: text(&self.host_response_rate),
            instant_bookable: Some(vec![Some(tf(self.instant_bookable))]),
        })
    }
}
