// src/model/amenities.rs

//! Canonical form for the free-form `amenities` field.
//!
//! Listing sources ship amenities in at least three shapes:
//!
//! - brace-wrapped quoted CSV: `{"Wireless Internet","Air conditioning",Kitchen}`
//! - plain comma list: `Wifi,Kitchen`
//! - plain semicolon list: `Wifi;Kitchen`
//!
//! All of them collapse to one sorted, `;`-joined string so the categorical
//! encoder sees a single category per amenity set. The same function must run
//! on training records and on incoming requests.

/// Separator used in the canonical form.
pub const SEPARATOR: &str = ";";

/// Normalize a raw amenities value.
///
/// Missing stays missing. A value with no usable tokens becomes the empty
/// string, which is a category of its own.
pub fn normalize(raw: Option<&str>) -> Option<String> {
    raw.map(normalize_str)
}

/// Normalize a present amenities string.
///
/// Tokens are split on `,` and `;`, and every brace, double quote and
/// whitespace character is stripped from both ends of each token. The
/// output tokens therefore never carry a separator or a strippable edge, so
/// normalizing twice gives the same string for any input.
pub fn normalize_str(raw: &str) -> String {
    let mut tokens: Vec<&str> = raw
        .split([',', ';'])
        .map(clean_token)
        .filter(|t| !t.is_empty())
        .collect();

    // Duplicates are kept; only the order is canonicalized.
    tokens.sort_unstable();
    tokens.join(SEPARATOR)
}

fn clean_token(token: &str) -> &str {
    token.trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '{' | '}'))
}
