pub mod errors;
pub mod html;
pub mod json;

pub use errors::{error_to_response, ResultResp};

// Normal HTML response
pub use html::{html_response, html_status_response};
pub use json::{json_error_response, json_response};
