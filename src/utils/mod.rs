pub mod serde_helpers;
pub mod url_validation;
pub use url_validation::{UrlValidationError, validate_base_url, validate_callback_url};
