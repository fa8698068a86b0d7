//! Small helpers shared by the library and the CLI.
//!
//! - **URL policy**: which feed URLs may be fetched at all
//! - **Text**: making feed-controlled text safe to print in a terminal

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url, UrlValidationError};
