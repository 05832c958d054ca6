pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{endpoint_url, normalize_base_url};
