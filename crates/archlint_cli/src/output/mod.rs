//! Report output formatters

mod json;
mod text;

pub use json::output_json;
pub use text::output_text;
