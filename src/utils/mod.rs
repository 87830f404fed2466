pub mod json_extract;
pub mod rounding;
