pub mod admin;
pub mod thresholds;
