pub mod algorithm;
pub mod artifact;
pub mod transaction;
pub mod unit;
