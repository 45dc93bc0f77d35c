pub mod algorithm;
pub mod assembly;
pub mod correlation;
pub mod error;
pub mod signing;
pub mod transaction;

#[cfg(test)]
pub mod test_utilities;
