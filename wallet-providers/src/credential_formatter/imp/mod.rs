pub mod data_integrity;
pub mod jwt;
pub mod jwt_formatter;

#[cfg(any(test, feature = "mock"))]
pub mod test_utilities;
