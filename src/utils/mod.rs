pub mod error;
pub mod logger;
pub mod query;
pub mod validation;
