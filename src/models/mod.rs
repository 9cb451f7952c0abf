pub mod certificate;
pub mod query;
