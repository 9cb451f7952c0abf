pub mod normalize;
pub mod serialization;
