pub mod float;
pub mod lanes;
pub mod transform;
