pub mod cache;
pub mod classifier;
pub mod data;
pub mod normalize;
pub mod tables;
