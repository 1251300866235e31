pub mod geometry;
pub mod sequence;
pub mod spatial;
