//! Geometry operations over footprints: metric buffering and multi-part
//! decomposition.

pub mod buffer;
pub mod explode;
