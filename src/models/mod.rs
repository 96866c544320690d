//! Core data models for soil lookup.

pub mod point;
pub mod soil;

pub use point::GeoPoint;
pub use soil::{SoilRecord, SoilType};
