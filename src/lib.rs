//! Yuvaa - soil lookup and crop recommendation for farmers
//!
//! This library provides the shared types and modules for the server and lookup binaries.

pub mod classifier;
pub mod config;
pub mod dataset;
mod endpoint;
pub mod error;
pub mod geo;
pub mod geocoding;
pub mod models;
pub mod pages;
pub mod query;
pub mod recommend;

pub use error::Error;
pub use models::{GeoPoint, SoilRecord, SoilType};
