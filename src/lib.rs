pub mod buckets;
pub mod config;
pub mod forecast;
pub mod geodesy;
pub mod geojson;
pub mod index;
pub mod neighbor;
pub mod tracks;
pub mod trails;
pub mod web;

pub use config::Config;
