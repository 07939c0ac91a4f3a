//! compression/codecs/mod.rs
//! Bundled codec implementations.

pub mod gzip;

pub use gzip::GzipCodec;
