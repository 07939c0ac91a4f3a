//! compression/mod.rs
//! Per-block compression collaborators.
//!
//! Every block is compressed on its own, with no state carried from one block
//! to the next. That independence is what lets the transform stage run the
//! codec on many blocks at once and finish them in any order.

pub mod types;
pub mod codecs;

pub use types::*;
pub use codecs::GzipCodec;
