//! Wire framing for compressed streams.
//!
//! Responsibilities:
//! - Big-endian `i32` wire primitive
//! - Encode a block into a frame (`position ‖ length ‖ payload`)
//! - Decode frame headers, treating a short header as end of stream
//!
//! Non-responsibilities:
//! - Compression
//! - Ordering
//! - Parallelism

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{FrameError, FrameHeader};
pub use encode::{encode_frame, encode_i32_be, write_frame};
pub use decode::{decode_frame_header, decode_i32_be, read_frame_header, read_i32_be};
