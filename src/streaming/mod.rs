//! Streaming module for bounded-memory stream redaction
//!
//! This module provides streaming primitives that:
//! - Use fixed memory allocation (working buffer)
//! - Read input in place, with no intermediate copies

pub mod chunk_reader;
pub mod working_buffer;

pub use chunk_reader::ChunkReader;
pub use working_buffer::WorkingBuffer;
