//! Redaction module for the Luhn guard
//!
//! This module provides:
//! - Backward Luhn scanner with safe-flush boundary
//! - Streaming pump over a fixed working buffer
//! - Line-at-a-time filter

pub mod line_filter;
pub mod luhn_scanner;
pub mod stream_pump;

pub use line_filter::{filter_lines, filter_slice};
pub use luhn_scanner::{is_separator, luhn_checksum, luhn_weight, LuhnScanner};
pub use stream_pump::{redact_bytes, PumpStats, StreamPump};
