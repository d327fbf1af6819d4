//! Luhn Guard Stream Filter
//!
//! This filter reads an unbounded byte stream, masks every digit of each
//! apparent payment card number (a 14 to 16 digit run, optionally broken up
//! by spaces or hyphens, that passes the Luhn checksum), and writes all other
//! bytes through untouched.
//!
//! Memory is a fixed working buffer. Each chunk is scanned together with the
//! unresolved tail of the previous one, and only the prefix that no later
//! input can change is written out, so the output does not depend on how the
//! input was split into reads.
//!
//! ```
//! use luhn_guard_filter::{redact_bytes, FilterConfig};
//!
//! let output = redact_bytes(b"card 4111 1111 1111 1111", &FilterConfig::default())?;
//! assert_eq!(output, b"card XXXX XXXX XXXX XXXX");
//! # Ok::<(), luhn_guard_filter::FilterError>(())
//! ```

pub mod config;
pub mod error;
pub mod governance;
pub mod streaming;
pub mod telemetry;

pub use config::{ConfigError, FilterConfig};
pub use error::{FilterError, Result};
pub use governance::{redact_bytes, LuhnScanner, PumpStats, StreamPump};
pub use streaming::{ChunkReader, WorkingBuffer};

/// Fewest digits a maskable run may have
pub const MIN_DIGITS: usize = 14;

/// Most digits a run is extended to
pub const MAX_DIGITS: usize = 16;

/// Default working buffer size
pub const DEFAULT_BUFFER_CAPACITY: usize = 32 * 1024;

/// Byte written in place of each masked digit
pub const MASK_BYTE: u8 = b'X';
