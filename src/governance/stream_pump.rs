//! Streaming Redaction Pump
//!
//! CRITICAL: This pump does NOT accumulate the stream.
//! It scans each chunk together with the unresolved tail of the previous
//! one, writes out the prefix that no future input can change, and forgets
//! it. Memory usage is the fixed working buffer regardless of stream size.
//!
//! Output is byte-for-byte the same however the input is split into chunks.

use std::io::{Read, Write};

use log::{debug, warn};
use serde::Serialize;

use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::governance::luhn_scanner::LuhnScanner;
use crate::streaming::{ChunkReader, WorkingBuffer};
use crate::telemetry;

/// Counters for one pumped stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PumpStats {
    /// Bytes taken from the source
    pub bytes_read: usize,
    /// Bytes handed to the sink
    pub bytes_written: usize,
    /// Digits replaced by the mask in the written output
    pub digits_masked: usize,
    /// Number of writes to the sink
    pub flushes: usize,
}

/// Read → scan → flush safe prefix → compact, until end-of-stream.
pub struct StreamPump {
    /// Raw and redacted bytes not yet written
    buffer: WorkingBuffer,
    /// Checksum scanner
    scanner: LuhnScanner,
    /// Running counters
    stats: PumpStats,
    /// Whether to emit an audit event at the end of the stream
    log_redactions: bool,
}

impl StreamPump {
    /// Create a pump from configuration
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            buffer: WorkingBuffer::new(config.buffer_capacity),
            scanner: LuhnScanner::from_config(config),
            stats: PumpStats::default(),
            log_redactions: config.log_redactions,
        }
    }

    /// Default filter with a custom buffer size
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(&FilterConfig {
            buffer_capacity: capacity,
            ..Default::default()
        })
    }

    /// Pump `source` into `sink` until the source is exhausted.
    pub fn run<R: Read, W: Write>(&mut self, source: R, sink: &mut W) -> Result<PumpStats> {
        let mut reader = ChunkReader::new(source);

        loop {
            let count = match reader.read_chunk(&mut self.buffer) {
                Ok(count) => count,
                Err(e) => return Err(self.fail(e)),
            };
            if reader.is_finished() {
                debug!("source finished after {} bytes", reader.total_read());
                break;
            }
            self.stats.bytes_read += count;
            self.process(sink)?;
        }

        self.finish(sink)
    }

    /// Feed one chunk received from elsewhere.
    ///
    /// A chunk larger than the free space is taken in pieces, with a full
    /// scan and flush between them.
    pub fn push<W: Write>(&mut self, chunk: &[u8], sink: &mut W) -> Result<()> {
        let mut rest = chunk;
        while !rest.is_empty() {
            if self.buffer.is_full() {
                return Err(self.fail(FilterError::CapacityExceeded {
                    capacity: self.buffer.capacity(),
                }));
            }

            let take = rest.len().min(self.buffer.remaining());
            self.buffer.append(&rest[..take])?;
            self.stats.bytes_read += take;
            rest = &rest[take..];

            self.process(sink)?;
        }
        Ok(())
    }

    /// End of stream: write the retained tail as-is.
    ///
    /// The tail was already scanned when its last byte arrived and nothing
    /// can change it now, so it is not scanned again.
    pub fn finish<W: Write>(&mut self, sink: &mut W) -> Result<PumpStats> {
        let remaining = self.buffer.len();
        if remaining > 0 {
            if let Err(e) = self.write_prefix(remaining, sink) {
                return Err(self.fail(e));
            }
            self.buffer.compact(remaining);
        }
        if let Err(e) = sink.flush() {
            return Err(self.fail(FilterError::Io(e)));
        }

        let stats = self.stats;
        if self.log_redactions {
            telemetry::audit_completed(&stats, self.buffer.capacity()).emit();
        }
        debug!(
            "stream complete: {} bytes in, {} bytes out, {} digits masked",
            stats.bytes_read, stats.bytes_written, stats.digits_masked
        );
        Ok(stats)
    }

    /// Scan the whole valid region, flush what is final, keep the rest.
    fn process<W: Write>(&mut self, sink: &mut W) -> Result<()> {
        let (raw, redacted) = self.buffer.scan_view();
        let safe_anchor = self.scanner.scan(raw, redacted);

        if safe_anchor > 0 {
            if let Err(e) = self.write_prefix(safe_anchor, sink) {
                return Err(self.fail(e));
            }
        }
        self.buffer.compact(safe_anchor);

        debug!(
            "flushed {} bytes, retaining {} of {}",
            safe_anchor,
            self.buffer.len(),
            self.buffer.capacity()
        );

        // Nothing flushable and no room left: the pending run can never resolve
        if self.buffer.is_full() {
            return Err(self.fail(FilterError::CapacityExceeded {
                capacity: self.buffer.capacity(),
            }));
        }
        Ok(())
    }

    fn write_prefix<W: Write>(&mut self, len: usize, sink: &mut W) -> Result<()> {
        let raw = &self.buffer.raw()[..len];
        let redacted = &self.buffer.redacted()[..len];

        sink.write_all(redacted)?;

        self.stats.digits_masked += raw.iter().zip(redacted).filter(|(a, b)| a != b).count();
        self.stats.bytes_written += len;
        self.stats.flushes += 1;
        Ok(())
    }

    fn fail(&self, error: FilterError) -> FilterError {
        warn!("redaction pump stopped: {}", error);
        if self.log_redactions {
            telemetry::audit_failure(&error, &self.stats).emit();
        }
        error
    }

    /// Counters so far
    pub fn stats(&self) -> PumpStats {
        self.stats
    }

    /// Bytes held back waiting for more input
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Reset the pump for reuse
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.stats = PumpStats::default();
    }
}

/// Redact an in-memory byte slice through a fresh pump.
pub fn redact_bytes(input: &[u8], config: &FilterConfig) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len());
    StreamPump::new(config).run(input, &mut output)?;
    Ok(output)
}
