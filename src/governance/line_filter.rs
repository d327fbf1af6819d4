//! Line-at-a-time Filter
//!
//! Redacts each newline-terminated line independently with a single scan.
//! A newline is a hard delimiter, so the result matches the streaming pump;
//! memory is bounded by the longest line rather than by a fixed buffer.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::governance::luhn_scanner::LuhnScanner;

/// Redact a complete slice held in memory.
pub fn filter_slice(input: &[u8], scanner: &LuhnScanner) -> Vec<u8> {
    scanner.redact_slice(input)
}

/// Redact `reader` line by line into `writer`, returning the line count.
///
/// Line terminators are preserved exactly; a final unterminated line is
/// filtered like any other.
pub fn filter_lines<R: BufRead, W: Write>(
    mut reader: R,
    writer: &mut W,
    scanner: &LuhnScanner,
) -> Result<usize> {
    let mut line = Vec::new();
    let mut output = Vec::new();
    let mut lines = 0;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        output.clear();
        output.extend_from_slice(&line);
        scanner.scan(&line, &mut output);
        writer.write_all(&output)?;
        lines += 1;
    }

    writer.flush()?;
    Ok(lines)
}
