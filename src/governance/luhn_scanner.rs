//! Luhn Scanner
//!
//! Finds payment-card-like digit runs in a working buffer and masks them.
//!
//! The scan walks the buffer backward. Every digit is tried as the rightmost
//! digit (the anchor) of a candidate run, and a second cursor walks left from
//! it accumulating the Luhn checksum until the run reaches `max_digits`, hits
//! a byte that is neither a digit nor a separator, or falls off the front of
//! the buffer. Whenever the run holds at least `min_digits` digits and the
//! checksum is zero mod 10, the run's start is moved to the walk cursor, so
//! the longest valid run for an anchor is the one masked.
//!
//! Work is bounded by `max_digits` per position: O(n * max_digits).
//!
//! The scan also reports the safe anchor: one past the rightmost hard
//! delimiter. Input arriving later can only extend runs to the left, and no
//! run crosses a hard delimiter, so everything before the safe anchor is final.

use crate::config::FilterConfig;
use crate::{MASK_BYTE, MAX_DIGITS, MIN_DIGITS};

/// Luhn value for the even positions: 0  1  2  3  4  5  6  7  8  9
const LUHN_DOUBLED: [u32; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Bytes allowed between the digits of a run
#[inline]
pub fn is_separator(byte: u8) -> bool {
    byte == b' ' || byte == b'-'
}

/// Weighted value of an ASCII digit at 1-based `position` from the right.
///
/// Odd positions count as-is; even positions are doubled and digit-summed.
#[inline]
pub fn luhn_weight(position: usize, digit: u8) -> u32 {
    let value = u32::from(digit - b'0');
    if position % 2 == 0 {
        LUHN_DOUBLED[value as usize]
    } else {
        value
    }
}

/// Luhn sum (mod 10) of every ASCII digit in `bytes`, ignoring everything else.
pub fn luhn_checksum(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .rev()
        .filter(|b| b.is_ascii_digit())
        .enumerate()
        .map(|(i, &d)| luhn_weight(i + 1, d))
        .sum::<u32>()
        % 10
}

/// Outcome of walking left from one anchor digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CandidateRun {
    /// Leftmost index to mask; `anchor + 1` when nothing validated
    start: usize,
    /// Hard delimiter that stopped the walk, if any
    delimiter: Option<usize>,
}

/// Backward Luhn scanner with a configurable length window.
#[derive(Debug, Clone)]
pub struct LuhnScanner {
    min_digits: usize,
    max_digits: usize,
    mask: u8,
}

impl LuhnScanner {
    pub fn new(min_digits: usize, max_digits: usize, mask: u8) -> Self {
        Self {
            min_digits,
            max_digits,
            mask,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.min_digits, config.max_digits, config.mask_byte())
    }

    /// Scan `raw`, masking validated runs in `redacted`, and return the safe
    /// anchor in `[0, raw.len()]`.
    ///
    /// `redacted` must be the same length as `raw` and hold a copy of it
    /// (possibly already partially masked by an earlier scan of the same
    /// bytes). A return of `0` means nothing is final yet.
    pub fn scan(&self, raw: &[u8], redacted: &mut [u8]) -> usize {
        debug_assert_eq!(raw.len(), redacted.len());

        let mut safe_anchor = 0;
        let mut saw_digit = false;

        for anchor in (0..raw.len()).rev() {
            let byte = raw[anchor];
            if byte.is_ascii_digit() {
                saw_digit = true;
                let run = self.evaluate_run(raw, anchor);

                if safe_anchor == 0 {
                    if let Some(delimiter) = run.delimiter {
                        safe_anchor = delimiter + 1;
                    }
                }

                // empty when nothing validated
                let span = run.start..=anchor;
                for (out, &byte) in redacted[span.clone()].iter_mut().zip(&raw[span]) {
                    if byte.is_ascii_digit() {
                        *out = self.mask;
                    }
                }
            } else if safe_anchor == 0 && !is_separator(byte) {
                safe_anchor = anchor + 1;
            }
        }

        if saw_digit {
            safe_anchor
        } else {
            raw.len()
        }
    }

    /// Walk left from `anchor`, keeping the last (longest) validated start.
    fn evaluate_run(&self, raw: &[u8], anchor: usize) -> CandidateRun {
        let mut digits_considered = 1;
        let mut checksum = luhn_weight(digits_considered, raw[anchor]);
        let mut run = CandidateRun {
            start: anchor + 1,
            delimiter: None,
        };

        for mark in (0..anchor).rev() {
            if digits_considered >= self.max_digits {
                break;
            }

            let byte = raw[mark];
            if byte.is_ascii_digit() {
                digits_considered += 1;
                checksum += luhn_weight(digits_considered, byte);
            } else if !is_separator(byte) {
                run.delimiter = Some(mark);
                break;
            }

            if digits_considered >= self.min_digits && checksum % 10 == 0 {
                run.start = mark;
            }
        }

        run
    }

    /// Filter a complete slice in one scan, returning the masked copy.
    pub fn redact_slice(&self, input: &[u8]) -> Vec<u8> {
        let mut output = input.to_vec();
        self.scan(input, &mut output);
        output
    }

    pub fn mask(&self) -> u8 {
        self.mask
    }
}

impl Default for LuhnScanner {
    fn default() -> Self {
        Self::new(MIN_DIGITS, MAX_DIGITS, MASK_BYTE)
    }
}
