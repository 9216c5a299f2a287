//! Memory trace parsing.
//!
//! One record per line: `<core_id> <R|W> <hex byte address>`. The core id may be
//! omitted (`<R|W> <addr>`), in which case the access belongs to core 0. Blank lines
//! and lines starting with `#` are skipped.

use std::io::BufRead;

use cachesim_core::common::CoreId;
use thiserror::Error;

/// One memory operation from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Issuing core.
    pub core_id: CoreId,
    /// Store rather than load.
    pub is_write: bool,
    /// Byte address.
    pub addr: u64,
}

/// Errors raised while reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace could not be read.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// A line did not match the record format.
    #[error("trace line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// Parses one trace line. Returns `Ok(None)` for blank and comment lines.
fn parse_line(text: &str, line: usize) -> Result<Option<TraceRecord>, TraceError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let malformed = |reason: String| TraceError::Malformed { line, reason };
    let fields: Vec<&str> = text.split_whitespace().collect();
    let (core, op, addr) = match fields.as_slice() {
        [op, addr] => ("0", *op, *addr),
        [core, op, addr] => (*core, *op, *addr),
        _ => return Err(malformed(format!("expected 2 or 3 fields, got {}", fields.len()))),
    };

    let core_id = core
        .parse::<CoreId>()
        .map_err(|e| malformed(format!("bad core id `{core}`: {e}")))?;
    let is_write = match op {
        "R" | "r" => false,
        "W" | "w" => true,
        _ => return Err(malformed(format!("bad operation `{op}`, expected R or W"))),
    };
    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    let addr = u64::from_str_radix(digits, 16)
        .map_err(|e| malformed(format!("bad address `{addr}`: {e}")))?;

    Ok(Some(TraceRecord {
        core_id,
        is_write,
        addr,
    }))
}

/// Iterates over the records of a trace, in order.
pub fn records<R: BufRead>(reader: R) -> impl Iterator<Item = Result<TraceRecord, TraceError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, text)| match text {
            Ok(text) => parse_line(&text, i + 1).transpose(),
            Err(e) => Some(Err(TraceError::Io(e))),
        })
}
