//! Chunk window math for paged retrieval of stored job payloads.
//!
//! Offsets and lengths are measured in characters, matching the counts the
//! status endpoint reports. The stored payload is immutable, so resolving the
//! same `(offset, limit)` twice always yields the same window and the same
//! text.

/// Smallest permitted chunk length per request.
pub const LIMIT_MIN: usize = 1;

/// Largest permitted chunk length per request.
pub const LIMIT_MAX: usize = 262_144;

/// Chunk length used when the client does not pass `limit`.
pub const LIMIT_DEFAULT: usize = 65_536;

/// A resolved read window over a payload of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkWindow {
    /// Offset actually used, clamped into `[0, total]`.
    pub offset: usize,
    /// Window length actually used.
    pub len: usize,
    /// Offset the client should request next.
    pub next_offset: usize,
    /// True when this window reaches the end of the payload.
    pub done: bool,
}

/// Resolve a client-supplied `(offset, limit)` pair against a payload length.
///
/// The offset is clamped into `[0, total]` and the window length into
/// `[1, max(1, total - offset)]`, so a request past the end resolves to an
/// empty read that still reports `done` instead of faulting.
pub fn window(total: usize, offset: i64, limit: i64) -> ChunkWindow {
    let offset = (offset.max(0) as usize).min(total);
    let limit = limit.clamp(LIMIT_MIN as i64, LIMIT_MAX as i64) as usize;
    let len = limit.min((total - offset).max(1));
    let next_offset = offset + len;

    ChunkWindow {
        offset,
        len,
        next_offset,
        done: next_offset >= total,
    }
}

/// Slice up to `len` characters starting at character `offset`.
///
/// Out-of-range reads shrink to whatever remains, down to the empty string.
pub fn slice_chars(s: &str, offset: usize, len: usize) -> &str {
    let start = match s.char_indices().nth(offset) {
        Some((byte, _)) => byte,
        None => return "",
    };
    let end = s[start..]
        .char_indices()
        .nth(len)
        .map(|(byte, _)| start + byte)
        .unwrap_or(s.len());
    &s[start..end]
}
