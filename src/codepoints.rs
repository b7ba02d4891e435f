//! UTF-8 byte-offset to codepoint-ordinal mapping
//!
//! Scanners report byte offsets; callers holding `&str` haystacks often want
//! character positions instead. [`CodepointIndex`] records where each
//! codepoint starts (any byte whose top two bits are not `10`) and answers
//! rank queries with a lower-bound search.

/// Sorted byte offsets of codepoint starts in one UTF-8 buffer.
pub struct CodepointIndex {
    starts: Vec<usize>,
}

impl CodepointIndex {
    /// Index `text`. Runs once over the buffer; queries are logarithmic.
    pub fn new(text: &[u8]) -> Self {
        let mut starts = Vec::with_capacity(text.len());
        for (i, &b) in text.iter().enumerate() {
            // Continuation bytes are 10xxxxxx; everything else starts a
            // codepoint (ASCII or a sequence leader).
            if b & 0xc0 != 0x80 {
                starts.push(i);
            }
        }
        Self { starts }
    }

    /// Number of codepoint starts strictly before `byte_index`.
    ///
    /// For a `byte_index` on a codepoint boundary this is that codepoint's
    /// ordinal; for an interior byte it is the ordinal of the codepoint the
    /// byte belongs to, plus one. Offsets past the end of the indexed text
    /// saturate to the total codepoint count.
    pub fn codepoint_index(&self, byte_index: usize) -> usize {
        self.starts.partition_point(|&start| start < byte_index)
    }
}
