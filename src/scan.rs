//! Shared scanner plumbing
//!
//! The anchored scanner is written once against a minimal capability (node
//! metadata, raw child transition, payload lookup) and reused by both the
//! in-memory [`Trie`](crate::Trie) and the file-backed
//! [`MappedTrie`](crate::MappedTrie). The capability carries an associated
//! error type: in-memory access cannot fail (`Infallible`), mapped access can
//! (a corrupt file surfaces as a bounds error).
//!
//! The shortest and longest scanners stay on the concrete in-memory type so
//! their hot loops are monomorphic; only the anchored walk pays for the
//! abstraction, and it is dominated by the anchor search anyway.

use crate::trie::{FrozenNode, NO_VALUE};

/// A single match reported by a scanner.
///
/// `start..end` is the matched byte range in the haystack. `value` is the
/// payload registered with the matched key, or `None` if the key was added
/// without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
    /// Payload of the matched key, if any.
    pub value: Option<i32>,
}

/// Read access to a frozen trie, however it is stored.
pub(crate) trait TrieSource {
    /// Error produced by a failed read. [`Infallible`](std::convert::Infallible)
    /// for in-memory storage.
    type Error;

    /// The record of node `state`.
    fn node(&self, state: i32) -> Result<FrozenNode, Self::Error>;

    /// Raw transition from `state` along edge byte `c`; negative when the
    /// edge is absent. No root loop.
    fn child_at(&self, state: i32, c: u8) -> Result<i32, Self::Error>;

    /// Payload stored at `state`, with the `-1` sentinel for "none".
    fn value_at(&self, state: i32) -> Result<i32, Self::Error>;
}

/// Find the longest key starting at an anchor byte at or after `at`.
///
/// For each occurrence of `anchor` in `haystack[at..]`, walk the trie with
/// raw transitions (a missing edge ends the walk, it does not fall back
/// through failure links) and record the longest terminal reached. The first
/// anchor whose walk records anything wins; otherwise the search moves one
/// past the anchor and repeats.
pub(crate) fn scan_anchored<T: TrieSource>(
    trie: &T,
    haystack: &[u8],
    anchor: u8,
    mut at: usize,
) -> Result<Option<Match>, T::Error> {
    while at < haystack.len() {
        let Some(found) = memchr::memchr(anchor, &haystack[at..]) else {
            return Ok(None);
        };
        let anchor_pos = at + found;

        // (length, end, node) of the longest terminal on this walk.
        let mut best: Option<(usize, usize, i32)> = None;
        let mut state: i32 = 0;
        for (pos, &c) in haystack.iter().enumerate().skip(anchor_pos) {
            state = trie.child_at(state, c)?;
            if state < 0 {
                break;
            }
            let len = trie.node(state)?.length as usize;
            if len != 0 && best.is_none_or(|(longest, _, _)| longest < len) {
                best = Some((len, pos + 1, state));
            }
        }

        if let Some((len, end, node)) = best {
            let value = trie.value_at(node)?;
            return Ok(Some(Match {
                start: end - len,
                end,
                value: (value != NO_VALUE).then_some(value),
            }));
        }
        at = anchor_pos + 1;
    }
    Ok(None)
}
