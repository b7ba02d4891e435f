//! Frozen parallel-array trie
//!
//! The compiled form of the automaton. The pointer-rich build trie is
//! flattened into four parallel arrays:
//!
//! - `nodes`: per-node records (edge range, failure link, terminal length)
//! - `chars`: every node's outgoing edge bytes, concatenated, sorted within
//!   each node's range
//! - `indices`: child node index for the edge byte at the same position in
//!   `chars`
//! - `payloads`: sparse `(node, value)` pairs, ascending by node index
//!
//! Transitions binary-search a node's slice of `chars`. Node 0 is the root;
//! the scanning transition treats any byte without a root edge as a loop back
//! to the root, which is what lets failure chases terminate. Exact lookups
//! (`contains`, `get`) use the raw transition with no root loop.

use std::convert::Infallible;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{KeytrieError, Result};
use crate::format;
use crate::iter::{FindAnchoredIter, FindLongestIter, FindShortIter};
use crate::scan::{scan_anchored, Match, TrieSource};

/// Sentinel for "no child with this edge byte".
pub(crate) const NO_CHILD: i32 = -1;

/// Sentinel for "no payload stored".
pub(crate) const NO_VALUE: i32 = -1;

/// Per-node record of the frozen trie.
///
/// `chars_offset`/`chars_count` delimit the node's edge range in the shared
/// `chars` and `indices` arrays. `length` is non-zero iff a key ends at this
/// node, and then equals that key's byte length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FrozenNode {
    pub(crate) chars_offset: i32,
    pub(crate) ifailure_state: i32,
    pub(crate) chars_count: i16,
    pub(crate) length: u16,
}

/// Compiled multi-pattern matcher.
///
/// Built by [`TrieBuilder::build`](crate::TrieBuilder::build). Immutable;
/// queries take `&self` and concurrent readers need no synchronization.
///
/// All scanners share one cursor protocol: pass the offset to scan from, get
/// back a [`Match`] whose `end` is the offset to resume at. See the crate
/// docs for a worked loop, or use the [`find_short_iter`](Trie::find_short_iter)
/// family.
pub struct Trie {
    pub(crate) nodes: Vec<FrozenNode>,
    pub(crate) chars: Vec<u8>,
    pub(crate) indices: Vec<i32>,
    pub(crate) payloads: Vec<(i32, i32)>,
}

impl Trie {
    /// Raw transition: the child of `state` along edge byte `c`, or
    /// [`NO_CHILD`]. No root loop; exact lookups and the anchored walk use
    /// this directly.
    pub(crate) fn child_raw(&self, state: i32, c: u8) -> i32 {
        let node = &self.nodes[state as usize];
        let off = node.chars_offset as usize;
        let edges = &self.chars[off..off + node.chars_count as usize];
        match edges.binary_search(&c) {
            Ok(pos) => self.indices[off + pos],
            Err(_) => NO_CHILD,
        }
    }

    /// Scanning transition: like [`child_raw`](Trie::child_raw), but the root
    /// absorbs unmatched bytes by looping to itself.
    fn child_scan(&self, state: i32, c: u8) -> i32 {
        let child = self.child_raw(state, c);
        if child < 0 && state == 0 {
            0
        } else {
            child
        }
    }

    /// Payload stored at `state`, or [`NO_VALUE`].
    pub(crate) fn value_raw(&self, state: i32) -> i32 {
        if state <= 0 {
            return NO_VALUE;
        }
        match self.payloads.binary_search_by_key(&state, |&(node, _)| node) {
            Ok(pos) => self.payloads[pos].1,
            Err(_) => NO_VALUE,
        }
    }

    fn matched(&self, state: i32, start: usize, end: usize) -> Match {
        let value = self.value_raw(state);
        Match {
            start,
            end,
            value: (value != NO_VALUE).then_some(value),
        }
    }

    /// Find the first match at or after `at`, shortest key winning at a
    /// shared end position.
    ///
    /// Walks the automaton from the root, following failure links on
    /// mismatches, and stops at the first terminal state whose key fits
    /// entirely inside `at..`. Returns `None` when the haystack is exhausted
    /// without a hit. Resume with `at = m.end`; a resumed scan restarts at
    /// the root and never reports a match beginning before `at`.
    pub fn find_short(&self, haystack: &[u8], at: usize) -> Option<Match> {
        let mut state: i32 = 0;
        for (pos, &c) in haystack.iter().enumerate().skip(at) {
            let mut child = self.child_scan(state, c);
            while child < 0 {
                state = self.nodes[state as usize].ifailure_state;
                child = self.child_scan(state, c);
            }
            state = child;
            let len = self.nodes[state as usize].length as usize;
            if len != 0 && len <= pos + 1 - at {
                let end = pos + 1;
                return Some(self.matched(state, end - len, end));
            }
        }
        None
    }

    /// Find the longest match in the contiguous run of candidates starting at
    /// or after `at`.
    ///
    /// Same walk as [`find_short`](Trie::find_short), but terminals are
    /// recorded rather than returned, and the scan stops at the first failure-
    /// link follow after any match has been seen. A key that is a proper
    /// suffix of a longer overlapping one can therefore shadow it when the
    /// longer key begins earlier; callers relying on that case should anchor
    /// their keys instead.
    pub fn find_longest(&self, haystack: &[u8], at: usize) -> Option<Match> {
        // (length, end, node) of the longest terminal seen so far.
        let mut best: Option<(usize, usize, i32)> = None;
        let mut state: i32 = 0;
        for (pos, &c) in haystack.iter().enumerate().skip(at) {
            let mut child = self.child_scan(state, c);
            while child < 0 {
                if let Some((len, end, node)) = best {
                    return Some(self.matched(node, end - len, end));
                }
                state = self.nodes[state as usize].ifailure_state;
                child = self.child_scan(state, c);
            }
            state = child;
            let len = self.nodes[state as usize].length as usize;
            if len != 0
                // not sure this 2nd condition is necessary
                && len <= pos + 1 - at
                && best.is_none_or(|(longest, _, _)| longest < len)
            {
                best = Some((len, pos + 1, state));
            }
        }
        best.map(|(len, end, node)| self.matched(node, end - len, end))
    }

    /// Find the longest key starting exactly at an `anchor` byte, at or after
    /// `at`.
    ///
    /// Ignores failure links entirely: a plain trie walk is restarted at each
    /// anchor byte and the longest terminal reached on that walk wins. Meant
    /// for dictionaries whose keys all begin (and end) with the anchor
    /// delimiter.
    pub fn find_anchored(&self, haystack: &[u8], anchor: u8, at: usize) -> Option<Match> {
        match scan_anchored(self, haystack, anchor, at) {
            Ok(found) => found,
            Err(never) => match never {},
        }
    }

    /// Whether `key` was registered, byte for byte.
    pub fn contains(&self, key: &[u8]) -> bool {
        match self.walk_exact(key) {
            Some(state) => self.nodes[state as usize].length != 0,
            None => false,
        }
    }

    /// Payload of the exact key `key`, or `None` if the key is absent or was
    /// added without a payload.
    pub fn get(&self, key: &[u8]) -> Option<i32> {
        let state = self.walk_exact(key)?;
        if self.nodes[state as usize].length == 0 {
            return None;
        }
        let value = self.value_raw(state);
        (value != NO_VALUE).then_some(value)
    }

    fn walk_exact(&self, key: &[u8]) -> Option<i32> {
        let mut state: i32 = 0;
        for &c in key {
            state = self.child_raw(state, c);
            if state < 0 {
                return None;
            }
        }
        Some(state)
    }

    /// Number of registered keys.
    pub fn num_keys(&self) -> usize {
        self.nodes.iter().filter(|n| n.length != 0).count()
    }

    /// Number of trie nodes, root included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges across all nodes.
    pub fn num_total_children(&self) -> usize {
        self.chars.len()
    }

    /// Iterate all [`find_short`](Trie::find_short) matches in `haystack`.
    pub fn find_short_iter<'t, 'h>(&'t self, haystack: &'h [u8]) -> FindShortIter<'t, 'h> {
        FindShortIter::new(self, haystack)
    }

    /// Iterate all [`find_longest`](Trie::find_longest) matches in `haystack`.
    pub fn find_longest_iter<'t, 'h>(&'t self, haystack: &'h [u8]) -> FindLongestIter<'t, 'h> {
        FindLongestIter::new(self, haystack)
    }

    /// Iterate all [`find_anchored`](Trie::find_anchored) matches in
    /// `haystack`.
    pub fn find_anchored_iter<'t, 'h>(
        &'t self,
        haystack: &'h [u8],
        anchor: u8,
    ) -> FindAnchoredIter<'t, 'h> {
        FindAnchoredIter::new(self, haystack, anchor)
    }

    /// Serialize the trie to `w` in the native on-disk layout.
    ///
    /// The dump uses host byte order and the host's pointer width for its
    /// length prefixes; it is only readable by [`MappedTrie`](crate::MappedTrie)
    /// on a matching architecture.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        format::write_trie(self, w)
    }

    /// Serialize the trie to the file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source| KeytrieError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_err)?;
        let mut w = BufWriter::new(file);
        self.write_to(&mut w).and_then(|()| w.flush()).map_err(io_err)
    }
}

impl TrieSource for Trie {
    type Error = Infallible;

    fn node(&self, state: i32) -> std::result::Result<FrozenNode, Infallible> {
        Ok(self.nodes[state as usize])
    }

    fn child_at(&self, state: i32, c: u8) -> std::result::Result<i32, Infallible> {
        Ok(self.child_raw(state, c))
    }

    fn value_at(&self, state: i32) -> std::result::Result<i32, Infallible> {
        Ok(self.value_raw(state))
    }
}
