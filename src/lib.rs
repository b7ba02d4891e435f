//! keytrie - memory-mappable Aho-Corasick dictionary with integer payloads
//!
//! keytrie scans text for any of a pre-registered dictionary of byte keys,
//! each optionally tagged with an `i32` payload. Keys are accumulated in a
//! [`TrieBuilder`], compiled once into an immutable [`Trie`], and matched in
//! three modes: shortest-first, longest-in-run, and anchored (keys that begin
//! at a delimiter byte). A compiled trie serializes to a native dump that
//! [`MappedTrie`] queries directly over a memory mapping, so large
//! dictionaries load in constant time.
//!
//! # Quick start
//!
//! ```rust
//! use keytrie::TrieBuilder;
//!
//! let mut builder = TrieBuilder::new();
//! builder.add(b"he", 1)?;
//! builder.add(b"she", 2)?;
//! builder.add(b"his", 3)?;
//! builder.add(b"hers", 4)?;
//! let trie = builder.build()?;
//!
//! // Point lookups
//! assert!(trie.contains(b"his"));
//! assert_eq!(trie.get(b"she"), Some(2));
//!
//! // Resumable scanning: resume at the previous match's end
//! let m = trie.find_short(b"ushers", 0).expect("match");
//! assert_eq!((m.start, m.end, m.value), (1, 4, Some(2)));
//! assert_eq!(trie.find_short(b"ushers", m.end), None);
//!
//! // Or let an iterator drive the cursor
//! let ends: Vec<usize> = trie.find_short_iter(b"ushers").map(|m| m.end).collect();
//! assert_eq!(ends, vec![4]);
//! # Ok::<(), keytrie::KeytrieError>(())
//! ```
//!
//! # Mapped dictionaries
//!
//! ```rust
//! use keytrie::{MappedTrie, TrieBuilder};
//!
//! let mut builder = TrieBuilder::new();
//! builder.add(b"\x1fterm\x1f", 42)?;
//! let trie = builder.build()?;
//!
//! # let path = std::env::temp_dir().join("keytrie_doctest.trie");
//! trie.save(&path)?;
//! let mapped = MappedTrie::open(&path)?;
//! let m = mapped.find_anchored(b"\x1fterm\x1f", 0x1f, 0)?.expect("match");
//! assert_eq!(m.value, Some(42));
//! # let _ = std::fs::remove_file(&path);
//! # Ok::<(), keytrie::KeytrieError>(())
//! ```
//!
//! The dump uses host byte order and pointer width throughout - it is a
//! bit-exact image of the in-memory arrays, not an interchange format. Read
//! it only on the architecture that wrote it.
//!
//! # Scan modes
//!
//! - [`Trie::find_short`] - first terminal reached wins; at a shared end
//!   position that is the shortest key.
//! - [`Trie::find_longest`] - terminals are collected along a single forward
//!   walk and the longest wins; the walk stops at the first failure-link
//!   fallback after a match, keeping results local to the cursor.
//! - [`Trie::find_anchored`] / [`MappedTrie::find_anchored`] - plain trie
//!   walk restarted at each occurrence of an anchor byte, longest terminal
//!   per anchor; failure links are ignored.
//!
//! Byte offsets can be converted to codepoint ordinals with
//! [`CodepointIndex`] when the haystack is UTF-8.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod builder;
mod codepoints;
/// Error types for keytrie operations
pub mod error;
mod format;
mod iter;
mod mapped;
mod scan;
mod trie;

pub use crate::builder::TrieBuilder;
pub use crate::codepoints::CodepointIndex;
pub use crate::error::{KeytrieError, Result};
pub use crate::iter::{FindAnchoredIter, FindLongestIter, FindShortIter};
pub use crate::mapped::MappedTrie;
pub use crate::scan::Match;
pub use crate::trie::Trie;

/// Library version string
pub const KEYTRIE_VERSION: &str = env!("CARGO_PKG_VERSION");
