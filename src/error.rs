//! Error types for keytrie operations
//!
//! keytrie uses a single error enum across building, serialization, and
//! mapped-file access. Absence of a match is never an error; scanners and
//! point lookups report it through their return value.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for keytrie operations
#[derive(Error, Debug)]
pub enum KeytrieError {
    /// A key longer than the frozen trie can record was added.
    ///
    /// Terminal lengths are stored as `u16`, so keys are capped at 65 535
    /// bytes.
    #[error("key of {len} bytes exceeds the maximum key length of 65535")]
    KeyTooLong {
        /// Length of the rejected key, in bytes.
        len: usize,
    },

    /// A node exceeded the per-node edge capacity at freeze time.
    ///
    /// Edge counts are stored as `i16`, bounding a node at 32 767 children.
    #[error("node {node} has {count} children, more than the 32767 the frozen trie can hold")]
    ChildOverflow {
        /// Index of the offending node.
        node: usize,
        /// Its child count.
        count: usize,
    },

    /// The automaton outgrew its 32-bit index space at freeze time.
    #[error("automaton too large: {what} count {count} does not fit in an i32")]
    AutomatonScale {
        /// Which array overflowed ("node" or "edge").
        what: &'static str,
        /// The overflowing count.
        count: usize,
    },

    /// File open, map, or write failure, with the path involved.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path of the file being opened, mapped, or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The mapped file ended before a section it promised.
    #[error("mapped file truncated: need {needed} bytes, have {len}")]
    Truncated {
        /// Bytes required to read through the current section.
        needed: usize,
        /// Actual file length.
        len: usize,
    },

    /// The mapped file does not start with the trie magic number.
    #[error("bad magic number {found:#06x}, expected {expected:#06x}")]
    BadMagic {
        /// The two bytes found at the start of the file.
        found: u16,
        /// The expected magic value.
        expected: u16,
    },

    /// Two sections that must be the same length disagree.
    #[error("section count mismatch: {section} has {found} entries, expected {expected}")]
    CountMismatch {
        /// Name of the mismatched section.
        section: &'static str,
        /// Entries found in the section header.
        found: usize,
        /// Entries required by the sections before it.
        expected: usize,
    },

    /// The sections do not account for the whole file.
    #[error("{len} bytes of trailing data after the last trie section")]
    TrailingData {
        /// Number of unaccounted-for bytes.
        len: usize,
    },

    /// An index fell outside a mapped array.
    ///
    /// Reachable only through a corrupt or foreign-architecture file; every
    /// mapped read is checked rather than trusted.
    #[error("index {index} out of bounds for mapped array of {len} elements")]
    OutOfBounds {
        /// The requested element index.
        index: usize,
        /// The array's element count.
        len: usize,
    },
}

/// Result type alias for keytrie operations
pub type Result<T> = std::result::Result<T, KeytrieError>;
