//! Memory-mapped trie reader
//!
//! [`MappedTrie`] answers anchored scans straight out of an on-disk dump
//! written by [`Trie::save`](crate::Trie::save), without deserializing it.
//! Opening validates the magic and walks the section headers, recording each
//! section's offset and element count; nothing is copied. The sections are
//! packed with no alignment, so element reads go through zerocopy's
//! native-endian byteorder types rather than pointer casts, and every read is
//! bounds-checked: a corrupt or foreign-architecture file surfaces as an
//! error, never as wild indexing.
//!
//! Dropping the reader unmaps the file; the descriptor is closed as soon as
//! the mapping is established.

use std::fs::File;
use std::marker::PhantomData;
use std::mem;
use std::path::Path;

use memmap2::Mmap;
use zerocopy::byteorder::{I16, I32, NativeEndian, U16};
use zerocopy::FromBytes;

use crate::error::{KeytrieError, Result};
use crate::format::{COUNT_LEN, MAGIC, MAGIC_LEN};
use crate::scan::{scan_anchored, Match, TrieSource};
use crate::trie::{FrozenNode, NO_CHILD, NO_VALUE};

type RawI32 = I32<NativeEndian>;
type RawI16 = I16<NativeEndian>;
type RawU16 = U16<NativeEndian>;

/// One length-prefixed section of the mapped file: an offset into the mapping
/// and an element count. Elements are fetched on demand, bounds-checked.
#[derive(Debug)]
struct MappedArray<T> {
    offset: usize,
    len: usize,
    _elem: PhantomData<T>,
}

impl<T: FromBytes> MappedArray<T> {
    /// Element `index`, or a bounds error. All arithmetic is checked: indexes
    /// derived from corrupt file content must fail, not wrap.
    fn get(&self, buf: &[u8], index: usize) -> Result<T> {
        let oob = || KeytrieError::OutOfBounds {
            index,
            len: self.len,
        };
        if index >= self.len {
            return Err(oob());
        }
        let start = index
            .checked_mul(mem::size_of::<T>())
            .and_then(|rel| self.offset.checked_add(rel))
            .ok_or_else(oob)?;
        let end = start.checked_add(mem::size_of::<T>()).ok_or_else(oob)?;
        let bytes = buf.get(start..end).ok_or_else(oob)?;
        T::read_from_bytes(bytes).map_err(|_| oob())
    }
}

/// Walks the section headers at open time, handing out [`MappedArray`]s and
/// checking every extent against the file length.
struct SectionCursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> SectionCursor<'a> {
    fn new(buf: &'a [u8], offset: usize) -> Self {
        Self { buf, offset }
    }

    fn take<T>(&mut self) -> Result<MappedArray<T>> {
        let truncated = |needed| KeytrieError::Truncated {
            needed,
            len: self.buf.len(),
        };

        let count_end = self.offset + COUNT_LEN;
        let count_bytes = self
            .buf
            .get(self.offset..count_end)
            .ok_or_else(|| truncated(count_end))?;
        let mut raw = [0u8; COUNT_LEN];
        raw.copy_from_slice(count_bytes);
        let len = usize::from_ne_bytes(raw);

        let end = len
            .checked_mul(mem::size_of::<T>())
            .and_then(|section| count_end.checked_add(section))
            .ok_or_else(|| truncated(usize::MAX))?;
        if end > self.buf.len() {
            return Err(truncated(end));
        }
        let offset = count_end;
        self.offset = end;
        Ok(MappedArray {
            offset,
            len,
            _elem: PhantomData,
        })
    }
}

/// A frozen trie read directly from a memory-mapped dump.
///
/// Exposes the anchored scanner, which is the scan mode reader deployments
/// use; the full scanner surface stays on the in-memory [`Trie`](crate::Trie).
///
/// ```no_run
/// use keytrie::MappedTrie;
///
/// let trie = MappedTrie::open("terms.trie")?;
/// if let Some(m) = trie.find_anchored(b"\x1fterm\x1f", 0x1f, 0)? {
///     println!("hit {:?} at {}..{}", m.value, m.start, m.end);
/// }
/// # Ok::<(), keytrie::KeytrieError>(())
/// ```
#[derive(Debug)]
pub struct MappedTrie {
    map: Mmap,
    chars_offset: MappedArray<RawI32>,
    ifailure_state: MappedArray<RawI32>,
    chars_count: MappedArray<RawI16>,
    lengths: MappedArray<RawU16>,
    chars: MappedArray<u8>,
    indices: MappedArray<RawI32>,
    payload_keys: MappedArray<RawI32>,
    payload_values: MappedArray<RawI32>,
}

impl MappedTrie {
    /// Open and map the dump at `path`, validating its layout.
    ///
    /// # Errors
    ///
    /// [`KeytrieError::Io`] if the file cannot be opened or mapped;
    /// [`KeytrieError::Truncated`], [`KeytrieError::BadMagic`],
    /// [`KeytrieError::CountMismatch`], or [`KeytrieError::TrailingData`] if
    /// the content is not a trie dump for this architecture.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let io_err = |source| KeytrieError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        // Safety: the mapping is read-only and keytrie never writes through
        // it; concurrent truncation of the underlying file is the caller's
        // contract, as with any mapped reader.
        let map = unsafe { Mmap::map(&file) }.map_err(io_err)?;
        Self::from_map(map)
    }

    fn from_map(map: Mmap) -> Result<Self> {
        if map.len() < MAGIC_LEN {
            return Err(KeytrieError::Truncated {
                needed: MAGIC_LEN,
                len: map.len(),
            });
        }
        let found = u16::from_le_bytes([map[0], map[1]]);
        if found != MAGIC {
            return Err(KeytrieError::BadMagic {
                found,
                expected: MAGIC,
            });
        }

        let mut cursor = SectionCursor::new(&map, MAGIC_LEN);
        let chars_offset = cursor.take::<RawI32>()?;
        let ifailure_state = cursor.take::<RawI32>()?;
        let chars_count = cursor.take::<RawI16>()?;
        let lengths = cursor.take::<RawU16>()?;
        let chars = cursor.take::<u8>()?;
        let indices = cursor.take::<RawI32>()?;
        let payload_keys = cursor.take::<RawI32>()?;
        let payload_values = cursor.take::<RawI32>()?;

        let num_nodes = chars_offset.len;
        for (section, len) in [
            ("ifailure_state", ifailure_state.len),
            ("chars_count", chars_count.len),
            ("length", lengths.len),
        ] {
            if len != num_nodes {
                return Err(KeytrieError::CountMismatch {
                    section,
                    found: len,
                    expected: num_nodes,
                });
            }
        }
        if indices.len != chars.len {
            return Err(KeytrieError::CountMismatch {
                section: "indices",
                found: indices.len,
                expected: chars.len,
            });
        }
        if payload_values.len != payload_keys.len {
            return Err(KeytrieError::CountMismatch {
                section: "payload_values",
                found: payload_values.len,
                expected: payload_keys.len,
            });
        }
        if cursor.offset != map.len() {
            return Err(KeytrieError::TrailingData {
                len: map.len() - cursor.offset,
            });
        }

        Ok(Self {
            map,
            chars_offset,
            ifailure_state,
            chars_count,
            lengths,
            chars,
            indices,
            payload_keys,
            payload_values,
        })
    }

    /// Find the longest key starting exactly at an `anchor` byte, at or after
    /// `at`. Same semantics as
    /// [`Trie::find_anchored`](crate::Trie::find_anchored), with the mapped
    /// cursor protocol: resume with `at = m.end`.
    ///
    /// # Errors
    ///
    /// [`KeytrieError::OutOfBounds`] if the walk is led outside a section by
    /// corrupt data.
    pub fn find_anchored(
        &self,
        haystack: &[u8],
        anchor: u8,
        at: usize,
    ) -> Result<Option<Match>> {
        scan_anchored(self, haystack, anchor, at)
    }

    /// Number of trie nodes in the mapped dump, root included.
    pub fn num_nodes(&self) -> usize {
        self.chars_offset.len
    }
}

impl TrieSource for MappedTrie {
    type Error = KeytrieError;

    fn node(&self, state: i32) -> Result<FrozenNode> {
        let i = state as usize;
        Ok(FrozenNode {
            chars_offset: self.chars_offset.get(&self.map, i)?.get(),
            ifailure_state: self.ifailure_state.get(&self.map, i)?.get(),
            chars_count: self.chars_count.get(&self.map, i)?.get(),
            length: self.lengths.get(&self.map, i)?.get(),
        })
    }

    fn child_at(&self, state: i32, c: u8) -> Result<i32> {
        let node = self.node(state)?;
        // Saturation feeds impossible indexes into the checked accessors,
        // which turn them into bounds errors; a hostile chars_offset or
        // chars_count cannot walk past a section or wrap the address space.
        let off = usize::try_from(node.chars_offset).unwrap_or(usize::MAX);
        let count = usize::try_from(node.chars_count).unwrap_or(0);

        // Binary search over this node's slice of the edge bytes.
        let mut lo = 0usize;
        let mut hi = count;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.chars.get(&self.map, off.saturating_add(mid))? < c {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo < count && self.chars.get(&self.map, off.saturating_add(lo))? == c {
            return Ok(self.indices.get(&self.map, off.saturating_add(lo))?.get());
        }
        Ok(NO_CHILD)
    }

    fn value_at(&self, state: i32) -> Result<i32> {
        if state <= 0 {
            return Ok(NO_VALUE);
        }
        let mut lo = 0usize;
        let mut hi = self.payload_keys.len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.payload_keys.get(&self.map, mid)?.get() < state {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo < self.payload_keys.len && self.payload_keys.get(&self.map, lo)?.get() == state {
            return Ok(self.payload_values.get(&self.map, lo)?.get());
        }
        Ok(NO_VALUE)
    }
}
