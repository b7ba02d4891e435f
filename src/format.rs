//! On-disk layout
//!
//! A compiled trie is dumped as a magic number followed by eight
//! length-prefixed sections, packed with no padding or alignment:
//!
//! ```text
//! magic            u16   little endian, 0xBABB
//! N                u64   chars_offset    i32 x N
//! N                u64   ifailure_state  i32 x N
//! N                u64   chars_count     i16 x N
//! N                u64   length          u16 x N
//! C                u64   chars           u8  x C
//! C                u64   indices         i32 x C
//! P                u64   payload_keys    i32 x P   (strictly ascending)
//! P                u64   payload_values  i32 x P
//! ```
//!
//! Length prefixes are the host's pointer width and every integer is host
//! byte order: the dump is bit-exact with the in-memory arrays and is only
//! readable on a matching architecture. The four node sections carry the same
//! count, as do the two edge and the two payload sections; the mapped reader
//! enforces both, along with exact consumption of the file.

use std::io::{self, Write};

use crate::trie::Trie;

/// Magic number opening every serialized trie.
pub(crate) const MAGIC: u16 = 0xbabb;

/// Byte length of the encoded magic.
pub(crate) const MAGIC_LEN: usize = 2;

/// Byte length of a section's length prefix.
pub(crate) const COUNT_LEN: usize = std::mem::size_of::<usize>();

fn write_count<W: Write>(w: &mut W, count: usize) -> io::Result<()> {
    w.write_all(&count.to_ne_bytes())
}

/// Write `trie` in the layout above.
pub(crate) fn write_trie<W: Write>(trie: &Trie, w: &mut W) -> io::Result<()> {
    w.write_all(&MAGIC.to_le_bytes())?;

    write_count(w, trie.nodes.len())?;
    for node in &trie.nodes {
        w.write_all(&node.chars_offset.to_ne_bytes())?;
    }
    write_count(w, trie.nodes.len())?;
    for node in &trie.nodes {
        w.write_all(&node.ifailure_state.to_ne_bytes())?;
    }
    write_count(w, trie.nodes.len())?;
    for node in &trie.nodes {
        w.write_all(&node.chars_count.to_ne_bytes())?;
    }
    write_count(w, trie.nodes.len())?;
    for node in &trie.nodes {
        w.write_all(&node.length.to_ne_bytes())?;
    }

    write_count(w, trie.chars.len())?;
    w.write_all(&trie.chars)?;
    write_count(w, trie.indices.len())?;
    for &index in &trie.indices {
        w.write_all(&index.to_ne_bytes())?;
    }

    write_count(w, trie.payloads.len())?;
    for &(node, _) in &trie.payloads {
        w.write_all(&node.to_ne_bytes())?;
    }
    write_count(w, trie.payloads.len())?;
    for &(_, value) in &trie.payloads {
        w.write_all(&value.to_ne_bytes())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrieBuilder;

    #[test]
    fn layout_of_a_single_key() {
        let mut builder = TrieBuilder::new();
        builder.add(b"ab", 7).unwrap();
        let trie = builder.build().unwrap();

        let mut buf = Vec::new();
        write_trie(&trie, &mut buf).unwrap();

        // Three nodes (root, a, ab), two edges, one payload pair.
        let node_sections = (COUNT_LEN + 3 * 4) * 2 + (COUNT_LEN + 3 * 2) * 2;
        let edge_sections = (COUNT_LEN + 2) + (COUNT_LEN + 2 * 4);
        let payload_sections = (COUNT_LEN + 4) * 2;
        assert_eq!(buf.len(), MAGIC_LEN + node_sections + edge_sections + payload_sections);

        assert_eq!(&buf[..MAGIC_LEN], &MAGIC.to_le_bytes()[..]);
        let mut count = [0u8; COUNT_LEN];
        count.copy_from_slice(&buf[MAGIC_LEN..MAGIC_LEN + COUNT_LEN]);
        assert_eq!(usize::from_ne_bytes(count), 3);
    }

    #[test]
    fn empty_trie_still_has_a_root() {
        let trie = TrieBuilder::new().build().unwrap();
        let mut buf = Vec::new();
        write_trie(&trie, &mut buf).unwrap();

        let mut count = [0u8; COUNT_LEN];
        count.copy_from_slice(&buf[MAGIC_LEN..MAGIC_LEN + COUNT_LEN]);
        assert_eq!(usize::from_ne_bytes(count), 1);
    }
}
