// Write -> mmap round trips and rejection of files that are not valid dumps.

use keytrie::{KeytrieError, MappedTrie, Trie, TrieBuilder};
use tempfile::tempdir;

const ANCHOR: u8 = 0x1f;

fn anchored(s: &str) -> Vec<u8> {
    s.bytes().map(|b| if b == b'.' { ANCHOR } else { b }).collect()
}

fn delimited_trie() -> Trie {
    let mut builder = TrieBuilder::new();
    builder.add(&anchored(".a..b..c."), 0).unwrap();
    builder.add(&anchored(".b."), 1).unwrap();
    builder.add(&anchored(".a..c."), 2).unwrap();
    builder.add(&anchored(".a..b."), 3).unwrap();
    builder.add(&anchored(".é."), 4).unwrap();
    builder.build().unwrap()
}

#[test]
fn mapped_agrees_with_in_memory_anchored_scan() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("terms.trie");

    let trie = delimited_trie();
    trie.save(&path).unwrap();
    let mapped = MappedTrie::open(&path).unwrap();
    assert_eq!(mapped.num_nodes(), trie.num_nodes());

    let haystacks = [
        ".a..b..c.",
        ".b.",
        ".a..c.",
        ".z.",
        ".z..a..b..z.",
        ".é.",
        "no delimiters at all",
        "",
        ".a..b..c..b..a..c.",
    ];
    for hay in haystacks {
        let hay = anchored(hay);
        // Sweep both with the cursor protocol and compare step by step.
        let mut at = 0;
        loop {
            let want = trie.find_anchored(&hay, ANCHOR, at);
            let got = mapped.find_anchored(&hay, ANCHOR, at).unwrap();
            assert_eq!(got, want, "haystack {:?} at {}", hay, at);
            match want {
                Some(m) => at = m.end,
                None => break,
            }
        }
    }
}

#[test]
fn round_trip_preserves_structure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ab.trie");

    let mut builder = TrieBuilder::new();
    builder.add(b"ab", 9).unwrap();
    let trie = builder.build().unwrap();
    trie.save(&path).unwrap();

    let mapped = MappedTrie::open(&path).unwrap();
    assert_eq!(mapped.num_nodes(), 3);
    let m = mapped.find_anchored(b"ab", b'a', 0).unwrap().unwrap();
    assert_eq!((m.start, m.end, m.value), (0, 2, Some(9)));
}

#[test]
fn empty_trie_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.trie");

    let trie = TrieBuilder::new().build().unwrap();
    trie.save(&path).unwrap();

    let mapped = MappedTrie::open(&path).unwrap();
    assert_eq!(mapped.num_nodes(), 1);
    assert_eq!(mapped.find_anchored(&anchored(".a..b..c."), ANCHOR, 0).unwrap(), None);
}

#[test]
fn keys_without_payloads_map_to_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nopayload.trie");

    let mut builder = TrieBuilder::new();
    builder.add(&anchored(".x."), -1).unwrap();
    builder.add(&anchored(".y."), 6).unwrap();
    let trie = builder.build().unwrap();
    trie.save(&path).unwrap();

    let mapped = MappedTrie::open(&path).unwrap();
    let m = mapped.find_anchored(&anchored(".x."), ANCHOR, 0).unwrap().unwrap();
    assert_eq!(m.value, None);
    let m = mapped.find_anchored(&anchored(".y."), ANCHOR, 0).unwrap().unwrap();
    assert_eq!(m.value, Some(6));
}

#[test]
fn rejects_file_too_short_for_magic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.trie");
    std::fs::write(&path, b"1").unwrap();

    let err = MappedTrie::open(&path).unwrap_err();
    assert!(matches!(err, KeytrieError::Truncated { .. }), "{err}");
}

#[test]
fn rejects_wrong_magic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("magic.trie");
    std::fs::write(&path, b"1234").unwrap();

    let err = MappedTrie::open(&path).unwrap_err();
    assert!(matches!(err, KeytrieError::BadMagic { .. }), "{err}");
}

#[test]
fn rejects_truncated_sections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("truncated.trie");

    let mut builder = TrieBuilder::new();
    builder.add(b"abc", 1).unwrap();
    let trie = builder.build().unwrap();
    let mut dump = Vec::new();
    trie.write_to(&mut dump).unwrap();

    // Chop the dump anywhere after the magic and it must be rejected.
    for cut in [3, dump.len() / 2, dump.len() - 1] {
        std::fs::write(&path, &dump[..cut]).unwrap();
        let err = MappedTrie::open(&path).unwrap_err();
        assert!(matches!(err, KeytrieError::Truncated { .. }), "cut {cut}: {err}");
    }
}

#[test]
fn rejects_trailing_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trailing.trie");

    let mut builder = TrieBuilder::new();
    builder.add(b"abc", 1).unwrap();
    let trie = builder.build().unwrap();
    let mut dump = Vec::new();
    trie.write_to(&mut dump).unwrap();
    dump.extend_from_slice(b"junk");
    std::fs::write(&path, &dump).unwrap();

    let err = MappedTrie::open(&path).unwrap_err();
    assert!(matches!(err, KeytrieError::TrailingData { len: 4 }), "{err}");
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.trie");

    let err = MappedTrie::open(&path).unwrap_err();
    match err {
        KeytrieError::Io { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected Io error, got {other}"),
    }
}

#[test]
fn save_reports_path_on_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.trie");

    let trie = TrieBuilder::new().build().unwrap();
    let err = trie.save(&path).unwrap_err();
    assert!(matches!(err, KeytrieError::Io { .. }), "{err}");
}
