//! Iterator adapters over the resumable scanners
//!
//! Each adapter owns the cursor and resumes at the previous match's end, which
//! is exactly the loop callers would otherwise write by hand.

use std::iter::FusedIterator;

use crate::scan::Match;
use crate::trie::Trie;

/// Iterator over [`Trie::find_short`] matches.
pub struct FindShortIter<'t, 'h> {
    trie: &'t Trie,
    haystack: &'h [u8],
    at: usize,
}

impl<'t, 'h> FindShortIter<'t, 'h> {
    pub(crate) fn new(trie: &'t Trie, haystack: &'h [u8]) -> Self {
        Self { trie, haystack, at: 0 }
    }
}

impl Iterator for FindShortIter<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let m = self.trie.find_short(self.haystack, self.at)?;
        self.at = m.end;
        Some(m)
    }
}

impl FusedIterator for FindShortIter<'_, '_> {}

/// Iterator over [`Trie::find_longest`] matches.
pub struct FindLongestIter<'t, 'h> {
    trie: &'t Trie,
    haystack: &'h [u8],
    at: usize,
}

impl<'t, 'h> FindLongestIter<'t, 'h> {
    pub(crate) fn new(trie: &'t Trie, haystack: &'h [u8]) -> Self {
        Self { trie, haystack, at: 0 }
    }
}

impl Iterator for FindLongestIter<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let m = self.trie.find_longest(self.haystack, self.at)?;
        self.at = m.end;
        Some(m)
    }
}

impl FusedIterator for FindLongestIter<'_, '_> {}

/// Iterator over [`Trie::find_anchored`] matches.
pub struct FindAnchoredIter<'t, 'h> {
    trie: &'t Trie,
    haystack: &'h [u8],
    anchor: u8,
    at: usize,
}

impl<'t, 'h> FindAnchoredIter<'t, 'h> {
    pub(crate) fn new(trie: &'t Trie, haystack: &'h [u8], anchor: u8) -> Self {
        Self { trie, haystack, anchor, at: 0 }
    }
}

impl Iterator for FindAnchoredIter<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let m = self.trie.find_anchored(self.haystack, self.anchor, self.at)?;
        self.at = m.end;
        Some(m)
    }
}

impl FusedIterator for FindAnchoredIter<'_, '_> {}

#[cfg(test)]
mod tests {
    use crate::TrieBuilder;

    #[test]
    fn short_and_longest_sweeps() {
        let mut builder = TrieBuilder::new();
        builder.add(b"python", 1).unwrap();
        builder.add(b"perl", 2).unwrap();
        builder.add(b"scheme", 3).unwrap();
        builder.add(b"java", 4).unwrap();
        builder.add(b"pythonperl", 5).unwrap();
        let trie = builder.build().unwrap();

        let hay = b"pythonperlschemejava";
        let short: Vec<_> = trie
            .find_short_iter(hay)
            .map(|m| (m.start, m.end, m.value))
            .collect();
        assert_eq!(
            short,
            vec![
                (0, 6, Some(1)),
                (6, 10, Some(2)),
                (10, 16, Some(3)),
                (16, 20, Some(4)),
            ]
        );

        let long: Vec<_> = trie
            .find_longest_iter(hay)
            .map(|m| (m.start, m.end, m.value))
            .collect();
        assert_eq!(long, vec![(0, 10, Some(5)), (10, 16, Some(3)), (16, 20, Some(4))]);

        assert_eq!(trie.find_short_iter(b"no pascal here").count(), 0);
        assert_eq!(trie.find_longest_iter(b"no pascal here").count(), 0);
    }

    #[test]
    fn longest_sweep_is_bounded_by_failure_fallback() {
        let mut builder = TrieBuilder::new();
        builder.add(b"cisco", 1).unwrap();
        builder.add(b"em", 2).unwrap();
        builder.add(b"cisco systems australia", 3).unwrap();
        let trie = builder.build().unwrap();

        let long: Vec<_> = trie
            .find_longest_iter(b"cisco systems")
            .map(|m| (m.start, m.end, m.value))
            .collect();
        assert_eq!(long, vec![(0, 5, Some(1)), (10, 12, Some(2))]);
    }

    #[test]
    fn interior_terminals_do_not_fire() {
        let mut builder = TrieBuilder::new();
        builder.add(b"an", 1).unwrap();
        builder.add(b"canal", 2).unwrap();
        builder.add(b"e can oilfield", 3).unwrap();
        let trie = builder.build().unwrap();

        let long: Vec<_> = trie
            .find_longest_iter(b"one canal")
            .map(|m| (m.start, m.end))
            .collect();
        assert_eq!(long, vec![(4, 9)]);
    }

    #[test]
    fn anchored_sweep() {
        const A: u8 = 0x1f;
        let mut builder = TrieBuilder::new();
        builder.add(&[A, b'a', A], 1).unwrap();
        builder.add(&[A, b'b', A], 2).unwrap();
        let trie = builder.build().unwrap();

        // Adjacent keys each carry their own anchors; a resumed scan starts
        // at the previous end, so single shared anchors would be skipped.
        let hay = [A, b'a', A, A, b'b', A, A, b'z', A];
        let matches: Vec<_> = trie
            .find_anchored_iter(&hay, A)
            .map(|m| (m.start, m.end, m.value))
            .collect();
        assert_eq!(matches, vec![(0, 3, Some(1)), (3, 6, Some(2))]);
    }
}
