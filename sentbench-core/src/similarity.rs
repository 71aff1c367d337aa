//! Matching-blocks string similarity
//!
//! Ratcliff/Obershelp style matcher over Unicode scalar values. The second
//! sequence is indexed once so that one expected sentence can be compared
//! against many candidates cheaply.

use std::collections::HashMap;

/// Sequences at least this long get the popular-character heuristic applied
pub const AUTOJUNK_MIN_LEN: usize = 200;

/// A run of identical characters: `a[a..a + size] == b[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchingBlock {
    /// Start offset in the first sequence (in chars)
    pub a: usize,
    /// Start offset in the second sequence (in chars)
    pub b: usize,
    /// Length of the run (in chars)
    pub size: usize,
}

/// Matcher with a pre-indexed second sequence
///
/// # Example
///
/// ```
/// use sentbench_core::similarity::SequenceMatcher;
///
/// let matcher = SequenceMatcher::new("This is a test.");
/// let candidate: Vec<char> = "This is a test.".chars().collect();
/// assert_eq!(matcher.ratio(&candidate), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    b: Vec<char>,
    /// char -> ascending positions in `b`, minus popular chars
    b2j: HashMap<char, Vec<usize>>,
    /// Full character counts of `b`, used by `quick_ratio`
    full_counts: HashMap<char, usize>,
}

impl SequenceMatcher {
    /// Index `b` with the autojunk heuristic enabled
    pub fn new(b: &str) -> Self {
        Self::with_autojunk(b, true)
    }

    /// Index `b`, optionally dropping popular characters from the index
    ///
    /// When `autojunk` is set and `b` has at least [`AUTOJUNK_MIN_LEN`] chars,
    /// any char occurring more than `len / 100 + 1` times is left out of the
    /// index. Such chars can still be matched by extending a block that was
    /// seeded on a non-popular char.
    pub fn with_autojunk(b: &str, autojunk: bool) -> Self {
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &ch) in b.iter().enumerate() {
            b2j.entry(ch).or_default().push(j);
        }

        let full_counts = b2j.iter().map(|(&ch, idx)| (ch, idx.len())).collect();

        let n = b.len();
        if autojunk && n >= AUTOJUNK_MIN_LEN {
            let threshold = n / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= threshold);
        }

        Self {
            b,
            b2j,
            full_counts,
        }
    }

    /// Length of the indexed sequence in chars
    pub fn len(&self) -> usize {
        self.b.len()
    }

    /// Whether the indexed sequence is empty
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Find the longest matching block in `a[alo..ahi]` and `b[blo..bhi]`
    ///
    /// Among equally long blocks, the one starting earliest in `a` wins, then
    /// the one starting earliest in `b`. Returns a block of size 0 at
    /// `(alo, blo)` when nothing matches.
    pub fn find_longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> MatchingBlock {
        let b = &self.b;
        let mut best = MatchingBlock {
            a: alo,
            b: blo,
            size: 0,
        };

        // j2len[j] = length of the longest match ending with a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(ch) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = j
                        .checked_sub(1)
                        .and_then(|p| j2len.get(&p))
                        .copied()
                        .unwrap_or(0);
                    let k = prev + 1;
                    new_j2len.insert(j, k);
                    if k > best.size {
                        best = MatchingBlock {
                            a: i + 1 - k,
                            b: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            j2len = new_j2len;
        }

        // Popular chars are not indexed, so grow the block over them
        while best.a > alo && best.b > blo && a[best.a - 1] == b[best.b - 1] {
            best.a -= 1;
            best.b -= 1;
            best.size += 1;
        }
        while best.a + best.size < ahi
            && best.b + best.size < bhi
            && a[best.a + best.size] == b[best.b + best.size]
        {
            best.size += 1;
        }

        best
    }

    /// All maximal matching blocks between `a` and the indexed sequence
    ///
    /// Blocks are sorted by position and adjacent blocks are merged, so no two
    /// returned blocks touch in both sequences.
    pub fn matching_blocks(&self, a: &[char]) -> Vec<MatchingBlock> {
        let mut queue = vec![(0, a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(a, alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            blocks.push(block);

            if alo < block.a && blo < block.b {
                queue.push((alo, block.a, blo, block.b));
            }
            if block.a + block.size < ahi && block.b + block.size < bhi {
                queue.push((block.a + block.size, ahi, block.b + block.size, bhi));
            }
        }

        blocks.sort_unstable();

        let mut merged: Vec<MatchingBlock> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }

        merged
    }

    /// Similarity ratio `2·M / T` between `a` and the indexed sequence
    pub fn ratio(&self, a: &[char]) -> f64 {
        let matches: usize = self.matching_blocks(a).iter().map(|m| m.size).sum();
        calculate_ratio(matches, a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from shared character counts
    pub fn quick_ratio(&self, a: &[char]) -> f64 {
        let mut available: HashMap<char, isize> = HashMap::new();
        let mut matches = 0;
        for ch in a {
            let remaining = available
                .entry(*ch)
                .or_insert_with(|| self.full_counts.get(ch).copied().unwrap_or(0) as isize);
            if *remaining > 0 {
                matches += 1;
            }
            *remaining -= 1;
        }
        calculate_ratio(matches, a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from lengths alone
    pub fn real_quick_ratio(&self, a: &[char]) -> f64 {
        let (la, lb) = (a.len(), self.b.len());
        calculate_ratio(la.min(lb), la + lb)
    }
}

/// Similarity ratio between two strings
///
/// `1.0` means identical, `0.0` means no character in common. Two empty
/// strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    SequenceMatcher::new(b).ratio(&a)
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / length as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_identical_strings() {
        assert_eq!(ratio("Hello world.", "Hello world."), 1.0);
    }

    #[test]
    fn test_empty_strings() {
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("abc", ""), 0.0);
        assert_eq!(ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_known_ratio() {
        // "abcd" vs "bcde": one block "bcd" of 3 chars
        assert!((ratio("abcd", "bcde") - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_find_longest_match_prefers_earliest() {
        let matcher = SequenceMatcher::new("abab");
        let a = chars("ab");
        let block = matcher.find_longest_match(&a, 0, a.len(), 0, matcher.len());
        assert_eq!(block, MatchingBlock { a: 0, b: 0, size: 2 });
    }

    #[test]
    fn test_matching_blocks_merge_adjacent() {
        let matcher = SequenceMatcher::new("abxcd");
        let a = chars("abcd");
        let blocks = matcher.matching_blocks(&a);
        assert_eq!(
            blocks,
            vec![
                MatchingBlock { a: 0, b: 0, size: 2 },
                MatchingBlock { a: 2, b: 3, size: 2 },
            ]
        );
    }

    #[test]
    fn test_merged_sentence_against_part() {
        let matcher = SequenceMatcher::new("Hello world.");
        let a = chars("Hello world. Goodbye.");
        let blocks = matcher.matching_blocks(&a);
        assert_eq!(blocks, vec![MatchingBlock { a: 0, b: 0, size: 12 }]);
        assert!((matcher.ratio(&a) - 24.0 / 33.0).abs() < 1e-12);
    }

    #[test]
    fn test_unicode_counts_chars_not_bytes() {
        // 5 and 6 chars, 4 shared in one block
        assert!((ratio("日本語です", "日本語でした") - 8.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_upper_bounds() {
        let matcher = SequenceMatcher::new("The quick brown fox.");
        let a = chars("A quick brown dog.");
        let exact = matcher.ratio(&a);
        assert!(matcher.quick_ratio(&a) >= exact);
        assert!(matcher.real_quick_ratio(&a) >= matcher.quick_ratio(&a));
    }

    #[test]
    fn test_autojunk_drops_popular_chars_from_index() {
        let long = "a".repeat(AUTOJUNK_MIN_LEN) + "b";
        let junked = SequenceMatcher::with_autojunk(&long, true);
        let plain = SequenceMatcher::with_autojunk(&long, false);

        assert!(!junked.b2j.contains_key(&'a'));
        assert!(plain.b2j.contains_key(&'a'));

        // No seed to extend from: 'x' is absent and 'a' is popular
        let a = chars("xaaaa");
        assert_eq!(junked.ratio(&a), 0.0);
        assert!(plain.ratio(&a) > 0.0);
    }

    #[test]
    fn test_autojunk_extends_over_popular_chars() {
        let long = "a".repeat(AUTOJUNK_MIN_LEN) + "b";
        let matcher = SequenceMatcher::new(&long);
        // "aab" is seeded on 'b' and then extended left over the popular 'a's
        let a = chars("aab");
        let blocks = matcher.matching_blocks(&a);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].size, 3);
    }

    #[test]
    fn test_short_sequences_ignore_autojunk() {
        let with = SequenceMatcher::with_autojunk("aaaa", true);
        let without = SequenceMatcher::with_autojunk("aaaa", false);
        let a = chars("aa");
        assert_eq!(with.ratio(&a), without.ratio(&a));
    }
}
