use log::debug;
use rayon::prelude::*;

/// Inputs above this size sort their suffix index on the rayon pool.
const PAR_SORT_THRESHOLD: usize = 40_000;

/// How many equally-long candidates a query keeps examining while it looks
/// for a closer one. Only the choice between equal-length matches is
/// affected, never the match length itself.
const TIE_SCAN_LIMIT: usize = 32;

/// Sliding-window match finder backed by a suffix array.
///
/// Construction sorts the suffix index by prefix doubling, inverts it into a
/// rank array, and derives the adjacent-LCP array with Kasai's walk, all in
/// one pass over the input. Queries then never touch the raw window again:
/// the candidates for `longest_match(pos)` are the suffixes nearest to
/// `pos` in rank order, and the common-prefix length to any of them is the
/// running minimum of the adjacent LCP values along the way.
pub struct SuffixArray<'a> {
    data: &'a [u8],
    sa: Vec<u32>,
    rank: Vec<u32>,
    lcp: Vec<u32>,
    look_ahead: usize,
    max_distance: usize,
    min_len: usize,
}

impl<'a> SuffixArray<'a> {
    /// Build the search structure for `data`. Matches are capped at
    /// `look_ahead` bytes and must start within `search − 1` bytes behind
    /// the query position.
    pub fn new(data: &'a [u8], look_ahead: usize, search: usize, min_len: usize) -> Self {
        let sa = build_suffix_array(data);
        let mut rank = vec![0_u32; data.len()];
        for (r, &i) in sa.iter().enumerate() {
            rank[i as usize] = r as u32;
        }
        let lcp = build_lcp(data, &sa, &rank, look_ahead);
        debug!("suffix array over {} bytes ready", data.len());
        Self {
            data,
            sa,
            rank,
            lcp,
            look_ahead,
            max_distance: search - 1,
            min_len,
        }
    }

    /// Longest match of `data[pos..]` against the window behind `pos`,
    /// as `(length, distance)`. Length is 0 (no match of at least
    /// `min_len` bytes) or in `[min_len, look_ahead]`; a non-zero result
    /// satisfies `data[pos - distance..][..length] == data[pos..][..length]`.
    /// Equally long candidates resolve to the smallest distance, which keeps
    /// the encoded offset field narrow.
    pub fn longest_match(&self, pos: usize) -> (usize, usize) {
        let n = self.data.len();
        if pos == 0 || pos >= n {
            return (0, 0);
        }

        let rank = self.rank[pos] as usize;
        let mut best_len = 0_usize;
        let mut best_dist = 0_usize;

        // Upward in rank space. The running minimum of adjacent LCPs is the
        // exact common-prefix length to each candidate, and it only shrinks
        // as the scan moves away, so the first in-window candidate already
        // carries this direction's best length.
        let mut run = usize::MAX;
        let mut ties = 0_usize;
        for r in (0..rank).rev() {
            run = run.min(self.lcp[r + 1] as usize);
            if run < self.min_len || run < best_len {
                break;
            }
            let start = self.sa[r] as usize;
            if start < pos && pos - start <= self.max_distance {
                self.consider(pos, start, run, &mut best_len, &mut best_dist);
                ties += 1;
                if ties >= TIE_SCAN_LIMIT {
                    break;
                }
            }
        }

        // Downward in rank space, same rules.
        run = usize::MAX;
        ties = 0;
        for r in rank + 1..n {
            run = run.min(self.lcp[r] as usize);
            if run < self.min_len || run < best_len {
                break;
            }
            let start = self.sa[r] as usize;
            if start < pos && pos - start <= self.max_distance {
                self.consider(pos, start, run, &mut best_len, &mut best_dist);
                ties += 1;
                if ties >= TIE_SCAN_LIMIT {
                    break;
                }
            }
        }

        if best_len >= self.min_len {
            debug_assert_eq!(
                &self.data[pos - best_dist..pos - best_dist + best_len],
                &self.data[pos..pos + best_len]
            );
            (best_len, best_dist)
        } else {
            (0, 0)
        }
    }

    fn consider(
        &self,
        pos: usize,
        start: usize,
        run: usize,
        best_len: &mut usize,
        best_dist: &mut usize,
    ) {
        let length = run.min(self.look_ahead).min(self.data.len() - pos);
        let distance = pos - start;
        if length > *best_len || (length == *best_len && distance < *best_dist) {
            *best_len = length;
            *best_dist = distance;
        }
    }
}

/// Sort the suffix index by prefix doubling: each round orders suffixes by
/// their first 2k bytes using the rank pairs of the previous round, until
/// every suffix has a distinct rank.
fn build_suffix_array(data: &[u8]) -> Vec<u32> {
    let n = data.len();
    let mut sa: Vec<u32> = (0..n as u32).collect();
    if n < 2 {
        return sa;
    }

    let mut rank: Vec<u32> = data.iter().map(|&b| b as u32).collect();
    let mut next_rank = vec![0_u32; n];
    let mut k = 1_usize;

    loop {
        let key = |i: u32| -> (u32, u32) {
            let i = i as usize;
            let tail = if i + k < n { rank[i + k] + 1 } else { 0 };
            (rank[i], tail)
        };

        if n > PAR_SORT_THRESHOLD {
            sa.par_sort_unstable_by_key(|&i| key(i));
        } else {
            sa.sort_unstable_by_key(|&i| key(i));
        }

        next_rank[sa[0] as usize] = 0;
        for r in 1..n {
            let bump = (key(sa[r]) != key(sa[r - 1])) as u32;
            next_rank[sa[r] as usize] = next_rank[sa[r - 1] as usize] + bump;
        }
        let done = next_rank[sa[n - 1] as usize] as usize == n - 1;

        std::mem::swap(&mut rank, &mut next_rank);
        if done || k >= n {
            break;
        }
        k <<= 1;
    }
    sa
}

/// Kasai's adjacent-LCP construction, clamped at `cap`. Dropping from h to
/// h − 1 between consecutive text positions keeps the walk linear; the clamp
/// is safe because a clamped value still lower-bounds the next start.
fn build_lcp(data: &[u8], sa: &[u32], rank: &[u32], cap: usize) -> Vec<u32> {
    let n = data.len();
    let mut lcp = vec![0_u32; n];
    let mut h = 0_usize;
    for i in 0..n {
        let r = rank[i] as usize;
        if r == 0 {
            h = 0;
            continue;
        }
        let j = sa[r - 1] as usize;
        while h < cap && i + h < n && j + h < n && data[i + h] == data[j + h] {
            h += 1;
        }
        lcp[r] = h as u32;
        if h > 0 {
            h -= 1;
        }
    }
    lcp
}

#[cfg(test)]
mod test {
    use super::{build_suffix_array, SuffixArray};

    const LOOK_AHEAD: usize = 259;
    const SEARCH: usize = 65_537;
    const MIN_LEN: usize = 4;

    fn finder(data: &[u8]) -> SuffixArray<'_> {
        SuffixArray::new(data, LOOK_AHEAD, SEARCH, MIN_LEN)
    }

    #[test]
    fn agrees_with_a_naive_suffix_sort() {
        let data = b"mississippi banana mississippi";
        let mut naive: Vec<u32> = (0..data.len() as u32).collect();
        naive.sort_by_key(|&i| &data[i as usize..]);
        assert_eq!(build_suffix_array(data), naive);
    }

    #[test]
    fn banana_order() {
        assert_eq!(build_suffix_array(b"banana"), vec![5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn finds_a_simple_repeat() {
        let sa = finder(b"abcabcabc");
        assert_eq!(sa.longest_match(3), (6, 3));
    }

    #[test]
    fn short_repeats_are_not_matches() {
        let sa = finder(b"abcabcabc");
        // Only three bytes remain at position 6, under the minimum length.
        assert_eq!(sa.longest_match(6), (0, 0));
    }

    #[test]
    fn no_match_in_unique_data() {
        let sa = finder(b"abcdefgh");
        for pos in 0..8 {
            assert_eq!(sa.longest_match(pos), (0, 0));
        }
    }

    #[test]
    fn overlapping_run_matches_at_distance_two() {
        let sa = finder(&[1, 2, 1, 2, 1, 2, 1, 2]);
        assert_eq!(sa.longest_match(2), (6, 2));
    }

    #[test]
    fn self_overlap_prefers_distance_one() {
        let data = vec![0_u8; 300];
        let sa = finder(&data);
        // 299 bytes remain but the look-ahead caps the match.
        assert_eq!(sa.longest_match(1), (LOOK_AHEAD, 1));
    }

    #[test]
    fn match_length_clamps_at_end_of_input() {
        let sa = finder(b"aaaaaaaa");
        assert_eq!(sa.longest_match(1), (7, 1));
    }

    #[test]
    fn window_excludes_distant_matches() {
        let mut data = vec![0_u8; 66_008];
        data[..4].copy_from_slice(&[9, 8, 7, 6]);
        data[66_004..].copy_from_slice(&[9, 8, 7, 6]);
        let sa = finder(&data);
        // The only other occurrence sits 66 004 bytes back, past the window.
        assert_eq!(sa.longest_match(66_004), (0, 0));
    }

    #[test]
    fn window_edge_is_inclusive() {
        let mut data = vec![0_u8; 65_540];
        data[..4].copy_from_slice(&[9, 8, 7, 6]);
        data[65_536..].copy_from_slice(&[9, 8, 7, 6]);
        let sa = finder(&data);
        assert_eq!(sa.longest_match(65_536), (4, 65_536));
    }

    #[test]
    fn position_zero_never_matches() {
        let sa = finder(b"aaaa aaaa");
        assert_eq!(sa.longest_match(0), (0, 0));
    }
}
