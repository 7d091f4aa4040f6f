//! Block-matching string similarity

/// Similarity of two names in `[0, 1]`, compared case-insensitively.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    block_ratio(&a, &b)
}

/// `2 * matched / (len(a) + len(b))`, where `matched` is the total length of
/// the matching blocks: the longest common run, then recursively the longest
/// runs left of it and right of it. Two empty inputs are identical.
pub(crate) fn block_ratio<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    let length = a.len() + b.len();
    if length == 0 {
        return 1.0;
    }
    2.0 * matched_len(a, b) as f64 / length as f64
}

fn matched_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common contiguous run inside `a[alo..ahi]` and `b[blo..bhi]`.
/// Ties go to the run starting earliest in `a`, then earliest in `b`.
fn longest_match<T: PartialEq>(
    a: &[T],
    b: &[T],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    let width = bhi - blo;
    // run length ending at (i - 1, j - 1), indexed by j - blo + 1
    let mut previous = vec![0usize; width + 1];
    let mut current = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let slot = j - blo + 1;
            current[slot] = if a[i] == b[j] { previous[slot - 1] + 1 } else { 0 };
            let size = current[slot];
            if size > best_size {
                best_i = i + 1 - size;
                best_j = j + 1 - size;
                best_size = size;
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::{block_ratio, name_similarity};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_names_are_fully_similar() {
        assert!(close(name_similarity("Lapte Zuzu 1L", "Lapte Zuzu 1L"), 1.0));
    }

    #[test]
    fn comparison_ignores_case() {
        assert!(close(name_similarity("LAPTE", "lapte"), 1.0));
    }

    #[test]
    fn disjoint_names_have_zero_similarity() {
        assert!(close(name_similarity("abc", "xyz"), 0.0));
    }

    #[test]
    fn matches_reference_block_ratios() {
        // abcd / bcde share "bcd": 2 * 3 / 8
        assert!(close(name_similarity("abcd", "bcde"), 0.75));
        // "abxcd" / "abcd": blocks "ab" then "cd" on the right remainder
        assert!(close(name_similarity("abxcd", "abcd"), 8.0 / 9.0));
    }

    #[test]
    fn rewards_contiguous_runs_over_shared_characters() {
        // same multiset of characters, but only single-char blocks line up
        let scrambled = name_similarity("abcd", "dcba");
        let shifted = name_similarity("abcd", "xabc");
        assert!(shifted > scrambled);
        assert!(close(scrambled, 0.25));
    }

    #[test]
    fn two_empty_sequences_are_identical() {
        let empty: [char; 0] = [];
        assert!(close(block_ratio(&empty, &empty), 1.0));
        assert!(close(name_similarity("", "abc"), 0.0));
    }
}
