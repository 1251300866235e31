//! Global pairwise sequence alignment.
//!
//! Needleman-Wunsch with affine gap penalties (Gotoh's three-state recurrence) over the
//! BLOSUM62 substitution matrix. Used to decide which residues of two chains correspond
//! before superposing them.

use std::cmp::max;

/// Order: A R N D C Q E G H I L K M F P S T W Y V
const BLOSUM62: [[i32; 20]; 20] = [
    [4, -1, -2, -2, 0, -1, -1, 0, -2, -1, -1, -1, -1, -2, -1, 1, 0, -3, -2, 0],
    [-1, 5, 0, -2, -3, 1, 0, -2, 0, -3, -2, 2, -1, -3, -2, -1, -1, -3, -2, -3],
    [-2, 0, 6, 1, -3, 0, 0, 0, 1, -3, -3, 0, -2, -3, -2, 1, 0, -4, -2, -3],
    [-2, -2, 1, 6, -3, 0, 2, -1, -1, -3, -4, -1, -3, -3, -1, 0, -1, -4, -3, -3],
    [0, -3, -3, -3, 9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1],
    [-1, 1, 0, 0, -3, 5, 2, -2, 0, -3, -2, 1, 0, -3, -1, 0, -1, -2, -1, -2],
    [-1, 0, 0, 2, -4, 2, 5, -2, 0, -3, -3, 1, -2, -3, -1, 0, -1, -3, -2, -2],
    [0, -2, 0, -1, -3, -2, -2, 6, -2, -4, -4, -2, -3, -3, -2, 0, -2, -2, -3, -3],
    [-2, 0, 1, -1, -3, 0, 0, -2, 8, -3, -3, -1, -2, -1, -2, -1, -2, -2, 2, -3],
    [-1, -3, -3, -3, -1, -3, -3, -4, -3, 4, 2, -3, 1, 0, -3, -2, -1, -3, -1, 3],
    [-1, -2, -3, -4, -1, -2, -3, -4, -3, 2, 4, -2, 2, 0, -3, -2, -1, -2, -1, 1],
    [-1, 2, 0, -1, -3, 1, 1, -2, -1, -3, -2, 5, -1, -3, -1, 0, -1, -3, -2, -2],
    [-1, -1, -2, -3, -1, 0, -2, -3, -2, 1, 2, -1, 5, 0, -2, -1, -1, -1, -1, 1],
    [-2, -3, -3, -3, -2, -3, -3, -3, -1, 0, 0, -3, 0, 6, -4, -2, -2, 1, 3, -1],
    [-1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4, 7, -1, -1, -4, -3, -2],
    [1, -1, 1, 0, -1, 0, 0, 0, -1, -2, -2, 0, -1, -2, -1, 4, 1, -3, -2, -2],
    [0, -1, 0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1, 1, 5, -2, -2, 0],
    [-3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1, 1, -4, -3, -2, 11, 2, -3],
    [-2, -2, -2, -3, -2, -1, -2, -3, 2, -1, -1, -2, -1, 3, -3, -2, -2, 2, 7, -1],
    [0, -3, -3, -3, -1, -2, -2, -3, -3, 3, 1, -2, 1, -1, -2, -2, 0, -3, -1, 4],
];

/// Score of any pairing that involves an unrecognized residue.
const UNKNOWN_SCORE: i32 = -1;

const NEG_INF: i64 = i64::MIN / 4;

fn blosum_index(aa: u8) -> Option<usize> {
    let idx = match aa.to_ascii_uppercase() {
        b'A' => 0,
        b'R' => 1,
        b'N' => 2,
        b'D' => 3,
        b'C' => 4,
        b'Q' => 5,
        b'E' => 6,
        b'G' => 7,
        b'H' => 8,
        b'I' => 9,
        b'L' => 10,
        b'K' => 11,
        b'M' => 12,
        b'F' => 13,
        b'P' => 14,
        b'S' => 15,
        b'T' => 16,
        b'W' => 17,
        b'Y' => 18,
        b'V' => 19,
        _ => return None,
    };
    Some(idx)
}

pub fn substitution_score(a: u8, b: u8) -> i32 {
    match (blosum_index(a), blosum_index(b)) {
        (Some(i), Some(j)) => BLOSUM62[i][j],
        _ => UNKNOWN_SCORE,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceAlignment {
    pub score: i64,
    /// Index pairs `(i, j)` of aligned (non-gap) positions, increasing in both.
    pub pairs: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Match,
    GapInB,
    GapInA,
}

struct Table {
    cols: usize,
    cells: Vec<i64>,
}

impl Table {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            cells: vec![NEG_INF; rows * cols],
        }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> i64 {
        self.cells[i * self.cols + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: i64) {
        self.cells[i * self.cols + j] = value;
    }
}

/// Aligns `seq_a` against `seq_b` end to end.
///
/// A gap of length `k` costs `gap_open + (k - 1) * gap_extend`. Both penalties are given as
/// positive numbers. Ties are resolved in favor of matches, then gaps in `seq_b`.
///
/// Scores are accumulated in `i64`, so any `i32` penalty is safe.
pub fn needleman_wunsch(
    seq_a: &[u8],
    seq_b: &[u8],
    gap_open: i32,
    gap_extend: i32,
) -> SequenceAlignment {
    let gap_open = i64::from(gap_open);
    let gap_extend = i64::from(gap_extend);
    let m = seq_a.len();
    let n = seq_b.len();
    if m == 0 || n == 0 {
        return SequenceAlignment {
            score: 0,
            pairs: Vec::new(),
        };
    }

    let mut mat = Table::new(m + 1, n + 1);
    let mut gap_b = Table::new(m + 1, n + 1);
    let mut gap_a = Table::new(m + 1, n + 1);

    mat.set(0, 0, 0);
    for i in 1..=m {
        gap_b.set(i, 0, -gap_open - (i as i64 - 1) * gap_extend);
    }
    for j in 1..=n {
        gap_a.set(0, j, -gap_open - (j as i64 - 1) * gap_extend);
    }

    for i in 1..=m {
        for j in 1..=n {
            let diag = max(
                mat.get(i - 1, j - 1),
                max(gap_b.get(i - 1, j - 1), gap_a.get(i - 1, j - 1)),
            );
            mat.set(
                i,
                j,
                diag + i64::from(substitution_score(seq_a[i - 1], seq_b[j - 1])),
            );

            let up = max(
                max(mat.get(i - 1, j), gap_a.get(i - 1, j)) - gap_open,
                gap_b.get(i - 1, j) - gap_extend,
            );
            gap_b.set(i, j, up);

            let left = max(
                max(mat.get(i, j - 1), gap_b.get(i, j - 1)) - gap_open,
                gap_a.get(i, j - 1) - gap_extend,
            );
            gap_a.set(i, j, left);
        }
    }

    let (score, mut state) = best_of(mat.get(m, n), gap_b.get(m, n), gap_a.get(m, n));

    let mut pairs = Vec::with_capacity(m.min(n));
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        match state {
            State::Match => {
                pairs.push((i - 1, j - 1));
                state = best_of(
                    mat.get(i - 1, j - 1),
                    gap_b.get(i - 1, j - 1),
                    gap_a.get(i - 1, j - 1),
                )
                .1;
                i -= 1;
                j -= 1;
            }
            State::GapInB => {
                let current = gap_b.get(i, j);
                state = if current == gap_b.get(i - 1, j) - gap_extend {
                    State::GapInB
                } else if current == mat.get(i - 1, j) - gap_open {
                    State::Match
                } else {
                    State::GapInA
                };
                i -= 1;
            }
            State::GapInA => {
                let current = gap_a.get(i, j);
                state = if current == gap_a.get(i, j - 1) - gap_extend {
                    State::GapInA
                } else if current == mat.get(i, j - 1) - gap_open {
                    State::Match
                } else {
                    State::GapInB
                };
                j -= 1;
            }
        }
    }
    pairs.reverse();

    SequenceAlignment { score, pairs }
}

fn best_of(mat: i64, gap_b: i64, gap_a: i64) -> (i64, State) {
    if mat >= gap_b && mat >= gap_a {
        (mat, State::Match)
    } else if gap_b >= gap_a {
        (gap_b, State::GapInB)
    } else {
        (gap_a, State::GapInA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sequences_align_position_by_position() {
        let seq = b"MKTAYIAKQR";
        let result = needleman_wunsch(seq, seq, 10, 1);
        let expected: Vec<(usize, usize)> = (0..seq.len()).map(|i| (i, i)).collect();
        assert_eq!(result.pairs, expected);
        let self_score: i64 = seq.iter().map(|&c| i64::from(substitution_score(c, c))).sum();
        assert_eq!(result.score, self_score);
    }

    #[test]
    fn internal_deletion_opens_a_single_gap() {
        let result = needleman_wunsch(b"ACDEFGHIK", b"ACDGHIK", 10, 1);
        assert_eq!(
            result.pairs,
            vec![(0, 0), (1, 1), (2, 2), (5, 3), (6, 4), (7, 5), (8, 6)]
        );
        assert_eq!(result.score, 4 + 9 + 6 + 6 + 8 + 4 + 5 - 10 - 1);
    }

    #[test]
    fn terminal_extension_leaves_extra_residues_unpaired() {
        let result = needleman_wunsch(b"GSHMWCYRE", b"WCYRE", 10, 1);
        assert_eq!(result.pairs, vec![(4, 0), (5, 1), (6, 2), (7, 3), (8, 4)]);
    }

    #[test]
    fn empty_input_yields_no_pairs() {
        assert!(needleman_wunsch(b"", b"ACD", 10, 1).pairs.is_empty());
        assert!(needleman_wunsch(b"ACD", b"", 10, 1).pairs.is_empty());
    }

    #[test]
    fn unknown_residues_score_as_mild_mismatches() {
        assert_eq!(substitution_score(b'X', b'A'), UNKNOWN_SCORE);
        assert_eq!(substitution_score(b'w', b'W'), 11);
        let result = needleman_wunsch(b"AXC", b"AWC", 10, 1);
        assert_eq!(result.pairs, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn huge_penalties_do_not_overflow() {
        let result = needleman_wunsch(b"ACDEFGHIKL", b"ACD", 10, 1_000_000_000);
        assert_eq!(result.pairs.len(), 3);
        assert!(result.score < -1_000_000_000);

        let result = needleman_wunsch(b"WCYRE", b"GSHMWCYRE", i32::MAX, i32::MAX);
        assert_eq!(result.pairs, vec![(0, 4), (1, 5), (2, 6), (3, 7), (4, 8)]);
    }
}
