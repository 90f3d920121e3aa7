//! Bitboard rules engine for small Go boards.
//!
//! One `u64` per color holds the occupancy of boards up to 8x8; bit `i` is
//! the row-major cell `i`. Groups, liberties, and territory regions are all
//! found by bitwise flood fill (dilate-and-intersect to a fixed point), so a
//! move resolves in a handful of word operations.
//!
//! A running Zobrist hash over stone placement identifies the occupancy
//! pattern for superko comparison: two boards with identical stones always
//! hash identically, regardless of move order.

use std::fmt;
use std::sync::OnceLock;

use crate::constants::{MAX_CELLS, MAX_N, MAX_PLIES, NUM_SYMMETRIES, ZOBRIST_SEED};

/// Stone color / side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other color.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }
}

/// Zobrist key material, generated once from a fixed seed.
struct Zobrist {
    /// Per-(cell, color) content keys.
    cells: [[u64; 2]; MAX_CELLS],
    /// Per-(ply, cell) path keys for the transposition hashes.
    paths: Vec<[u64; MAX_CELLS]>,
}

fn zobrist() -> &'static Zobrist {
    static TABLES: OnceLock<Zobrist> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut rng = fastrand::Rng::with_seed(ZOBRIST_SEED);
        let mut cells = [[0u64; 2]; MAX_CELLS];
        for cell in cells.iter_mut() {
            cell[0] = rng.u64(..);
            cell[1] = rng.u64(..);
        }
        let paths = (0..MAX_PLIES)
            .map(|_| {
                let mut row = [0u64; MAX_CELLS];
                for key in row.iter_mut() {
                    *key = rng.u64(..);
                }
                row
            })
            .collect();
        Zobrist { cells, paths }
    })
}

/// Hash contribution of playing cell `ind` at ply `ply`, XOR-ed into the
/// incremental path hash. Distinct from the content keys; passes never
/// contribute.
///
/// # Panics
/// Panics once a game outgrows the key table ([`MAX_PLIES`]): reusing keys
/// would silently alias transposition entries across plies.
pub(crate) fn path_key(ind: usize, ply: usize) -> u64 {
    assert!(ply < MAX_PLIES, "game exceeded {MAX_PLIES} plies");
    zobrist().paths[ply][ind]
}

/// A Go board of side `n` with `n * n <= 64`.
///
/// `Board` is `Copy`: every speculative move operates on a duplicate, so a
/// failed or reverted attempt never corrupts the authoritative state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    n: u8,
    /// Low `n * n` bits, the playable cells.
    mask: u64,
    /// Cells in column 0 (no western neighbor).
    west_edge: u64,
    /// Cells in column n-1 (no eastern neighbor).
    east_edge: u64,
    /// Occupancy per color, indexed by `Color::index`.
    stones: [u64; 2],
    hash: u64,
}

impl Board {
    /// Create an empty board of side `n`.
    ///
    /// # Panics
    /// Panics if `n` is 0 or `n * n` exceeds 64 cells.
    pub fn new(n: usize) -> Self {
        assert!(n >= 1 && n <= MAX_N, "board side must be 1..={MAX_N}");
        let cells = n * n;
        let mask = if cells == 64 { !0 } else { (1u64 << cells) - 1 };
        let mut west_edge = 0u64;
        let mut east_edge = 0u64;
        for row in 0..n {
            west_edge |= 1u64 << (row * n);
            east_edge |= 1u64 << (row * n + n - 1);
        }
        Board {
            n: n as u8,
            mask,
            west_edge,
            east_edge,
            stones: [0, 0],
            hash: 0,
        }
    }

    /// Board side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.n as usize
    }

    /// Number of playable cells.
    #[inline]
    pub fn cells(&self) -> usize {
        (self.n as usize) * (self.n as usize)
    }

    /// Occupancy bit-set of one color.
    #[inline]
    pub fn stones(&self, color: Color) -> u64 {
        self.stones[color.index()]
    }

    /// Content hash over stone placement, suitable for superko comparison.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Union of both colors.
    #[inline]
    fn occupied(&self) -> u64 {
        self.stones[0] | self.stones[1]
    }

    /// Empty playable cells.
    #[inline]
    pub fn empty_points(&self) -> u64 {
        !self.occupied() & self.mask
    }

    /// 4-neighbor dilation of a cell set, clipped to the board.
    #[inline]
    fn adjacent(&self, bits: u64) -> u64 {
        let n = self.n as u32;
        let east = (bits & !self.east_edge) << 1;
        let west = (bits & !self.west_edge) >> 1;
        let north = bits >> n;
        let south = (bits << n) & self.mask;
        east | west | north | south
    }

    /// The group of `color` stones containing `seed`, or 0 if `seed` holds
    /// no such stone.
    fn group_of(&self, seed: u64, color: Color) -> u64 {
        let field = self.stones[color.index()];
        if field & seed == 0 {
            return 0;
        }
        let mut grp = seed;
        loop {
            let next = (grp | self.adjacent(grp)) & field;
            if next == grp {
                return grp;
            }
            grp = next;
        }
    }

    /// Liberty set of a group.
    #[inline]
    fn liberties(&self, grp: u64) -> u64 {
        self.adjacent(grp) & self.empty_points()
    }

    /// True if the group at `ind` has exactly one liberty.
    pub fn atari(&self, ind: usize) -> bool {
        let bit = 1u64 << ind;
        for color in [Color::Black, Color::White] {
            let grp = self.group_of(bit, color);
            if grp != 0 {
                return self.liberties(grp).count_ones() == 1;
            }
        }
        false
    }

    /// Toggle a set of stones of one color, updating the content hash
    /// per stone.
    fn toggle(&mut self, bits: u64, color: Color) {
        let keys = &zobrist().cells;
        let mut rest = bits;
        while rest != 0 {
            let ind = rest.trailing_zeros() as usize;
            self.hash ^= keys[ind][color.index()];
            rest &= rest - 1;
        }
        self.stones[color.index()] ^= bits;
    }

    /// Play a stone of `color` at cell `ind`.
    ///
    /// Fails (returns `false`, state unchanged) if the cell is occupied, out
    /// of range, or the move is suicide. On success, adjacent opposing
    /// groups left without liberties are removed and the hash is updated
    /// incrementally.
    pub fn play(&mut self, ind: usize, color: Color) -> bool {
        if ind >= self.cells() {
            return false;
        }
        let bit = 1u64 << ind;
        if self.occupied() & bit != 0 {
            return false;
        }

        let saved = *self;
        self.toggle(bit, color);

        let opp = color.opponent();
        let mut checked = 0u64;
        let mut nbrs = self.adjacent(bit) & self.stones[opp.index()];
        while nbrs != 0 {
            let seed = nbrs & nbrs.wrapping_neg();
            nbrs &= nbrs - 1;
            if checked & seed != 0 {
                continue;
            }
            let grp = self.group_of(seed, opp);
            checked |= grp;
            if self.liberties(grp) == 0 {
                self.toggle(grp, opp);
            }
        }

        // Suicide: own group ends up with no liberties and nothing was
        // captured to open one.
        if self.liberties(self.group_of(bit, color)) == 0 {
            *self = saved;
            return false;
        }
        true
    }

    /// Area score for `color`: own stones plus empty regions bordered only
    /// by own stones, minus the same count for the opponent. Symmetric:
    /// `score(c) == -score(c.opponent())`.
    pub fn score(&self, color: Color) -> f32 {
        let mut area = [
            self.stones[0].count_ones() as i32,
            self.stones[1].count_ones() as i32,
        ];

        let mut remaining = self.empty_points();
        while remaining != 0 {
            let seed = remaining & remaining.wrapping_neg();
            let region = self.empty_region(seed);
            remaining &= !region;

            let border = self.adjacent(region);
            let black = border & self.stones[0] != 0;
            let white = border & self.stones[1] != 0;
            if black && !white {
                area[0] += region.count_ones() as i32;
            } else if white && !black {
                area[1] += region.count_ones() as i32;
            }
        }

        let diff = (area[0] - area[1]) as f32;
        match color {
            Color::Black => diff,
            Color::White => -diff,
        }
    }

    /// The connected empty region containing `seed`.
    fn empty_region(&self, seed: u64) -> u64 {
        let empty = self.empty_points();
        let mut region = seed;
        loop {
            let next = (region | self.adjacent(region)) & empty;
            if next == region {
                return region;
            }
            region = next;
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.n as usize;
        for row in 0..n {
            for col in 0..n {
                let bit = 1u64 << (row * n + col);
                let ch = if self.stones[0] & bit != 0 {
                    'X'
                } else if self.stones[1] & bit != 0 {
                    'O'
                } else {
                    '.'
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// =============================================================================
// Symmetry maps
// =============================================================================

/// Cell permutation for a 90-degree rotation: (r, c) -> (c, n-1-r).
pub fn rotation_map(n: usize) -> Vec<usize> {
    (0..n * n)
        .map(|ind| {
            let (r, c) = (ind / n, ind % n);
            c * n + (n - 1 - r)
        })
        .collect()
}

/// Cell permutation for a horizontal flip: (r, c) -> (r, n-1-c).
pub fn reflection_map(n: usize) -> Vec<usize> {
    (0..n * n)
        .map(|ind| {
            let (r, c) = (ind / n, ind % n);
            r * n + (n - 1 - c)
        })
        .collect()
}

/// The 8 symmetry permutations of a square board: the identity, three
/// further rotations, and the reflection composed with each rotation.
pub fn symmetry_maps(n: usize) -> [Vec<usize>; NUM_SYMMETRIES] {
    let rot = rotation_map(n);
    let flip = reflection_map(n);
    let compose = |outer: &[usize], inner: &[usize]| -> Vec<usize> {
        inner.iter().map(|&i| outer[i]).collect()
    };

    let identity: Vec<usize> = (0..n * n).collect();
    let r1 = compose(&rot, &identity);
    let r2 = compose(&rot, &r1);
    let r3 = compose(&rot, &r2);
    let f0 = compose(&flip, &identity);
    let f1 = compose(&flip, &r1);
    let f2 = compose(&flip, &r2);
    let f3 = compose(&flip, &r3);
    [identity, r1, r2, r3, f0, f1, f2, f3]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_never_overlap() {
        let mut b = Board::new(3);
        assert!(b.play(4, Color::Black));
        assert!(b.play(1, Color::White));
        assert!(b.play(3, Color::Black));
        assert_eq!(b.stones(Color::Black) & b.stones(Color::White), 0);
    }

    #[test]
    fn test_occupied_rejected() {
        let mut b = Board::new(3);
        assert!(b.play(4, Color::Black));
        let before = b;
        assert!(!b.play(4, Color::White));
        assert_eq!(b, before, "failed move must not change state");
    }

    #[test]
    fn test_single_stone_capture() {
        // White at the corner, Black fills both its liberties.
        let mut b = Board::new(3);
        assert!(b.play(0, Color::White));
        assert!(b.play(1, Color::Black));
        assert!(b.play(3, Color::Black));
        assert_eq!(b.stones(Color::White), 0, "corner stone captured");
        // Capture opens the corner again.
        assert!(b.empty_points() & 1 != 0);
    }

    #[test]
    fn test_group_capture() {
        // White pair on the top edge of a 3x3, Black surrounds it.
        let mut b = Board::new(3);
        assert!(b.play(0, Color::White));
        assert!(b.play(1, Color::White));
        assert!(b.play(3, Color::Black));
        assert!(b.play(4, Color::Black));
        assert!(b.play(2, Color::Black));
        assert_eq!(b.stones(Color::White), 0);
        assert_eq!(b.stones(Color::Black).count_ones(), 3);
    }

    #[test]
    fn test_suicide_rejected() {
        // Corner surrounded by Black; White playing in is suicide.
        let mut b = Board::new(3);
        assert!(b.play(1, Color::Black));
        assert!(b.play(3, Color::Black));
        let before = b;
        assert!(!b.play(0, Color::White));
        assert_eq!(b, before);
    }

    #[test]
    fn test_capture_beats_suicide() {
        // Black plays a cell with no liberties of its own, but the placement
        // captures the corner stone whose last liberty it fills.
        let mut b = Board::new(3);
        assert!(b.play(0, Color::White));
        assert!(b.play(1, Color::Black));
        assert!(b.play(4, Color::White));
        assert!(b.play(6, Color::White));
        // Cell 3 is surrounded by White (0, 4, 6) before resolution.
        assert!(b.play(3, Color::Black));
        assert_eq!(b.stones(Color::White) & 1, 0, "corner White captured");
        assert!(b.stones(Color::Black) & (1 << 3) != 0);
    }

    #[test]
    fn test_hash_depends_on_occupancy_only() {
        // Same final occupancy reached by different orders hashes equal.
        let mut a = Board::new(3);
        a.play(0, Color::Black);
        a.play(8, Color::White);
        let mut b = Board::new(3);
        b.play(8, Color::White);
        b.play(0, Color::Black);
        assert_eq!(a.hash(), b.hash());
        assert_ne!(a.hash(), Board::new(3).hash());
    }

    #[test]
    fn test_hash_restored_after_capture_cycle() {
        // A board that gains and then loses a stone through capture hashes
        // the same as one that never saw the stone.
        let mut b = Board::new(3);
        b.play(1, Color::Black);
        b.play(0, Color::White);
        b.play(3, Color::Black);
        assert_eq!(b.stones(Color::White), 0, "white stone captured");

        let mut reference = Board::new(3);
        reference.play(1, Color::Black);
        reference.play(3, Color::Black);
        assert_eq!(b.hash(), reference.hash());
    }

    #[test]
    fn test_atari() {
        let mut b = Board::new(3);
        b.play(0, Color::White);
        assert!(!b.atari(0), "corner stone starts with two liberties");
        b.play(1, Color::Black);
        assert!(b.atari(0));
        assert!(!b.atari(4), "empty cell is never in atari");
    }

    #[test]
    fn test_score_symmetric() {
        let mut b = Board::new(3);
        b.play(4, Color::Black);
        b.play(0, Color::White);
        assert_eq!(b.score(Color::Black), -b.score(Color::White));
    }

    #[test]
    fn test_score_territory() {
        // Black middle column owns both empty columns: 3 stones + 6 territory.
        let mut b = Board::new(3);
        b.play(1, Color::Black);
        b.play(4, Color::Black);
        b.play(7, Color::Black);
        assert_eq!(b.score(Color::Black), 9.0);
        assert_eq!(b.score(Color::White), -9.0);
    }

    #[test]
    fn test_empty_points() {
        let mut b = Board::new(2);
        assert_eq!(b.empty_points().count_ones(), 4);
        b.play(0, Color::Black);
        assert_eq!(b.empty_points().count_ones(), 3);
    }

    #[test]
    fn test_rotation_map_order_four() {
        for n in [2, 3, 5] {
            let rot = rotation_map(n);
            let mut ind: Vec<usize> = (0..n * n).collect();
            for _ in 0..4 {
                ind = ind.iter().map(|&i| rot[i]).collect();
            }
            assert_eq!(ind, (0..n * n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_reflection_map_involution() {
        let flip = reflection_map(3);
        for i in 0..9 {
            assert_eq!(flip[flip[i]], i);
        }
    }

    #[test]
    fn test_symmetry_maps_are_permutations() {
        for map in symmetry_maps(3) {
            let mut seen = [false; 9];
            for &i in &map {
                assert!(!seen[i]);
                seen[i] = true;
            }
        }
    }

    #[test]
    fn test_path_keys_distinct_across_plies_and_cells() {
        assert_ne!(path_key(0, 0), path_key(0, 1));
        assert_ne!(path_key(0, 0), path_key(1, 0));
        assert_ne!(path_key(5, MAX_PLIES - 1), path_key(5, 0));
    }

    #[test]
    #[should_panic(expected = "plies")]
    fn test_path_key_rejects_ply_overflow() {
        path_key(0, MAX_PLIES);
    }

    #[test]
    fn test_full_board_8x8_mask() {
        let b = Board::new(8);
        assert_eq!(b.empty_points(), !0u64);
    }
}
