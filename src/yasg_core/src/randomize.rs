use log::{debug, trace};

use crate::{
    ScrambleError, Scrambler,
    cube::{CornerLoc, EdgeLoc, PieceSet},
};

impl Scrambler {
    /// Shuffle the pieces in the given slots uniformly among the permutations with even parity.
    ///
    /// Corners and edges are shuffled independently; if the combined number of swaps is odd, one
    /// extra swap of the first two corners or the first two edges restores the parity.
    pub fn random_permutation(&mut self, corners: &[CornerLoc], edges: &[EdgeLoc]) {
        debug!(
            "Permuting {} corners and {} edges",
            corners.len(),
            edges.len()
        );

        let mut odd_swaps = false;

        for i in 0..corners.len().saturating_sub(1) {
            let j = self.rng.usize(i..corners.len());
            if i != j {
                self.cube.swap_corners(corners[i], corners[j]);
                odd_swaps = !odd_swaps;
            }
        }

        for i in 0..edges.len().saturating_sub(1) {
            let j = self.rng.usize(i..edges.len());
            if i != j {
                self.cube.swap_edges(edges[i], edges[j]);
                odd_swaps = !odd_swaps;
            }
        }

        if !odd_swaps {
            return;
        }

        let can_swap_corners = corners.len() >= 2;
        let can_swap_edges = edges.len() >= 2;

        if can_swap_corners && (!can_swap_edges || self.rng.bool()) {
            trace!("Fixing parity with {} {}", corners[0], corners[1]);
            self.cube.swap_corners(corners[0], corners[1]);
        } else {
            trace!("Fixing parity with {} {}", edges[0], edges[1]);
            self.cube.swap_edges(edges[0], edges[1]);
        }
    }

    /// Twist the given corners uniformly at random while keeping the twist sum a multiple of three
    pub fn random_corner_orientation(&mut self, corners: &[CornerLoc]) {
        let Some((&last, rest)) = corners.split_last() else {
            return;
        };

        debug!("Twisting {} corners", corners.len());

        let mut total = 0;
        for &loc in rest {
            let turns = self.rng.u8(0..3);
            self.cube[loc].rotate_clockwise(turns);
            total = (total + turns) % 3;
        }

        self.cube[last].rotate_clockwise((3 - total) % 3);
    }

    /// Flip the given edges uniformly at random while keeping the number of flips even
    pub fn random_edge_orientation(&mut self, edges: &[EdgeLoc]) {
        let Some((&last, rest)) = edges.split_last() else {
            return;
        };

        debug!("Flipping {} edges", edges.len());

        let mut odd_flips = false;
        for &loc in rest {
            if self.rng.bool() {
                self.cube[loc].flip();
                odd_flips = !odd_flips;
            }
        }

        if odd_flips {
            self.cube[last].flip();
        }
    }

    /// Flip exactly `n` distinct edges chosen uniformly at random
    pub fn flip_exactly_n(&mut self, n: usize) -> Result<(), ScrambleError> {
        if n % 2 != 0 {
            return Err(ScrambleError::OddFlipCount(n));
        }

        if n > EdgeLoc::ALL.len() {
            return Err(ScrambleError::TooManyFlips(n));
        }

        let mut edges = EdgeLoc::ALL;
        self.rng.shuffle(&mut edges);

        for &loc in &edges[..n] {
            trace!("Flipping {loc}");
            self.cube[loc].flip();
        }

        Ok(())
    }

    /// Leave exactly `n` bad edges on the whole cube
    pub fn set_bad_edge_count(&mut self, n: usize) -> Result<(), ScrambleError> {
        // Validate before touching the cube
        if n % 2 != 0 {
            return Err(ScrambleError::OddFlipCount(n));
        }

        if n > EdgeLoc::ALL.len() {
            return Err(ScrambleError::TooManyFlips(n));
        }

        self.orient(&PieceSet::only_edges(EdgeLoc::ALL), &PieceSet::none());
        self.flip_exactly_n(n)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::{
        ScrambleError, Scrambler,
        cube::{CornerLoc, CubeState, EdgeLoc},
    };

    #[test]
    fn permutation_keeps_parity() {
        for seed in 0..200 {
            let mut scrambler = Scrambler::with_seed(seed);
            scrambler.random_permutation(&CornerLoc::ALL, &EdgeLoc::ALL);
            assert!(scrambler.cube().permutation_is_even(), "seed {seed}");

            let mut scrambler = Scrambler::with_seed(seed);
            scrambler.random_permutation(&[CornerLoc::URF, CornerLoc::UFL], &[EdgeLoc::UF]);
            assert!(scrambler.cube().permutation_is_even(), "seed {seed}");
            // A lone edge can't move, and two corners alone can only stay put
            assert!(scrambler.cube().is_solved(), "seed {seed}");
        }
    }

    #[test]
    fn permutation_only_touches_requested_slots() {
        let corners = [CornerLoc::URF, CornerLoc::UFL, CornerLoc::DBL];
        let edges = [EdgeLoc::UF, EdgeLoc::UB, EdgeLoc::FR, EdgeLoc::DL];

        for seed in 0..100 {
            let mut scrambler = Scrambler::with_seed(seed);
            scrambler.random_permutation(&corners, &edges);
            let cube = scrambler.cube();

            for loc in CornerLoc::ALL {
                if !corners.contains(&loc) {
                    assert!(cube.corner_is_solved(loc));
                }
            }
            for loc in EdgeLoc::ALL {
                if !edges.contains(&loc) {
                    assert!(cube.edge_is_solved(loc));
                }
            }
        }
    }

    #[test]
    fn permutation_reaches_odd_category_permutations() {
        // Two corners and two edges: the only reachable non-identity is both swapped
        let mut saw_swap = false;
        for seed in 0..50 {
            let mut scrambler = Scrambler::with_seed(seed);
            scrambler.random_permutation(
                &[CornerLoc::URF, CornerLoc::UFL],
                &[EdgeLoc::UF, EdgeLoc::UB],
            );
            let cube = scrambler.cube();
            assert_eq!(
                cube.corner_is_solved(CornerLoc::URF),
                cube.edge_is_solved(EdgeLoc::UF)
            );
            saw_swap |= !cube.corner_is_solved(CornerLoc::URF);
        }
        assert!(saw_swap);
    }

    #[test]
    fn orientation_keeps_invariants() {
        for seed in 0..200 {
            let mut scrambler = Scrambler::with_seed(seed);
            scrambler.random_corner_orientation(&CornerLoc::ALL);
            scrambler.random_edge_orientation(&EdgeLoc::ALL);
            assert!(scrambler.cube().is_reachable(), "seed {seed}");

            scrambler.random_corner_orientation(&[CornerLoc::URF, CornerLoc::DLF]);
            scrambler.random_edge_orientation(&[EdgeLoc::FL, EdgeLoc::BR, EdgeLoc::UB]);
            assert!(scrambler.cube().is_reachable(), "seed {seed}");
        }
    }

    #[test]
    fn single_piece_orientation_is_a_no_op() {
        let mut scrambler = Scrambler::with_seed(7);
        scrambler.random_corner_orientation(&[CornerLoc::URF]);
        scrambler.random_edge_orientation(&[EdgeLoc::UF]);
        scrambler.random_corner_orientation(&[]);
        scrambler.random_edge_orientation(&[]);

        assert_eq!(scrambler.cube(), &CubeState::solved());
    }

    #[test]
    fn flip_exactly_n() {
        let mut scrambler = Scrambler::with_seed(3);
        assert_eq!(scrambler.flip_exactly_n(5), Err(ScrambleError::OddFlipCount(5)));
        assert_eq!(scrambler.flip_exactly_n(14), Err(ScrambleError::TooManyFlips(14)));
        assert!(scrambler.cube().is_solved());

        for n in [0, 2, 4, 12] {
            let mut scrambler = Scrambler::with_seed(n as u64);
            scrambler.flip_exactly_n(n).unwrap();
            assert_eq!(scrambler.cube().flipped_edge_count(), n);
            assert!(scrambler.cube().is_reachable());
        }
    }

    #[test]
    fn flips_are_relative_to_the_previous_state() {
        let mut scrambler = Scrambler::with_seed(11);
        scrambler.random_edge_orientation(&EdgeLoc::ALL);
        let before = scrambler.cube().clone();

        scrambler.flip_exactly_n(4).unwrap();

        let changed = EdgeLoc::ALL
            .into_iter()
            .filter(|&loc| before[loc].is_flipped() != scrambler.cube()[loc].is_flipped())
            .count();
        assert_eq!(changed, 4);
    }

    #[test]
    fn bad_edge_count() {
        for seed in 0..20 {
            let mut scrambler = Scrambler::with_seed(seed);
            scrambler.random_edge_orientation(&EdgeLoc::ALL);
            scrambler.set_bad_edge_count(6).unwrap();
            assert_eq!(scrambler.cube().flipped_edge_count(), 6);
        }

        assert_eq!(
            Scrambler::with_seed(0).set_bad_edge_count(3),
            Err(ScrambleError::OddFlipCount(3))
        );
    }

    #[test]
    fn bad_edge_count_errors_leave_the_cube_alone() {
        let mut scrambler = Scrambler::with_seed(2);
        scrambler.flip_exactly_n(6).unwrap();
        let before = scrambler.cube().clone();

        assert_eq!(
            scrambler.set_bad_edge_count(14),
            Err(ScrambleError::TooManyFlips(14))
        );
        assert_eq!(
            scrambler.set_bad_edge_count(5),
            Err(ScrambleError::OddFlipCount(5))
        );
        assert_eq!(scrambler.cube(), &before);
    }

    #[test]
    fn permutations_are_uniform() {
        let corners = [CornerLoc::URF, CornerLoc::UFL, CornerLoc::ULB];
        let edges = [EdgeLoc::UF, EdgeLoc::UB];

        let mut counts = HashMap::new();
        let mut scrambler = Scrambler::with_seed(1234);
        for _ in 0..6000 {
            scrambler.reset();
            scrambler.random_permutation(&corners, &edges);

            let cube = scrambler.cube();
            let key = (corners.map(|loc| cube[loc].home()), cube[EdgeLoc::UF].home());
            *counts.entry(key).or_insert(0) += 1;
        }

        // 3! corner permutations times 2 edge permutations, half of them with even parity
        assert_eq!(counts.len(), 6);
        for (key, count) in counts {
            assert!((850..=1150).contains(&count), "{key:?} came up {count} times");
        }
    }
}
