use fastrand::Rng;
use itertools::Itertools;
use log::{debug, trace, warn};

use crate::{
    ScrambleError, Scrambler,
    cube::{CornerLoc, CubeState, EdgeLoc, Piece, PieceSet},
};

/// What a constrained operation had to give up to keep the cube reachable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjustment {
    /// Pieces outside of the target and the buffer that were moved or twisted
    pub disturbed: PieceSet,
    /// Targets left violating their constraint
    pub compromised: Vec<Piece>,
}

impl Adjustment {
    pub fn is_exact(&self) -> bool {
        self.compromised.is_empty()
    }

    /// Reject the adjustment if any target had to be compromised
    pub fn require_exact(self) -> Result<Adjustment, ScrambleError> {
        if self.is_exact() {
            Ok(self)
        } else {
            Err(ScrambleError::UnderconstrainedRequest(self.compromised))
        }
    }

    pub fn merge(&mut self, other: Adjustment) {
        self.disturbed = self.disturbed.union(&other.disturbed);

        for piece in other.compromised {
            if !self.compromised.contains(&piece) {
                self.compromised.push(piece);
            }
        }
    }
}

/// Two distinct elements chosen uniformly at random
pub(crate) fn pick_two<T: Copy>(rng: &mut Rng, items: &[T]) -> Option<(T, T)> {
    if items.len() < 2 {
        return None;
    }

    let i = rng.usize(..items.len());
    let mut j = rng.usize(..items.len() - 1);
    if j >= i {
        j += 1;
    }

    Some((items[i], items[j]))
}

/// Neither piece would end up in its home slot after swapping
fn can_swap_corners(cube: &CubeState, a: CornerLoc, b: CornerLoc) -> bool {
    cube[b].home() != a && cube[a].home() != b
}

fn can_swap_edges(cube: &CubeState, a: EdgeLoc, b: EdgeLoc) -> bool {
    cube[b].home() != a && cube[a].home() != b
}

/// Swap `targets[i]` with the first partner from the other targets, then from the buffer, such
/// that neither piece ends up solved. Returns whether a swap happened.
fn derange_piece<L: Copy>(
    cube: &mut CubeState,
    targets: &[L],
    i: usize,
    buffer: &[L],
    can_swap: impl Fn(&CubeState, L, L) -> bool,
    swap: impl Fn(&mut CubeState, L, L),
) -> bool {
    let candidates = (1..targets.len())
        .map(|j| targets[(i + j) % targets.len()])
        .chain(buffer.iter().copied());

    for other in candidates {
        if can_swap(cube, targets[i], other) {
            swap(cube, targets[i], other);
            return true;
        }
    }

    false
}

impl Scrambler {
    /// Randomize the permutation of `target` and `buffer`, then put every target piece in its home
    /// slot while keeping the permutation even.
    ///
    /// A target whose piece sits outside of the given sets pulls that slot into the buffer. If the
    /// parity fix has fewer than two buffer pieces of either kind to work with, untouched corners
    /// (or failing that, edges) are recruited; both show up in [`Adjustment::disturbed`].
    pub fn arrange(&mut self, target: &PieceSet, buffer: &PieceSet) -> Adjustment {
        let buffer = buffer.without(target);
        let pool = target.union(&buffer);

        debug!(
            "Arranging {} corners and {} edges with {} buffer pieces",
            target.corners.len(),
            target.edges.len(),
            buffer.corners.len() + buffer.edges.len()
        );

        self.random_permutation(&pool.corners, &pool.edges);

        let mut adjustment = Adjustment::default();
        let mut loose = buffer.clone();
        let mut odd_swaps = false;

        for &loc in &target.corners {
            if self.cube.corner_is_solved(loc) {
                continue;
            }

            let spot = self.cube.find_corner(loc);
            trace!("Swapping {loc} into place from {spot}");
            self.cube.swap_corners(loc, spot);
            odd_swaps = !odd_swaps;

            if !target.corners.contains(&spot) && !loose.corners.contains(&spot) {
                loose.corners.push(spot);
                adjustment.disturbed.corners.push(spot);
            }
        }

        for &loc in &target.edges {
            if self.cube.edge_is_solved(loc) {
                continue;
            }

            let spot = self.cube.find_edge(loc);
            trace!("Swapping {loc} into place from {spot}");
            self.cube.swap_edges(loc, spot);
            odd_swaps = !odd_swaps;

            if !target.edges.contains(&spot) && !loose.edges.contains(&spot) {
                loose.edges.push(spot);
                adjustment.disturbed.edges.push(spot);
            }
        }

        if !odd_swaps {
            return adjustment;
        }

        if let Some((a, b)) = pick_two(&mut self.rng, &loose.corners) {
            trace!("Fixing parity with {a} {b}");
            self.cube.swap_corners(a, b);
            return adjustment;
        }

        if let Some((a, b)) = pick_two(&mut self.rng, &loose.edges) {
            trace!("Fixing parity with {a} {b}");
            self.cube.swap_edges(a, b);
            return adjustment;
        }

        let untouched = PieceSet::all().without(&target.union(&loose));

        // Recruit just enough pieces to have a pair, keeping any loose piece we already have
        if let Some((a, b)) = self.recruit_pair(&loose.corners, &untouched.corners) {
            debug!("Recruiting corners {a} {b} to fix parity");
            self.cube.swap_corners(a, b);
            adjustment.disturbed = adjustment
                .disturbed
                .union(&PieceSet::only_corners([a, b]).without(&buffer));
            return adjustment;
        }

        if let Some((a, b)) = self.recruit_pair(&loose.edges, &untouched.edges) {
            debug!("Recruiting edges {a} {b} to fix parity");
            self.cube.swap_edges(a, b);
            adjustment.disturbed = adjustment
                .disturbed
                .union(&PieceSet::only_edges([a, b]).without(&buffer));
            return adjustment;
        }

        warn!("No pieces are free to fix the permutation parity");
        adjustment
    }

    /// Complete `loose` (holding fewer than two pieces) to a pair using random `untouched` pieces
    fn recruit_pair<L: Copy>(&mut self, loose: &[L], untouched: &[L]) -> Option<(L, L)> {
        match loose {
            [a] => self.rng.choice(untouched.iter().copied()).map(|b| (*a, b)),
            _ => pick_two(&mut self.rng, untouched),
        }
    }

    /// Randomize the permutation of `target` and `buffer`, then move every target piece that is in
    /// its home slot somewhere else while keeping the permutation even.
    ///
    /// If the parity can only be restored by putting a target back home, that target is reported
    /// in [`Adjustment::compromised`].
    pub fn derange(&mut self, target: &PieceSet, buffer: &PieceSet) -> Adjustment {
        let buffer = buffer.without(target);
        let pool = target.union(&buffer);

        debug!(
            "Deranging {} corners and {} edges with {} buffer pieces",
            target.corners.len(),
            target.edges.len(),
            buffer.corners.len() + buffer.edges.len()
        );

        self.random_permutation(&pool.corners, &pool.edges);

        let mut adjustment = Adjustment::default();
        let mut odd_swaps = false;

        for i in 0..target.corners.len() {
            if self.cube.corner_is_solved(target.corners[i])
                && derange_piece(
                    &mut self.cube,
                    &target.corners,
                    i,
                    &buffer.corners,
                    can_swap_corners,
                    CubeState::swap_corners,
                )
            {
                odd_swaps = !odd_swaps;
            }
        }

        for i in 0..target.edges.len() {
            if self.cube.edge_is_solved(target.edges[i])
                && derange_piece(
                    &mut self.cube,
                    &target.edges,
                    i,
                    &buffer.edges,
                    can_swap_edges,
                    CubeState::swap_edges,
                )
            {
                odd_swaps = !odd_swaps;
            }
        }

        if odd_swaps {
            self.fix_derange_parity(target, &buffer, &mut adjustment);
        }

        adjustment.compromised.extend(
            target
                .corners
                .iter()
                .filter(|&&loc| self.cube.corner_is_solved(loc))
                .map(|&loc| Piece::Corner(loc))
                .chain(
                    target
                        .edges
                        .iter()
                        .filter(|&&loc| self.cube.edge_is_solved(loc))
                        .map(|&loc| Piece::Edge(loc)),
                ),
        );

        if !adjustment.is_exact() {
            warn!(
                "Could not derange {}",
                adjustment.compromised.iter().join(", ")
            );
        }

        adjustment
    }

    fn fix_derange_parity(
        &mut self,
        target: &PieceSet,
        buffer: &PieceSet,
        adjustment: &mut Adjustment,
    ) {
        for i in 0..target.corners.len() {
            if derange_piece(
                &mut self.cube,
                &target.corners,
                i,
                &buffer.corners,
                can_swap_corners,
                CubeState::swap_corners,
            ) {
                trace!("Fixed parity by swapping {}", target.corners[i]);
                return;
            }
        }

        for i in 0..target.edges.len() {
            if derange_piece(
                &mut self.cube,
                &target.edges,
                i,
                &buffer.edges,
                can_swap_edges,
                CubeState::swap_edges,
            ) {
                trace!("Fixed parity by swapping {}", target.edges[i]);
                return;
            }
        }

        if buffer.corners.len() >= 2 && buffer.corners.len() >= buffer.edges.len() {
            if let Some((a, b)) = pick_two(&mut self.rng, &buffer.corners) {
                trace!("Fixed parity by swapping buffer corners {a} {b}");
                self.cube.swap_corners(a, b);
                return;
            }
        }

        if let Some((a, b)) = pick_two(&mut self.rng, &buffer.edges) {
            trace!("Fixed parity by swapping buffer edges {a} {b}");
            self.cube.swap_edges(a, b);
            return;
        }

        let untouched = PieceSet::all().without(&target.union(buffer));

        if let Some((a, b)) = pick_two(&mut self.rng, &untouched.corners) {
            warn!("Moving corners {a} {b} to fix parity");
            self.cube.swap_corners(a, b);
            adjustment.disturbed = adjustment
                .disturbed
                .union(&PieceSet::only_corners([a, b]));
            return;
        }

        if let Some((a, b)) = pick_two(&mut self.rng, &untouched.edges) {
            warn!("Moving edges {a} {b} to fix parity");
            self.cube.swap_edges(a, b);
            adjustment.disturbed = adjustment.disturbed.union(&PieceSet::only_edges([a, b]));
            return;
        }

        match (target.corners.as_slice(), target.edges.as_slice()) {
            ([a, b, ..], _) => self.cube.swap_corners(*a, *b),
            (_, [a, b, ..]) => self.cube.swap_edges(*a, *b),
            _ => warn!("No pieces are free to fix the permutation parity"),
        }
    }
}
