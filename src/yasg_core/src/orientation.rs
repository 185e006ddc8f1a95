use log::{debug, trace, warn};

use crate::{
    Scrambler,
    cube::{CornerLoc, EdgeLoc, Piece, PieceSet},
    placement::{Adjustment, pick_two},
};

impl Scrambler {
    /// Randomize the orientation of `target` and `buffer`, then orient every target piece.
    ///
    /// The leftover twist and flip go to a random buffer piece. Without a buffer they go to a
    /// random target, which is reported in [`Adjustment::compromised`].
    pub fn orient(&mut self, target: &PieceSet, buffer: &PieceSet) -> Adjustment {
        let buffer = buffer.without(target);

        let mut adjustment = self.orient_corners(&target.corners, &buffer.corners);
        adjustment.merge(self.flip_edges_if(&target.edges, &buffer.edges, true));
        adjustment
    }

    /// Randomize the orientation of `target` and `buffer`, then twist or flip every target piece
    /// that happens to be oriented.
    pub fn disorient(&mut self, target: &PieceSet, buffer: &PieceSet) -> Adjustment {
        let buffer = buffer.without(target);

        let mut adjustment = self.disorient_corners(&target.corners, &buffer.corners);
        adjustment.merge(self.flip_edges_if(&target.edges, &buffer.edges, false));
        adjustment
    }

    fn orient_corners(&mut self, target: &[CornerLoc], buffer: &[CornerLoc]) -> Adjustment {
        let mut adjustment = Adjustment::default();

        // The buffer is randomized even when there is nothing to orient
        self.random_corner_orientation(&[target, buffer].concat());
        if target.is_empty() {
            return adjustment;
        }

        debug!("Orienting {} corners", target.len());

        let mut residual = 0;
        for &loc in target {
            let turns = (3 - self.cube[loc].twist()) % 3;
            self.cube[loc].rotate_clockwise(turns);
            residual = (residual + turns) % 3;
        }

        if residual == 0 {
            return adjustment;
        }

        let victim = if let Some(victim) = self.rng.choice(buffer.iter().copied()) {
            victim
        } else {
            // Nothing to absorb the twist, so one target stays twisted
            let victim = target[self.rng.usize(..target.len())];
            warn!("Could not orient {victim}");
            adjustment.compromised.push(Piece::Corner(victim));
            victim
        };

        trace!("Twisting {victim} to fix the twist sum");
        self.cube[victim].rotate_clockwise(3 - residual);
        adjustment
    }

    fn disorient_corners(&mut self, target: &[CornerLoc], buffer: &[CornerLoc]) -> Adjustment {
        let mut adjustment = Adjustment::default();

        self.random_corner_orientation(&[target, buffer].concat());
        if target.is_empty() {
            return adjustment;
        }

        debug!("Disorienting {} corners", target.len());

        let mut residual = 0;
        for &loc in target {
            if self.cube[loc].is_oriented() {
                let turns = self.rng.u8(1..3);
                self.cube[loc].rotate_clockwise(turns);
                residual = (residual + turns) % 3;
            }
        }

        if residual == 0 {
            return adjustment;
        }

        if let Some(victim) = self.rng.choice(buffer.iter().copied()) {
            trace!("Twisting buffer corner {victim} to fix the twist sum");
            self.cube[victim].rotate_clockwise(3 - residual);
            return adjustment;
        }

        // One target that stays twisted after undoing the residual
        if let Some(&victim) = target
            .iter()
            .find(|&&loc| self.cube[loc].twist() != residual)
        {
            trace!("Twisting {victim} to fix the twist sum");
            self.cube[victim].rotate_clockwise(3 - residual);
            return adjustment;
        }

        // Two targets that each take the residual again, which sums to undoing it
        let twistable = target
            .iter()
            .copied()
            .filter(|&loc| self.cube[loc].twist() != 3 - residual)
            .collect::<Vec<_>>();

        if let Some((a, b)) = pick_two(&mut self.rng, &twistable) {
            trace!("Twisting {a} and {b} to fix the twist sum");
            self.cube[a].rotate_clockwise(residual);
            self.cube[b].rotate_clockwise(residual);
            return adjustment;
        }

        let victim = target[self.rng.usize(..target.len())];
        warn!("Could not disorient {victim}");
        self.cube[victim].rotate_clockwise(3 - residual);
        adjustment.compromised.push(Piece::Corner(victim));
        adjustment
    }

    /// Flip the targets that are flipped (`orient`) or oriented (`!orient`) after randomizing
    fn flip_edges_if(&mut self, target: &[EdgeLoc], buffer: &[EdgeLoc], orient: bool) -> Adjustment {
        let mut adjustment = Adjustment::default();

        self.random_edge_orientation(&[target, buffer].concat());
        if target.is_empty() {
            return adjustment;
        }

        debug!(
            "{} {} edges",
            if orient { "Orienting" } else { "Disorienting" },
            target.len()
        );

        let mut odd_flips = false;
        for &loc in target {
            if self.cube[loc].is_flipped() == orient {
                self.cube[loc].flip();
                odd_flips = !odd_flips;
            }
        }

        if !odd_flips {
            return adjustment;
        }

        let victim = if let Some(victim) = self.rng.choice(buffer.iter().copied()) {
            victim
        } else {
            let victim = target[self.rng.usize(..target.len())];
            warn!(
                "Could not {} {victim}",
                if orient { "orient" } else { "disorient" }
            );
            adjustment.compromised.push(Piece::Edge(victim));
            victim
        };

        trace!("Flipping {victim} to fix the flip count");
        self.cube[victim].flip();
        adjustment
    }
}
