use log::debug;

use crate::{ScrambleError, cube::CubeState, moves::Algorithm};

/// Anything that can find a sequence of moves solving a cube given as its 54 facelets
pub trait Solver {
    fn solve(&mut self, facelets: &str) -> Result<Algorithm, ScrambleError>;
}

/// A scramble that takes a solved cube to `state`
pub fn scramble_for(state: &CubeState, solver: &mut impl Solver) -> Result<Algorithm, ScrambleError> {
    let facelets = state.to_string();
    debug!("Solving {facelets}");

    let solution = solver.solve(&facelets)?;
    debug!("Found the solution {solution}");

    Ok(solution.inverse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Scrambler, cube::CornerLoc};

    /// Solves by replaying the inverse of a known scramble, checking that it was asked about the
    /// right state
    struct Replay {
        expected: String,
        solution: Algorithm,
    }

    impl Solver for Replay {
        fn solve(&mut self, facelets: &str) -> Result<Algorithm, ScrambleError> {
            if facelets == self.expected {
                Ok(self.solution.clone())
            } else {
                Err(ScrambleError::SolverFailure {
                    state: facelets.to_owned(),
                    reason: "unexpected state".to_owned(),
                })
            }
        }
    }

    #[test]
    fn scramble_is_the_inverse_solution() {
        let scramble = "R U' F2 L D B' U2".parse::<Algorithm>().unwrap();

        let mut state = CubeState::solved();
        state.apply_algorithm(&scramble);

        let mut solver = Replay {
            expected: state.to_string(),
            solution: scramble.inverse(),
        };

        let found = scramble_for(&state, &mut solver).unwrap();
        assert_eq!(found, scramble);
        assert_eq!(found.to_string(), "R U' F2 L D B' U2");

        let mut replayed = CubeState::solved();
        replayed.apply_algorithm(&found);
        assert_eq!(replayed, state);
    }

    #[test]
    fn solver_errors_propagate() {
        let mut scrambler = Scrambler::with_seed(0);
        scrambler.cube_mut()[CornerLoc::URF].rotate_clockwise(1);
        scrambler.cube_mut()[CornerLoc::UFL].rotate_clockwise(2);

        let mut solver = Replay {
            expected: String::new(),
            solution: Algorithm::default(),
        };

        assert!(matches!(
            scramble_for(scrambler.cube(), &mut solver),
            Err(ScrambleError::SolverFailure { .. })
        ));
    }
}
