use fastrand::Rng;

use crate::cube::CubeState;

/// Owns the cube being scrambled together with the random source every operation draws from.
///
/// All operations mutate the cube in place and keep it physically reachable.
#[derive(Debug)]
pub struct Scrambler {
    pub(crate) cube: CubeState,
    pub(crate) rng: Rng,
}

impl Default for Scrambler {
    fn default() -> Self {
        Scrambler::new()
    }
}

impl Scrambler {
    /// A solved cube with an entropy-seeded random source
    pub fn new() -> Scrambler {
        Scrambler {
            cube: CubeState::solved(),
            rng: Rng::new(),
        }
    }

    /// A solved cube with a reproducible random source
    pub fn with_seed(seed: u64) -> Scrambler {
        Scrambler {
            cube: CubeState::solved(),
            rng: Rng::with_seed(seed),
        }
    }

    pub fn cube(&self) -> &CubeState {
        &self.cube
    }

    pub fn cube_mut(&mut self) -> &mut CubeState {
        &mut self.cube
    }

    /// The random source shared by every operation, for callers that make their own choices
    pub fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }

    /// Start over from the solved state, keeping the random source
    pub fn reset(&mut self) {
        self.cube = CubeState::solved();
    }
}
