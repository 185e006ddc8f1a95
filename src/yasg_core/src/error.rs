use itertools::Itertools;
use thiserror::Error;

use crate::cube::Piece;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrambleError {
    #[error("Cannot flip an odd number of edges, got {0}")]
    OddFlipCount(usize),
    #[error("Cannot flip more than 12 edges, got {0}")]
    TooManyFlips(usize),
    #[error("Could not recognise the step `{0}`")]
    UnknownStep(String),
    #[error("Could not recognise the last layer twist case `{0}`")]
    UnknownTwistCase(String),
    #[error("`{0}` is not a corner or edge location")]
    UnknownPiece(String),
    #[error("Invalid algorithm `{alg}`: {reason}")]
    InvalidAlgorithm { alg: String, reason: String },
    #[error("The request could only be met by compromising {}", display_pieces(.0))]
    UnderconstrainedRequest(Vec<Piece>),
    #[error("The solver failed on state {state}: {reason}")]
    SolverFailure { state: String, reason: String },
}

impl ScrambleError {
    /// Whether this error stems from a bad argument rather than from the engine or the solver
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            ScrambleError::OddFlipCount(_)
                | ScrambleError::TooManyFlips(_)
                | ScrambleError::UnknownStep(_)
                | ScrambleError::UnknownTwistCase(_)
                | ScrambleError::UnknownPiece(_)
                | ScrambleError::InvalidAlgorithm { .. }
        )
    }
}

fn display_pieces(pieces: &[Piece]) -> String {
    pieces.iter().join(", ")
}
