#![warn(clippy::pedantic)]

pub mod cube;
mod error;
mod facelets;
pub mod moves;
mod orientation;
mod placement;
mod randomize;
pub mod scramble;
mod scrambler;
pub mod steps;

pub use cube::{CornerLoc, CubeState, EdgeLoc, Face, Piece, PieceSet};
pub use error::ScrambleError;
pub use moves::{Algorithm, Move};
pub use placement::Adjustment;
pub use scramble::{Solver, scramble_for};
pub use scrambler::Scrambler;
pub use steps::{Step, TwistCase};
