use std::fmt::Display;

use crate::cube::{CornerLoc, CubeState, EdgeLoc, Face};

/// What occupies a single facelet position of the 54-character state string
#[derive(Debug, Copy, Clone)]
enum Facelet {
    Center(Face),
    Corner(CornerLoc, usize),
    Edge(EdgeLoc, usize),
}

/// Faces in U R F D L B order, each read row by row from the top left when looking at the face
/// (U seen with B on top, D seen with F on top, the side faces seen with U on top).
#[rustfmt::skip]
const FACELETS: [Facelet; 54] = {
    use CornerLoc::*;
    use EdgeLoc::*;
    use Facelet::{Center as X, Corner as C, Edge as E};

    [
        // U
        C(ULB, 0), E(UB, 0), C(UBR, 0),
        E(UL, 0), X(Face::U), E(UR, 0),
        C(UFL, 0), E(UF, 0), C(URF, 0),
        // R
        C(URF, 1), E(UR, 1), C(UBR, 2),
        E(FR, 1), X(Face::R), E(BR, 1),
        C(DFR, 2), E(DR, 1), C(DRB, 1),
        // F
        C(UFL, 1), E(UF, 1), C(URF, 2),
        E(FL, 0), X(Face::F), E(FR, 0),
        C(DLF, 2), E(DF, 1), C(DFR, 1),
        // D
        C(DLF, 0), E(DF, 0), C(DFR, 0),
        E(DL, 0), X(Face::D), E(DR, 0),
        C(DBL, 0), E(DB, 0), C(DRB, 0),
        // L
        C(ULB, 1), E(UL, 1), C(UFL, 2),
        E(BL, 1), X(Face::L), E(FL, 1),
        C(DBL, 2), E(DL, 1), C(DLF, 1),
        // B
        C(UBR, 1), E(UB, 1), C(ULB, 2),
        E(BR, 0), X(Face::B), E(BL, 0),
        C(DRB, 2), E(DB, 1), C(DBL, 1),
    ]
};

impl CubeState {
    /// The face every sticker shows, in the order the two-phase solver expects
    pub fn facelets(&self) -> [Face; 54] {
        FACELETS.map(|facelet| match facelet {
            Facelet::Center(face) => face,
            Facelet::Corner(loc, i) => self[loc].facelets()[i],
            Facelet::Edge(loc, i) => self[loc].facelets()[i],
        })
    }
}

impl Display for CubeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for face in self.facelets() {
            write!(f, "{face}")?;
        }

        Ok(())
    }
}
