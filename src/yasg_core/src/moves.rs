use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use log::trace;

use crate::{
    ScrambleError, Scrambler,
    cube::{CornerLoc, CubeState, EdgeLoc, Face},
};

/// The corners of each face in clockwise order, indexed by `Face`
const CLOCKWISE_CORNERS: [[CornerLoc; 4]; 6] = {
    use CornerLoc::*;
    [
        [URF, UFL, ULB, UBR],
        [URF, UBR, DRB, DFR],
        [UFL, URF, DFR, DLF],
        [DLF, DFR, DRB, DBL],
        [ULB, UFL, DLF, DBL],
        [UBR, ULB, DBL, DRB],
    ]
};

/// The edges of each face in clockwise order, indexed by `Face`
const CLOCKWISE_EDGES: [[EdgeLoc; 4]; 6] = {
    use EdgeLoc::*;
    [
        [UB, UR, UF, UL],
        [UR, BR, DR, FR],
        [UF, FR, DF, FL],
        [DF, DR, DB, DL],
        [UL, FL, DL, BL],
        [UB, BL, DB, BR],
    ]
};

/// A turn of a single face by one, two, or three clockwise quarter turns
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Move {
    face: Face,
    turns: u8,
}

impl Move {
    /// Returns `None` if the turns cancel out
    pub fn new(face: Face, turns: u8) -> Option<Move> {
        match turns % 4 {
            0 => None,
            turns => Some(Move { face, turns }),
        }
    }

    pub fn inverse(self) -> Move {
        Move {
            face: self.face,
            turns: 4 - self.turns,
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.turns {
            1 => write!(f, "{}", self.face),
            2 => write!(f, "{}2", self.face),
            _ => write!(f, "{}'", self.face),
        }
    }
}

fn parse_move(token: &str) -> Result<Move, String> {
    let mut chars = token.chars();

    let face = chars
        .next()
        .and_then(Face::from_letter)
        .ok_or_else(|| format!("`{token}` does not start with a face letter"))?;

    let turns = match chars.as_str() {
        "" => 1,
        "2" => 2,
        "'" => 3,
        suffix => return Err(format!("`{suffix}` is not a valid suffix for `{face}`")),
    };

    Ok(Move { face, turns })
}

impl FromStr for Move {
    type Err = ScrambleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_move(s).map_err(|reason| ScrambleError::InvalidAlgorithm {
            alg: s.to_owned(),
            reason,
        })
    }
}

/// A sequence of face turns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Algorithm(Vec<Move>);

impl Algorithm {
    pub fn moves(&self) -> &[Move] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The algorithm that undoes this one
    pub fn inverse(&self) -> Algorithm {
        Algorithm(self.0.iter().rev().map(|mv| mv.inverse()).collect())
    }
}

impl FromIterator<Move> for Algorithm {
    fn from_iter<T: IntoIterator<Item = Move>>(iter: T) -> Self {
        Algorithm(iter.into_iter().collect())
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

impl FromStr for Algorithm {
    type Err = ScrambleError;

    /// Whitespace is ignored; every move starts at a letter
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact = s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        let mut rest = compact.as_str();
        let mut moves = Vec::new();

        while !rest.is_empty() {
            let end = rest
                .char_indices()
                .skip(1)
                .find(|(_, c)| c.is_alphabetic())
                .map_or(rest.len(), |(i, _)| i);

            let mv = parse_move(&rest[..end]).map_err(|reason| ScrambleError::InvalidAlgorithm {
                alg: s.to_owned(),
                reason,
            })?;

            moves.push(mv);
            rest = &rest[end..];
        }

        Ok(Algorithm(moves))
    }
}

impl CubeState {
    pub fn apply_move(&mut self, mv: Move) {
        let corners = CLOCKWISE_CORNERS[mv.face as usize];
        let edges = CLOCKWISE_EDGES[mv.face as usize];
        let turns = usize::from(mv.turns);

        let prev_corners = corners.map(|loc| self[loc]);
        let prev_edges = edges.map(|loc| self[loc]);

        for i in 0..4 {
            self[corners[i]] = prev_corners[(i + 4 - turns) % 4];
            self[edges[i]] = prev_edges[(i + 4 - turns) % 4];
        }

        if mv.turns % 2 == 1 && !mv.face.is_u_or_d() {
            // A quarter turn of a side face twists its corners 2 1 2 1 in clockwise order
            for (loc, twist) in corners.into_iter().zip([2, 1, 2, 1]) {
                self[loc].rotate_clockwise(twist);
            }

            if matches!(mv.face, Face::F | Face::B) {
                for loc in edges {
                    self[loc].flip();
                }
            }
        }
    }

    pub fn apply_algorithm(&mut self, alg: &Algorithm) {
        for &mv in alg.moves() {
            self.apply_move(mv);
        }
    }

    /// Parse and apply an algorithm such as `R U R' U'`
    pub fn apply_algorithm_str(&mut self, alg: &str) -> Result<(), ScrambleError> {
        let alg = alg.parse::<Algorithm>()?;
        self.apply_algorithm(&alg);
        Ok(())
    }
}

impl Scrambler {
    /// Turn the U face a uniformly random number of times, including not at all
    pub fn random_auf(&mut self) {
        let turns = self.rng.u8(0..4);
        trace!("AUF by {turns} quarter turns");

        if let Some(mv) = Move::new(Face::U, turns) {
            self.cube.apply_move(mv);
        }
    }

    pub fn apply_algorithm(&mut self, alg: &Algorithm) {
        trace!("Applying {alg}");
        self.cube.apply_algorithm(alg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TESTS: [(&str, &str); 18] = [
        ("", "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB"),
        ("U", "UUUUUUUUUBBBRRRRRRRRRFFFFFFDDDDDDDDDFFFLLLLLLLLLBBBBBB"),
        ("U2 R2 L D2 L F2 B2 U' D' F U R' L2 U2 D L F' B2 D R2", "FLLLULFRFRUURRRBBBLDDFFUBRUDFRDDUFLDUFUFLDLBRBDRBBULBD"),
        ("L U' R2 F B2 R2 L U' D2 R2 F B' U R' U2 R2 D2 F2 U2 L'", "BLBLUFFFFDULURFRRULDLBFRDBUFDFBDDDBRDUUFLULRRUDRLBRBLB"),
        ("R L2 U2 D2 R2 U2 R' D2 R' F' R L2 B R2 L' F' B2 U' D' F B2 U R' L2", "DUULUFBDDRRFURDBFLRBBUFBLBLULURDLLBDFUUFLRBDFRFRLBDFRD"),
        ("L2 U2 D' L2 U2 L2 F2 U2 D' F2 B2 L2 U B U2 D R2 U' F2 D R2 L'", "BULRUDFDDFLDRRRBFBLFRUFFFBLULUFDLLDRRDURLLBURFBUBBUDBD"),
        ("U2 L D2 R2 U2 L F2 B2 D' R' L' F' B2 R' L2 F2 B' R U2 D F B2 R L'", "BRRRUBLRBDDFBRRUDRBDRLFLDLFLURDDFUFBLBUBLFLLFDUDFBUUUF"),
        ("F U2 D2 R2 F' B2 D2 F B D2 L2 U2 D R F2 B' L' B R L U D2 R2 L'", "RFDUUDBFRFBFRRDBBUDRUDFBBDLLLULDUDLLUFRRLRRUDLLBFBUFBF"),
        ("U D F' B' L' B R L2 F B R2 L' U F2 B R2 F2 B2 U' F2 B2 U D R2 D'", "BDUFULLBFRBRURBFUBFRDUFRUFRFRULDBDLRUDDFLFLULBRLDBLDDB"),
        ("R2 D' B2 U' D' R2 U' L2 U' L2 B' R' F D F' B U2 L'", "BUDFUDRFDBRFURBFDRDULRFBUBURDLFDLRDDULFULBBRFLRLLBLBFU"),
        ("F2 L' D2 F2 B2 R' U2 B2 R' F' B2 R' D F R2 L2 D' R L2 F2 B R2", "LFDRUFUBLFRBURDBRRFLDFFLBFLRUUUDUULFDBLDLDFBURLBRBBDDR"),
        ("F2 U F2 R2 L2 U2 D' L2 U2 D2 F2 B R2 L U D' L' U2 R' L2 F B2 R'", "FBLDUUBFUBFDLRUDLRLDRRFFUDRRLFRDULDDLBDBLUUFFFRUBBLBRB"),
        ("R2 B2 D2 R2 U2 R' L2 F' B R2 L' D' F2 B' U' R' L2 F U2 D F B'", "BDRDURBLLFFDBRFRBLUUDUFLUDFRBDUDRLFFRRLDLRBBFBFUUBLULD"),
        ("F2 U D2 R2 D' F' D R L2 U2 D B2 R' U2 D2 R L2 B2 R' L' U2 L'", "FFBRUDBDDRLDRRBLFFUFBBFDBBFRRURDUFURRULLLULFULLDDBBULD"),
        ("U F2 B2 U B2 U2 D R' L U' D' F' B2 D F2 B U' R2 F' B2 U2 D'", "DDFBUFDRDFURFRFULBRURBFDULLBDFFDUBBDLDBBLULLRURFRBLLRU"),
        ("U R' L2 U2 D R L U R B R' L F B U' D2 F2 R2 U' D2 L2 U' R2", "ULDBUDRLUFRRURBBDFBULUFFRDLFFURDLLLLBRDULRBFUFBRDBBDFD"),
        ("U' F2 U2 F2 B2 U F2 R2 F U' D R' L' U' D2 F2 B D2 F' B2 R' L'", "BBRBULUFBUFULRULFLFDLBFURRDUFFLDUFBBDDLRLRDDBFURRBDDLR"),
        ("U2 D2 L2 F' B L2 B2 U2 F' R L2 F' B2 U2 D F' U' D2 R U2 D F2", "LBDLULDDURDRRRFRURBFFRFBFRDLDBDDBDFBBULRLFFBUFLUUBUULL"),
    ];

    #[test]
    fn facelet_strings_match_twophase_reference() {
        for (alg, facelets) in TESTS {
            let mut cube = CubeState::solved();
            cube.apply_algorithm_str(alg).unwrap();

            assert_eq!(cube.to_string(), facelets, "{alg}");
            assert!(cube.is_reachable(), "{alg}");
        }
    }

    #[test]
    fn inverse_undoes_algorithm() {
        for (alg, _) in TESTS {
            let alg = alg.parse::<Algorithm>().unwrap();

            let mut cube = CubeState::solved();
            cube.apply_algorithm_str("R U R' F2 D' L B2").unwrap();
            let before = cube.clone();

            cube.apply_algorithm(&alg);
            cube.apply_algorithm(&alg.inverse());

            assert_eq!(cube, before);
        }
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        for face in Face::ALL {
            let mut cube = CubeState::solved();
            let mv = Move::new(face, 1).unwrap();

            for _ in 0..4 {
                cube.apply_move(mv);
            }

            assert!(cube.is_solved(), "{face}");
        }
    }

    #[test]
    fn parsing() {
        let alg = "R U2 F'".parse::<Algorithm>().unwrap();
        assert_eq!(alg.len(), 3);
        assert_eq!(alg.to_string(), "R U2 F'");
        assert_eq!(alg.inverse().to_string(), "F U2 R'");

        let compact = "RU2F'".parse::<Algorithm>().unwrap();
        assert_eq!(compact, alg);

        assert!("".parse::<Algorithm>().unwrap().is_empty());
        assert_eq!(Move::new(Face::R, 4), None);
    }

    #[test]
    fn bad_algorithms() {
        for bad in ["R3", "R2'", "X", "Rw", "2R", "r"] {
            assert!(
                matches!(
                    bad.parse::<Algorithm>(),
                    Err(ScrambleError::InvalidAlgorithm { .. })
                ),
                "{bad}"
            );
        }

        assert!("R'".parse::<Move>().is_ok());
        assert!("R''".parse::<Move>().is_err());
    }
}
