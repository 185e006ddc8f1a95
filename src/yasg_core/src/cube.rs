use std::{
    fmt::Display,
    ops::{Index, IndexMut},
    str::FromStr,
};

use itertools::Itertools;

use crate::ScrambleError;

/// A face of the cube, in the order the facelet string lists them
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl Face {
    pub const ALL: [Self; 6] = {
        use Face::*;
        let v = [U, R, F, D, L, B];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    pub fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::R => 'R',
            Face::F => 'F',
            Face::D => 'D',
            Face::L => 'L',
            Face::B => 'B',
        }
    }

    pub fn from_letter(letter: char) -> Option<Face> {
        match letter {
            'U' => Some(Face::U),
            'R' => Some(Face::R),
            'F' => Some(Face::F),
            'D' => Some(Face::D),
            'L' => Some(Face::L),
            'B' => Some(Face::B),
            _ => None,
        }
    }

    /// Whether this is the top or the bottom face
    pub fn is_u_or_d(self) -> bool {
        matches!(self, Face::U | Face::D)
    }
}

impl Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The location of a corner slot. The first letter is the U or D face, the others follow clockwise.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CornerLoc {
    ULB,
    UBR,
    URF,
    UFL,
    DBL,
    DRB,
    DFR,
    DLF,
}

impl CornerLoc {
    pub const ALL: [Self; 8] = {
        use CornerLoc::*;
        let v = [ULB, UBR, URF, UFL, DBL, DRB, DFR, DLF];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    pub fn faces(self) -> [Face; 3] {
        use Face::*;
        match self {
            CornerLoc::ULB => [U, L, B],
            CornerLoc::UBR => [U, B, R],
            CornerLoc::URF => [U, R, F],
            CornerLoc::UFL => [U, F, L],
            CornerLoc::DBL => [D, B, L],
            CornerLoc::DRB => [D, R, B],
            CornerLoc::DFR => [D, F, R],
            CornerLoc::DLF => [D, L, F],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CornerLoc::ULB => "ULB",
            CornerLoc::UBR => "UBR",
            CornerLoc::URF => "URF",
            CornerLoc::UFL => "UFL",
            CornerLoc::DBL => "DBL",
            CornerLoc::DRB => "DRB",
            CornerLoc::DFR => "DFR",
            CornerLoc::DLF => "DLF",
        }
    }

    pub fn touches(self, face: Face) -> bool {
        self.faces().contains(&face)
    }
}

impl Display for CornerLoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CornerLoc {
    type Err = ScrambleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CornerLoc::ALL
            .into_iter()
            .find(|loc| loc.name() == s)
            .ok_or_else(|| ScrambleError::UnknownPiece(s.to_owned()))
    }
}

/// The location of an edge slot. The first letter is the U or D face, or F or B for the E slice.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeLoc {
    UB,
    UR,
    UF,
    UL,
    DB,
    DR,
    DF,
    DL,
    FL,
    FR,
    BL,
    BR,
}

impl EdgeLoc {
    pub const ALL: [Self; 12] = {
        use EdgeLoc::*;
        let v = [UB, UR, UF, UL, DB, DR, DF, DL, FL, FR, BL, BR];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    pub fn faces(self) -> [Face; 2] {
        use Face::*;
        match self {
            EdgeLoc::UB => [U, B],
            EdgeLoc::UR => [U, R],
            EdgeLoc::UF => [U, F],
            EdgeLoc::UL => [U, L],
            EdgeLoc::DB => [D, B],
            EdgeLoc::DR => [D, R],
            EdgeLoc::DF => [D, F],
            EdgeLoc::DL => [D, L],
            EdgeLoc::FL => [F, L],
            EdgeLoc::FR => [F, R],
            EdgeLoc::BL => [B, L],
            EdgeLoc::BR => [B, R],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EdgeLoc::UB => "UB",
            EdgeLoc::UR => "UR",
            EdgeLoc::UF => "UF",
            EdgeLoc::UL => "UL",
            EdgeLoc::DB => "DB",
            EdgeLoc::DR => "DR",
            EdgeLoc::DF => "DF",
            EdgeLoc::DL => "DL",
            EdgeLoc::FL => "FL",
            EdgeLoc::FR => "FR",
            EdgeLoc::BL => "BL",
            EdgeLoc::BR => "BR",
        }
    }

    pub fn touches(self, face: Face) -> bool {
        self.faces().contains(&face)
    }
}

impl Display for EdgeLoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeLoc {
    type Err = ScrambleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeLoc::ALL
            .into_iter()
            .find(|loc| loc.name() == s)
            .ok_or_else(|| ScrambleError::UnknownPiece(s.to_owned()))
    }
}

/// Either kind of piece, identified by its home location
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Piece {
    Corner(CornerLoc),
    Edge(EdgeLoc),
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Piece::Corner(loc) => loc.fmt(f),
            Piece::Edge(loc) => loc.fmt(f),
        }
    }
}

/// A corner piece. `facelets[0]` is the sticker on the U or D face of the slot it sits in, the
/// other two follow clockwise.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Corner {
    facelets: [Face; 3],
    home: CornerLoc,
}

impl Corner {
    pub fn new(home: CornerLoc) -> Corner {
        Corner {
            facelets: home.faces(),
            home,
        }
    }

    /// The location this piece belongs in
    pub fn home(&self) -> CornerLoc {
        self.home
    }

    pub fn facelets(&self) -> [Face; 3] {
        self.facelets
    }

    pub fn rotate_clockwise(&mut self, turns: u8) {
        self.facelets.rotate_right(usize::from(turns % 3));
    }

    /// How many clockwise turns the U or D sticker is away from the U or D face
    pub fn twist(&self) -> u8 {
        let u_or_d = self.home.faces()[0];

        if self.facelets[0] == u_or_d {
            0
        } else if self.facelets[1] == u_or_d {
            1
        } else {
            2
        }
    }

    pub fn is_oriented(&self) -> bool {
        self.twist() == 0
    }
}

/// An edge piece. `facelets[0]` is the sticker on the first face of the slot it sits in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Edge {
    facelets: [Face; 2],
    home: EdgeLoc,
}

impl Edge {
    pub fn new(home: EdgeLoc) -> Edge {
        Edge {
            facelets: home.faces(),
            home,
        }
    }

    /// The location this piece belongs in
    pub fn home(&self) -> EdgeLoc {
        self.home
    }

    pub fn facelets(&self) -> [Face; 2] {
        self.facelets
    }

    pub fn flip(&mut self) {
        self.facelets.swap(0, 1);
    }

    /// A "bad edge" in the F/B axis sense
    pub fn is_flipped(&self) -> bool {
        self.facelets[0] != self.home.faces()[0]
    }

    pub fn is_oriented(&self) -> bool {
        !self.is_flipped()
    }
}

/// A collection of corner and edge locations without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceSet {
    pub corners: Vec<CornerLoc>,
    pub edges: Vec<EdgeLoc>,
}

impl PieceSet {
    pub fn new(
        corners: impl IntoIterator<Item = CornerLoc>,
        edges: impl IntoIterator<Item = EdgeLoc>,
    ) -> PieceSet {
        PieceSet {
            corners: corners.into_iter().unique().collect(),
            edges: edges.into_iter().unique().collect(),
        }
    }

    pub fn all() -> PieceSet {
        PieceSet::new(CornerLoc::ALL, EdgeLoc::ALL)
    }

    pub fn none() -> PieceSet {
        PieceSet::default()
    }

    pub fn only_corners(corners: impl IntoIterator<Item = CornerLoc>) -> PieceSet {
        PieceSet::new(corners, [])
    }

    pub fn only_edges(edges: impl IntoIterator<Item = EdgeLoc>) -> PieceSet {
        PieceSet::new([], edges)
    }

    /// Every piece that touches at least one of the given faces
    pub fn layers(faces: &[Face]) -> PieceSet {
        PieceSet::new(
            CornerLoc::ALL
                .into_iter()
                .filter(|loc| faces.iter().any(|&face| loc.touches(face))),
            EdgeLoc::ALL
                .into_iter()
                .filter(|loc| faces.iter().any(|&face| loc.touches(face))),
        )
    }

    pub fn union(&self, other: &PieceSet) -> PieceSet {
        PieceSet::new(
            self.corners.iter().chain(&other.corners).copied(),
            self.edges.iter().chain(&other.edges).copied(),
        )
    }

    pub fn without(&self, other: &PieceSet) -> PieceSet {
        PieceSet::new(
            self.corners
                .iter()
                .copied()
                .filter(|loc| !other.corners.contains(loc)),
            self.edges
                .iter()
                .copied()
                .filter(|loc| !other.edges.contains(loc)),
        )
    }

    pub fn contains(&self, piece: Piece) -> bool {
        match piece {
            Piece::Corner(loc) => self.corners.contains(&loc),
            Piece::Edge(loc) => self.edges.contains(&loc),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty() && self.edges.is_empty()
    }

    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.corners
            .iter()
            .map(|&loc| Piece::Corner(loc))
            .chain(self.edges.iter().map(|&loc| Piece::Edge(loc)))
    }
}

/// The state of every corner and edge slot of the cube
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeState {
    corners: [Corner; 8],
    edges: [Edge; 12],
}

impl Default for CubeState {
    fn default() -> Self {
        CubeState {
            corners: CornerLoc::ALL.map(Corner::new),
            edges: EdgeLoc::ALL.map(Edge::new),
        }
    }
}

impl Index<CornerLoc> for CubeState {
    type Output = Corner;

    fn index(&self, index: CornerLoc) -> &Self::Output {
        &self.corners[index as usize]
    }
}

impl IndexMut<CornerLoc> for CubeState {
    fn index_mut(&mut self, index: CornerLoc) -> &mut Self::Output {
        &mut self.corners[index as usize]
    }
}

impl Index<EdgeLoc> for CubeState {
    type Output = Edge;

    fn index(&self, index: EdgeLoc) -> &Self::Output {
        &self.edges[index as usize]
    }
}

impl IndexMut<EdgeLoc> for CubeState {
    fn index_mut(&mut self, index: EdgeLoc) -> &mut Self::Output {
        &mut self.edges[index as usize]
    }
}

impl CubeState {
    pub fn solved() -> CubeState {
        CubeState::default()
    }

    pub fn swap_corners(&mut self, a: CornerLoc, b: CornerLoc) {
        self.corners.swap(a as usize, b as usize);
    }

    pub fn swap_edges(&mut self, a: EdgeLoc, b: EdgeLoc) {
        self.edges.swap(a as usize, b as usize);
    }

    /// Whether the piece that belongs in `loc` is there, regardless of its orientation
    pub fn corner_is_solved(&self, loc: CornerLoc) -> bool {
        self[loc].home() == loc
    }

    /// Whether the piece that belongs in `loc` is there, regardless of its orientation
    pub fn edge_is_solved(&self, loc: EdgeLoc) -> bool {
        self[loc].home() == loc
    }

    pub fn is_solved(&self) -> bool {
        CornerLoc::ALL
            .into_iter()
            .all(|loc| self.corner_is_solved(loc) && self[loc].is_oriented())
            && EdgeLoc::ALL
                .into_iter()
                .all(|loc| self.edge_is_solved(loc) && self[loc].is_oriented())
    }

    /// The location where the corner belonging in `home` currently sits
    pub fn find_corner(&self, home: CornerLoc) -> CornerLoc {
        CornerLoc::ALL
            .into_iter()
            .find(|&loc| self[loc].home() == home)
            .unwrap_or(home)
    }

    /// The location where the edge belonging in `home` currently sits
    pub fn find_edge(&self, home: EdgeLoc) -> EdgeLoc {
        EdgeLoc::ALL
            .into_iter()
            .find(|&loc| self[loc].home() == home)
            .unwrap_or(home)
    }

    pub fn corner_twist_sum(&self) -> u32 {
        self.corners
            .iter()
            .map(|corner| u32::from(corner.twist()))
            .sum()
    }

    pub fn flipped_edge_count(&self) -> usize {
        self.edges.iter().filter(|edge| edge.is_flipped()).count()
    }

    /// Whether corners and edges together are an even permutation of the solved state
    pub fn permutation_is_even(&self) -> bool {
        let corners = self.corners.map(|corner| corner.home() as usize);
        let edges = self.edges.map(|edge| edge.home() as usize);

        is_odd_permutation(&corners) == is_odd_permutation(&edges)
    }

    /// Whether the state satisfies the permutation, twist, and flip invariants
    pub fn is_reachable(&self) -> bool {
        self.permutation_is_even()
            && self.corner_twist_sum() % 3 == 0
            && self.flipped_edge_count() % 2 == 0
    }
}

fn is_odd_permutation(mapping: &[usize]) -> bool {
    let mut visited = vec![false; mapping.len()];
    let mut transpositions = 0;

    for start in 0..mapping.len() {
        let mut i = start;
        let mut cycle_len = 0;

        while !visited[i] {
            visited[i] = true;
            i = mapping[i];
            cycle_len += 1;
        }

        if cycle_len > 0 {
            transpositions += cycle_len - 1;
        }
    }

    transpositions % 2 == 1
}
