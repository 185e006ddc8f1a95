use std::{fmt::Display, str::FromStr};

use log::debug;

use crate::{
    ScrambleError, Scrambler,
    cube::{CornerLoc, EdgeLoc, Face, PieceSet},
    moves::{Algorithm, Move},
    placement::Adjustment,
};

/// A named stage of a speedsolving method, scrambled so that everything solved before it is solved
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    LL,
    OLL,
    CLL,
    OLLCP,
    PLL,
    COLL,
    ZBLL,
    OCLL,
    TwoGLL,
    ELL,
    EPLL,
    CPLL,
    CMLL,
    CMLLEO,
    ZZLL,
    F2L,
    ZZF2L,
    ZZRB,
    PetrusF2L,
    SB,
    LS,
    ELS,
    ZZLS,
    TSLE,
    CLS,
    CPLS,
    EJLS,
    EJF2L,
    TTLL,
    WV,
    SV,
    VLS,
    VHLS,
    Petrus2x2x3,
    PetrusEO,
}

impl Step {
    pub const ALL: [Self; 35] = {
        use Step::*;
        let v = [
            LL, OLL, CLL, OLLCP, PLL, COLL, ZBLL, OCLL, TwoGLL, ELL, EPLL, CPLL, CMLL, CMLLEO,
            ZZLL, F2L, ZZF2L, ZZRB, PetrusF2L, SB, LS, ELS, ZZLS, TSLE, CLS, CPLS, EJLS, EJF2L,
            TTLL, WV, SV, VLS, VHLS, Petrus2x2x3, PetrusEO,
        ];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    pub fn name(self) -> &'static str {
        match self {
            Step::LL => "LL",
            Step::OLL => "OLL",
            Step::CLL => "CLL",
            Step::OLLCP => "OLLCP",
            Step::PLL => "PLL",
            Step::COLL => "COLL",
            Step::ZBLL => "ZBLL",
            Step::OCLL => "OCLL",
            Step::TwoGLL => "2GLL",
            Step::ELL => "ELL",
            Step::EPLL => "EPLL",
            Step::CPLL => "CPLL",
            Step::CMLL => "CMLL",
            Step::CMLLEO => "CMLLEO",
            Step::ZZLL => "ZZLL",
            Step::F2L => "F2L",
            Step::ZZF2L => "ZZF2L",
            Step::ZZRB => "ZZRB",
            Step::PetrusF2L => "PetrusF2L",
            Step::SB => "SB",
            Step::LS => "LS",
            Step::ELS => "ELS",
            Step::ZZLS => "ZZLS",
            Step::TSLE => "TSLE",
            Step::CLS => "CLS",
            Step::CPLS => "CPLS",
            Step::EJLS => "EJLS",
            Step::EJF2L => "EJF2L",
            Step::TTLL => "TTLL",
            Step::WV => "WV",
            Step::SV => "SV",
            Step::VLS => "VLS",
            Step::VHLS => "VHLS",
            Step::Petrus2x2x3 => "Petrus2x2x3",
            Step::PetrusEO => "PetrusEO",
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Step {
    type Err = ScrambleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::ALL
            .into_iter()
            .find(|step| step.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ScrambleError::UnknownStep(s.to_owned()))
    }
}

/// How the pieces of a step get scrambled
struct Recipe {
    permute: PieceSet,
    twist: Vec<CornerLoc>,
    flip: Vec<EdgeLoc>,
}

fn u_layer() -> PieceSet {
    PieceSet::layers(&[Face::U])
}

fn last_slot() -> PieceSet {
    u_layer().union(&PieceSet::new([CornerLoc::DFR], [EdgeLoc::FR]))
}

impl Step {
    fn recipe(self) -> Recipe {
        let u = u_layer();
        let ls = last_slot();

        // Scramble everything in `pieces`, optionally leaving the orientation of a kind alone
        let full = |pieces: PieceSet| Recipe {
            twist: pieces.corners.clone(),
            flip: pieces.edges.clone(),
            permute: pieces,
        };
        let no_eo = |pieces: PieceSet| Recipe {
            twist: pieces.corners.clone(),
            flip: vec![],
            permute: pieces,
        };
        let permute_only = |pieces: PieceSet| Recipe {
            twist: vec![],
            flip: vec![],
            permute: pieces,
        };

        match self {
            Step::LL | Step::OLL | Step::CLL | Step::OLLCP => full(u),
            Step::PLL | Step::EJLS | Step::EJF2L => permute_only(u),
            Step::COLL
            | Step::ZBLL
            | Step::OCLL
            | Step::WV
            | Step::SV
            | Step::VLS
            | Step::VHLS
            | Step::TwoGLL
            | Step::ZZLL => {
                let mut recipe = no_eo(u);
                match self {
                    Step::VLS | Step::VHLS => recipe.flip.clone_from(&recipe.permute.edges),
                    Step::TwoGLL => recipe.permute.corners.clear(),
                    Step::ZZLL => recipe.permute.edges = vec![EdgeLoc::UF, EdgeLoc::UB],
                    _ => {}
                }
                recipe
            }
            Step::ELL => Recipe {
                flip: u.edges.clone(),
                ..permute_only(PieceSet::only_edges(u.edges))
            },
            Step::EPLL => permute_only(PieceSet::only_edges(u.edges)),
            Step::CPLL => permute_only(PieceSet::only_corners(u.corners)),
            Step::CMLL | Step::CMLLEO => full(PieceSet::new(
                u.corners,
                u.edges.into_iter().chain([EdgeLoc::DF, EdgeLoc::DB]),
            )),
            Step::F2L => full(PieceSet::new(
                CornerLoc::ALL,
                u.edges
                    .into_iter()
                    .chain([EdgeLoc::FR, EdgeLoc::FL, EdgeLoc::BR, EdgeLoc::BL]),
            )),
            Step::ZZF2L => no_eo(PieceSet::new(
                CornerLoc::ALL,
                PieceSet::layers(&[Face::R, Face::U, Face::L]).edges,
            )),
            Step::ZZRB | Step::PetrusF2L => no_eo(PieceSet::layers(&[Face::R, Face::U])),
            Step::SB => {
                let ru = PieceSet::layers(&[Face::R, Face::U]);
                full(ru.union(&PieceSet::only_edges([EdgeLoc::DF, EdgeLoc::DB])))
            }
            Step::LS | Step::ELS => full(ls),
            Step::ZZLS | Step::TSLE => no_eo(ls),
            Step::CLS | Step::CPLS => no_eo(PieceSet::new(ls.corners, u.edges)),
            Step::TTLL => permute_only(PieceSet::new(ls.corners, u.edges)),
            Step::Petrus2x2x3 => full(PieceSet::layers(&[Face::U, Face::R, Face::F])),
            Step::PetrusEO => full(PieceSet::layers(&[Face::U, Face::F])),
        }
    }

    /// Moves applied after the pieces are scrambled, as (face, clockwise quarter turns)
    fn setup(self) -> &'static [(Face, u8)] {
        match self {
            // R U R'
            Step::WV => &[(Face::R, 1), (Face::U, 1), (Face::R, 3)],
            // R U' R'
            Step::SV | Step::VLS | Step::VHLS => &[(Face::R, 1), (Face::U, 3), (Face::R, 3)],
            _ => &[],
        }
    }
}

/// A named pattern of last layer corner twists
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TwistCase {
    Solved,
    T,
    U,
    L,
    H,
    Pi,
    Sune,
    Antisune,
}

impl TwistCase {
    pub const ALL: [Self; 8] = [
        TwistCase::Solved,
        TwistCase::T,
        TwistCase::U,
        TwistCase::L,
        TwistCase::H,
        TwistCase::Pi,
        TwistCase::Sune,
        TwistCase::Antisune,
    ];

    /// The clockwise twist applied to each U corner, starting from an oriented U layer
    pub fn twists(self) -> &'static [(CornerLoc, u8)] {
        use CornerLoc::*;

        match self {
            TwistCase::Solved => &[],
            TwistCase::T => &[(ULB, 1), (UBR, 2)],
            TwistCase::U => &[(ULB, 2), (UBR, 1)],
            TwistCase::L => &[(ULB, 2), (URF, 1)],
            TwistCase::H => &[(ULB, 1), (UBR, 2), (URF, 1), (UFL, 2)],
            TwistCase::Pi => &[(ULB, 1), (UFL, 2), (UBR, 1), (URF, 2)],
            TwistCase::Sune => &[(URF, 2), (UBR, 2), (ULB, 2)],
            TwistCase::Antisune => &[(URF, 1), (UFL, 1), (ULB, 1)],
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            TwistCase::Solved => &["0", "o", "solved"],
            TwistCase::T => &["t"],
            TwistCase::U => &["u"],
            TwistCase::L => &["l"],
            TwistCase::H => &["h"],
            TwistCase::Pi => &["pi", "bruno"],
            TwistCase::Sune => &["s", "sune"],
            TwistCase::Antisune => &["as", "antisune", "anti-sune"],
        }
    }

    /// Parse a whitespace separated list of case names
    pub fn parse_list(s: &str) -> Result<Vec<TwistCase>, ScrambleError> {
        s.split_whitespace().map(str::parse).collect()
    }
}

impl Display for TwistCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TwistCase::Solved => "solved",
            TwistCase::T => "T",
            TwistCase::U => "U",
            TwistCase::L => "L",
            TwistCase::H => "H",
            TwistCase::Pi => "Pi",
            TwistCase::Sune => "Sune",
            TwistCase::Antisune => "Antisune",
        };

        f.write_str(name)
    }
}

impl FromStr for TwistCase {
    type Err = ScrambleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();

        TwistCase::ALL
            .into_iter()
            .find(|case| case.aliases().contains(&lower.as_str()))
            .ok_or_else(|| ScrambleError::UnknownTwistCase(s.to_owned()))
    }
}

impl Scrambler {
    /// Scramble the pieces that are unsolved at the start of `step`
    pub fn set_step(&mut self, step: Step) -> Adjustment {
        debug!("Setting up step {step}");

        if step == Step::TwoGLL {
            self.random_auf();
        }

        let recipe = step.recipe();
        self.random_permutation(&recipe.permute.corners, &recipe.permute.edges);

        let adjustment = match step {
            Step::EJLS | Step::EJF2L => {
                self.random_corner_orientation(&last_slot().corners);
                self.disorient(
                    &PieceSet::only_corners([CornerLoc::DFR]),
                    &PieceSet::only_corners(u_layer().corners),
                )
            }
            _ => {
                self.random_edge_orientation(&recipe.flip);
                self.random_corner_orientation(&recipe.twist);
                Adjustment::default()
            }
        };

        if step == Step::ZZLL {
            // The two phasing edges may just as well be on the sides
            self.random_auf();
        }

        let setup = step
            .setup()
            .iter()
            .filter_map(|&(face, turns)| Move::new(face, turns))
            .collect::<Algorithm>();
        if !setup.is_empty() {
            self.apply_algorithm(&setup);
        }

        adjustment
    }

    /// Orient the last layer corners, twist them into one of `cases` chosen uniformly, then
    /// adjust the U face. An empty list leaves the corners oriented.
    pub fn twist_last_layer_case(&mut self, cases: &[TwistCase]) -> Adjustment {
        let adjustment = self.orient(
            &PieceSet::only_corners(u_layer().corners),
            &PieceSet::only_corners([CornerLoc::DFR]),
        );

        let case = self.rng.choice(cases.iter().copied()).unwrap_or(TwistCase::Solved);
        debug!("Twisting the last layer corners into {case}");

        for &(loc, turns) in case.twists() {
            self.cube[loc].rotate_clockwise(turns);
        }

        self.random_auf();
        adjustment
    }
}
