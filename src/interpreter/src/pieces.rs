use yasg_core::{CornerLoc, EdgeLoc, Face, PieceSet, ScrambleError};

use crate::ScriptError;

/// Words that select every piece of a kind
const EVERYTHING: [&str; 4] = ["all", "each", "every", "any"];

/// Turn any spelling of a corner (`UFR`, `rfu`, ...) into its location.
///
/// The U or D face comes first and the other two follow in clockwise order.
pub fn parse_corner(name: &str) -> Result<CornerLoc, ScrambleError> {
    let unknown = || ScrambleError::UnknownPiece(name.to_owned());

    let faces = name
        .chars()
        .map(|c| Face::from_letter(c.to_ascii_uppercase()))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(unknown)?;

    let [a, b, c] = faces[..] else {
        return Err(unknown());
    };

    let (first, sides) = match (a, b, c) {
        (top @ (Face::U | Face::D), x, y)
        | (x, top @ (Face::U | Face::D), y)
        | (x, y, top @ (Face::U | Face::D)) => (top, [x, y]),
        _ => return Err(unknown()),
    };

    // Clockwise when looking at the U face, and counterclockwise from above for the D face
    let ring = match first {
        Face::U => [Face::R, Face::F, Face::L, Face::B],
        _ => [Face::B, Face::L, Face::F, Face::R],
    };

    let position = |face| ring.iter().position(|&f| f == face).ok_or_else(unknown);
    let [x, y] = sides;
    let (second, third) = if ring[(position(x)? + 1) % 4] == y {
        (x, y)
    } else {
        (y, x)
    };

    format!("{first}{second}{third}").parse().map_err(|_| unknown())
}

/// Turn any spelling of an edge (`FU`, `rb`, ...) into its location.
///
/// The U or D face comes first, and E slice edges start with F or B.
pub fn parse_edge(name: &str) -> Result<EdgeLoc, ScrambleError> {
    let unknown = || ScrambleError::UnknownPiece(name.to_owned());

    let upper = name.to_ascii_uppercase();
    let &[a, b] = upper.as_bytes() else {
        return Err(unknown());
    };

    let canonical = if matches!(a, b'U' | b'D') || matches!(b, b'R' | b'L') {
        [a, b]
    } else {
        [b, a]
    };

    std::str::from_utf8(&canonical)
        .map_err(|_| unknown())?
        .parse()
        .map_err(|_| unknown())
}

/// Parse one side of a piece list, where a lone face letter selects the whole layer
fn parse_side<L: Copy + PartialEq>(
    side: &str,
    all: &[L],
    touches: impl Fn(L, Face) -> bool,
    parse: impl Fn(&str) -> Result<L, ScrambleError>,
) -> Result<Vec<L>, ScrambleError> {
    let side = side.trim();

    if EVERYTHING.iter().any(|word| word.eq_ignore_ascii_case(side)) {
        return Ok(all.to_vec());
    }

    let mut pieces = Vec::new();

    for word in side.split_whitespace() {
        let mut chars = word.chars();

        let selected = match (chars.next(), chars.next()) {
            (Some(letter), None) => {
                let face = Face::from_letter(letter.to_ascii_uppercase())
                    .ok_or_else(|| ScrambleError::UnknownPiece(word.to_owned()))?;

                all.iter()
                    .copied()
                    .filter(|&loc| touches(loc, face))
                    .collect()
            }
            _ => vec![parse(word)?],
        };

        for loc in selected {
            if !pieces.contains(&loc) {
                pieces.push(loc);
            }
        }
    }

    Ok(pieces)
}

/// Parse a piece list of the form `corners | edges`.
///
/// Either side may be empty, hold `all`, face letters for whole layers, or piece names in any
/// letter order.
pub fn parse_pieces(input: &str) -> Result<PieceSet, ScriptError> {
    let Some((corners, edges)) = input.split_once('|') else {
        return Err(ScriptError::MissingSeparator(input.to_owned()));
    };

    let corners = parse_side(corners, &CornerLoc::ALL, CornerLoc::touches, parse_corner)?;
    let edges = parse_side(edges, &EdgeLoc::ALL, EdgeLoc::touches, parse_edge)?;

    Ok(PieceSet::new(corners, edges))
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn every_corner_spelling() {
        for loc in CornerLoc::ALL {
            for spelling in loc.name().chars().permutations(3) {
                let spelling = spelling.into_iter().collect::<String>();
                assert_eq!(parse_corner(&spelling), Ok(loc), "{spelling}");
                assert_eq!(parse_corner(&spelling.to_lowercase()), Ok(loc), "{spelling}");
            }
        }
    }

    #[test]
    fn every_edge_spelling() {
        for loc in EdgeLoc::ALL {
            let name = loc.name();
            let reversed = name.chars().rev().collect::<String>();

            assert_eq!(parse_edge(name), Ok(loc));
            assert_eq!(parse_edge(&reversed), Ok(loc), "{reversed}");
        }

        assert_eq!(parse_edge("bu"), Ok(EdgeLoc::UB));
    }

    #[test]
    fn bad_names() {
        for name in ["UD", "RL", "U", "UFRB", "XY"] {
            assert_eq!(
                parse_edge(name),
                Err(ScrambleError::UnknownPiece(name.to_owned())),
                "{name}"
            );
        }

        for name in ["URL", "UDF", "RFB", "UR", "UFRX", "FBU"] {
            assert_eq!(
                parse_corner(name),
                Err(ScrambleError::UnknownPiece(name.to_owned())),
                "{name}"
            );
        }
    }

    #[test]
    fn piece_lists() {
        let pieces = parse_pieces("U DRF | FR bu").unwrap();
        assert_eq!(
            pieces.corners,
            vec![
                CornerLoc::ULB,
                CornerLoc::UBR,
                CornerLoc::URF,
                CornerLoc::UFL,
                CornerLoc::DFR
            ]
        );
        assert_eq!(pieces.edges, vec![EdgeLoc::FR, EdgeLoc::UB]);

        let everything = parse_pieces("all|Every").unwrap();
        assert_eq!(everything, PieceSet::all());

        let edges_only = parse_pieces(" | R").unwrap();
        assert!(edges_only.corners.is_empty());
        assert_eq!(edges_only.edges.len(), 4);

        // Overlapping layers don't repeat pieces
        let two_layers = parse_pieces("U R | U R UR").unwrap();
        assert_eq!(two_layers.corners.len(), 6);
        assert_eq!(two_layers.edges.len(), 7);
    }

    #[test]
    fn piece_list_errors() {
        assert!(matches!(
            parse_pieces("URF UFL"),
            Err(ScriptError::MissingSeparator(_))
        ));
        assert!(matches!(
            parse_pieces("X | "),
            Err(ScriptError::Notation(ScrambleError::UnknownPiece(_)))
        ));
    }
}
