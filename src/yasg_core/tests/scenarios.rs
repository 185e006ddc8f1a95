use log::info;
use yasg_core::{
    Algorithm, CornerLoc, EdgeLoc, Face, PieceSet, ScrambleError, Scrambler, Step,
    TwistCase,
};

fn u_layer() -> PieceSet {
    PieceSet::layers(&[Face::U])
}

#[test_log::test]
fn test_arrange_after_permuting_the_u_layer() {
    let corners = [CornerLoc::URF, CornerLoc::UBR, CornerLoc::ULB, CornerLoc::UFL];
    let edges = [EdgeLoc::UF, EdgeLoc::UB, EdgeLoc::UR, EdgeLoc::UL];

    for seed in 0..100 {
        let mut scrambler = Scrambler::with_seed(seed);
        scrambler.random_permutation(&corners, &edges);
        scrambler.arrange(&PieceSet::only_corners(corners), &PieceSet::only_edges(edges));

        for loc in corners {
            let corner = scrambler.cube()[loc];
            assert_eq!(corner.home(), loc);
            assert_eq!(corner.facelets()[0], Face::U);
        }
        assert!(scrambler.cube().is_reachable());
    }
}

#[test_log::test]
fn test_flip_exactly_n() {
    let mut scrambler = Scrambler::with_seed(0);
    assert_eq!(
        scrambler.flip_exactly_n(5),
        Err(ScrambleError::OddFlipCount(5))
    );
    assert!(ScrambleError::OddFlipCount(5).is_invalid_argument());

    scrambler.flip_exactly_n(4).unwrap();
    assert_eq!(scrambler.cube().flipped_edge_count(), 4);
}

#[test_log::test]
fn test_derange_with_enough_pieces() {
    let target = PieceSet::new(
        [CornerLoc::DFR, CornerLoc::DLF],
        [EdgeLoc::DF, EdgeLoc::DR, EdgeLoc::FR],
    );
    let buffer = u_layer();

    for seed in 0..100 {
        let mut scrambler = Scrambler::with_seed(seed);
        let adjustment = scrambler.derange(&target, &buffer).require_exact().unwrap();
        let cube = scrambler.cube();

        assert!(adjustment.disturbed.is_empty());
        assert!(cube.is_reachable());
        assert!(target.corners.iter().all(|&loc| !cube.corner_is_solved(loc)));
        assert!(target.edges.iter().all(|&loc| !cube.edge_is_solved(loc)));
    }
}

#[test_log::test]
fn test_every_operation_keeps_the_cube_reachable() {
    let mut scrambler = Scrambler::with_seed(42);

    scrambler.random_permutation(&CornerLoc::ALL, &EdgeLoc::ALL);
    scrambler.random_corner_orientation(&CornerLoc::ALL);
    scrambler.random_edge_orientation(&EdgeLoc::ALL);
    assert!(scrambler.cube().is_reachable());

    scrambler.set_step(Step::F2L);
    assert!(scrambler.cube().is_reachable());

    scrambler.arrange(&u_layer(), &PieceSet::none());
    scrambler.derange(&PieceSet::only_edges([EdgeLoc::FR, EdgeLoc::FL]), &PieceSet::none());
    scrambler.orient(&PieceSet::all(), &PieceSet::none());
    scrambler.disorient(&PieceSet::only_corners([CornerLoc::DFR]), &u_layer());
    scrambler.twist_last_layer_case(&[TwistCase::H, TwistCase::Pi]);
    scrambler.set_bad_edge_count(2).unwrap();
    scrambler.random_auf();
    assert!(scrambler.cube().is_reachable());

    info!("Finished with {}", scrambler.cube());
}

#[test_log::test]
fn test_algorithm_then_inverse_restores_any_state() {
    let alg = "F R U' R' U' R U R' F' R U R' U' R' F R F'"
        .parse::<Algorithm>()
        .unwrap();

    for seed in 0..20 {
        let mut scrambler = Scrambler::with_seed(seed);
        scrambler.set_step(Step::LL);
        let before = scrambler.cube().clone();

        scrambler.apply_algorithm(&alg);
        scrambler.apply_algorithm(&alg.inverse());
        assert_eq!(scrambler.cube(), &before);
    }
}

#[test_log::test]
fn test_pll_state_string() {
    let mut scrambler = Scrambler::with_seed(17);
    scrambler.set_step(Step::PLL);
    let facelets = scrambler.cube().to_string();

    assert_eq!(&facelets[0..9], "UUUUUUUUU");
    assert_eq!(&facelets[27..36], "DDDDDDDDD");

    // Only the top row of each side face can change
    for (face, letter) in [(1, 'R'), (2, 'F'), (4, 'L'), (5, 'B')] {
        let rows = &facelets[face * 9 + 3..face * 9 + 9];
        assert!(rows.chars().all(|c| c == letter), "{facelets}");
    }
}
