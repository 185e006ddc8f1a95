#![warn(clippy::pedantic)]

mod config;
mod twophase;

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use color_eyre::eyre::eyre;
use env_logger::TimestampPrecision;
use interpreter::{Interpreter, Script, pieces::parse_pieces};
use itertools::Itertools;
use log::{LevelFilter, info, warn};
use yasg_core::{
    Adjustment, Algorithm, CornerLoc, CubeState, EdgeLoc, PieceSet, ScrambleError, Scrambler,
    Step, TwistCase, scramble_for,
};

use crate::{config::Config, twophase::TwophaseSolver};

/// Generates scrambles that lead to a constrained set of 3x3x3 cube states.
///
/// Piece lists look like `"URF UFL | UF FR"`: corners, then edges. A side may be empty, `all`, or a
/// face letter for a whole layer.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Scramble for a predefined step such as LL, PLL, ZBLL, F2L or EJLS
    #[arg(short, long)]
    step: Option<Step>,

    /// Run a scramble script
    #[arg(short, long, conflicts_with = "step")]
    file: Option<PathBuf>,

    /// The pieces that may be permuted
    #[arg(short, long, value_name = "PIECES", value_parser = parse_pieces)]
    permutable: Option<PieceSet>,

    /// The pieces that may be disoriented
    #[arg(short, long, value_name = "PIECES", value_parser = parse_pieces)]
    orientable: Option<PieceSet>,

    /// Put these pieces in their home slots, using the permutable pieces as a buffer
    #[arg(short = 'A', long, value_name = "PIECES", value_parser = parse_pieces)]
    arrange: Option<PieceSet>,

    /// Orient these pieces, using the orientable pieces as a buffer
    #[arg(short = 'O', long, value_name = "PIECES", value_parser = parse_pieces)]
    orient: Option<PieceSet>,

    /// Move these pieces out of their home slots, using the permutable pieces as a buffer
    #[arg(short = 'D', long, value_name = "PIECES", value_parser = parse_pieces)]
    derange: Option<PieceSet>,

    /// Disorient these pieces, using the orientable pieces as a buffer
    #[arg(short, long, value_name = "PIECES", value_parser = parse_pieces)]
    disorient: Option<PieceSet>,

    /// The exact number of bad edges on the whole cube
    #[arg(short = 'e', long = "badedges", value_name = "N")]
    bad_edges: Option<usize>,

    /// Last layer corner orientation cases to choose from, such as "T U Pi S AS"
    #[arg(short = 'c', long, value_name = "CASES")]
    ocll: Option<String>,

    /// Finish with a random AUF
    #[arg(short, long)]
    auf: bool,

    /// Apply this algorithm before scrambling
    #[arg(long = "pre", visible_alias = "premoves", value_name = "ALG")]
    pre_moves: Option<Algorithm>,

    /// Apply this algorithm after scrambling
    #[arg(long = "post", visible_alias = "postmoves", value_name = "ALG")]
    post_moves: Option<Algorithm>,

    /// Seed the random source to get the same scramble every time
    #[arg(long)]
    seed: Option<u64>,

    /// The configuration file to use, in TOML format
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Fail instead of warning when a constraint cannot be met
    #[arg(long)]
    strict: bool,

    /// Print the facelets of the state instead of a scramble
    #[arg(long)]
    state: bool,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    let mut scrambler = cli.seed.map_or_else(Scrambler::new, Scrambler::with_seed);
    let adjustment = build_state(&cli, &config, &mut scrambler)?;

    if !adjustment.disturbed.is_empty() {
        warn!(
            "Also moved {} to keep the cube solvable",
            adjustment.disturbed.pieces().join(", ")
        );
    }

    if cli.state {
        println!("{}", scrambler.cube());
        return Ok(());
    }

    let mut solver = TwophaseSolver::new(config.solver);
    let scramble = scramble_for(scrambler.cube(), &mut solver)?;

    let mut check = CubeState::solved();
    check.apply_algorithm(&scramble);
    if &check != scrambler.cube() {
        return Err(eyre!(
            "The solver returned `{scramble}`, which does not lead to {}",
            scrambler.cube()
        ));
    }

    println!("{scramble}");

    Ok(())
}

/// Merge what an operation gave up into `total`, or fail on any compromise in strict mode
fn record(
    total: &mut Adjustment,
    adjustment: Adjustment,
    strict: bool,
) -> Result<(), ScrambleError> {
    let adjustment = if strict {
        adjustment.require_exact()?
    } else {
        adjustment
    };

    total.merge(adjustment);
    Ok(())
}

fn run_script(
    file: &Path,
    config: &Config,
    strict: bool,
    scrambler: &mut Scrambler,
) -> color_eyre::Result<Adjustment> {
    let script = Script::from_file(file)?;
    let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut interpreter = Interpreter::new(&script, dir, std::mem::take(scrambler))
        .with_max_include_depth(config.script.max_include_depth)
        .strict(strict);
    let result = interpreter.run().cloned();
    *scrambler = interpreter.into_scrambler();

    Ok(result?)
}

/// Apply every option to the cube in a fixed order
fn build_state(
    cli: &Cli,
    config: &Config,
    scrambler: &mut Scrambler,
) -> color_eyre::Result<Adjustment> {
    let ocll = cli
        .ocll
        .as_deref()
        .map(TwistCase::parse_list)
        .transpose()?;

    let mut adjustment = Adjustment::default();

    if let Some(alg) = &cli.pre_moves {
        scrambler.apply_algorithm(alg);
    }

    if let Some(file) = &cli.file {
        info!("Running {}", file.display());
        let script_adjustment = run_script(file, config, cli.strict, scrambler)?;
        adjustment.merge(script_adjustment);
    } else if let Some(step) = cli.step {
        info!("Setting up {step}");
        record(&mut adjustment, scrambler.set_step(step), cli.strict)?;
    } else {
        match &cli.permutable {
            Some(pieces) => scrambler.random_permutation(&pieces.corners, &pieces.edges),
            None if cli.arrange.is_none() && cli.derange.is_none() => {
                scrambler.random_permutation(&CornerLoc::ALL, &EdgeLoc::ALL);
            }
            None => {}
        }

        match &cli.orientable {
            Some(pieces) => {
                scrambler.random_corner_orientation(&pieces.corners);
                scrambler.random_edge_orientation(&pieces.edges);
            }
            None if cli.orient.is_none() && cli.disorient.is_none() && ocll.is_none() => {
                scrambler.random_corner_orientation(&CornerLoc::ALL);
                scrambler.random_edge_orientation(&EdgeLoc::ALL);
            }
            None => {}
        }
    }

    if let Some(n) = cli.bad_edges {
        scrambler.set_bad_edge_count(n)?;
    }

    let permutable = cli.permutable.clone().unwrap_or_default();
    if let Some(target) = &cli.derange {
        record(&mut adjustment, scrambler.derange(target, &permutable), cli.strict)?;
    } else if let Some(target) = &cli.arrange {
        record(&mut adjustment, scrambler.arrange(target, &permutable), cli.strict)?;
    }

    let orientable = cli.orientable.clone().unwrap_or_default();
    if let Some(target) = &cli.disorient {
        record(&mut adjustment, scrambler.disorient(target, &orientable), cli.strict)?;
    } else if let Some(target) = &cli.orient {
        record(&mut adjustment, scrambler.orient(target, &orientable), cli.strict)?;
    }

    if let Some(cases) = &ocll {
        record(&mut adjustment, scrambler.twist_last_layer_case(cases), cli.strict)?;
    }

    if let Some(alg) = &cli.post_moves {
        scrambler.apply_algorithm(alg);
    }

    if cli.auf {
        scrambler.random_auf();
    }

    if !adjustment.is_exact() {
        warn!(
            "Could not keep the constraints on {}",
            adjustment.compromised.iter().join(", ")
        );
    }

    Ok(adjustment)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use yasg_core::Face;

    use super::*;

    fn state(args: &[&str]) -> color_eyre::Result<Scrambler> {
        let cli = Cli::try_parse_from(["yasg"].iter().chain(args))?;
        let mut scrambler = Scrambler::with_seed(cli.seed.unwrap_or(0));
        build_state(&cli, &Config::default(), &mut scrambler)?;
        Ok(scrambler)
    }

    #[test]
    fn arguments_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test_log::test]
    fn default_is_a_random_state() {
        let scrambler = state(&["--seed", "5"]).unwrap();
        assert!(scrambler.cube().is_reachable());
        assert!(!scrambler.cube().is_solved());
    }

    #[test_log::test]
    fn step_option() {
        for seed in 0..10 {
            let seed = seed.to_string();
            let scrambler = state(&["-s", "pll", "--seed", &seed]).unwrap();
            let facelets = scrambler.cube().to_string();

            assert_eq!(&facelets[0..9], "UUUUUUUUU");
            assert_eq!(&facelets[27..36], "DDDDDDDDD");
        }
    }

    #[test_log::test]
    fn constrained_options() {
        for seed in 0..20 {
            let seed = seed.to_string();
            let scrambler = state(&[
                "-p", "U | U", "-o", "U | U", "-D", "DFR | FR", "-d", "DRF | RF", "--seed", &seed,
            ])
            .unwrap();
            let cube = scrambler.cube();

            assert!(cube.is_reachable());
            assert!(!cube.corner_is_solved(CornerLoc::DFR));
            assert!(!cube.edge_is_solved(EdgeLoc::FR));
            assert!(!cube[CornerLoc::DFR].is_oriented());
            assert!(cube.corner_is_solved(CornerLoc::DBL));
            assert!(cube.edge_is_solved(EdgeLoc::DB));
        }
    }

    #[test_log::test]
    fn bad_edges_and_ocll() {
        let scrambler = state(&["-e", "4", "-c", "H pi", "-p", "|", "--seed", "9"]).unwrap();
        let cube = scrambler.cube();

        assert_eq!(cube.flipped_edge_count(), 4);
        let twisted = CornerLoc::ALL
            .into_iter()
            .filter(|&loc| !cube[loc].is_oriented())
            .count();
        assert_eq!(twisted, 4);
        assert!(CornerLoc::ALL.into_iter().all(|loc| cube[loc].home() == loc
            || (loc.touches(Face::U) && cube[loc].home().touches(Face::U))));
    }

    #[test_log::test]
    fn strict_mode() {
        let args = ["-p", "|", "-o", "|", "-D", "| UF"];
        assert!(state(&args).is_ok());

        let err = state(&[&args[..], &["--strict"]].concat()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScrambleError>(),
            Some(ScrambleError::UnderconstrainedRequest(_))
        ));
    }

    #[test]
    fn bad_arguments() {
        assert!(Cli::try_parse_from(["yasg", "-s", "Roux"]).is_err());
        assert!(Cli::try_parse_from(["yasg", "-p", "URF UFL"]).is_err());
        assert!(Cli::try_parse_from(["yasg", "--pre", "R3"]).is_err());
        assert!(Cli::try_parse_from(["yasg", "-s", "LL", "-f", "ll.yasg"]).is_err());
        assert!(state(&["-e", "3"]).is_err());
        assert!(state(&["-c", "T X"]).is_err());
    }
}
