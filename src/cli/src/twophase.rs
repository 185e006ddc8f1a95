use std::{
    fs,
    io::{self, BufRead, BufReader, Write},
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
};

use itertools::Itertools;
use log::{debug, info, trace, warn};
use yasg_core::{Algorithm, ScrambleError, Solver};

use crate::config::SolverConfig;

/// A running rob-twophase process
struct Process {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Solves cubes with Elias Frantar's rob-twophase, started on the first request and kept alive
/// for the ones after it
pub struct TwophaseSolver {
    config: SolverConfig,
    process: Option<Process>,
}

impl TwophaseSolver {
    pub fn new(config: SolverConfig) -> TwophaseSolver {
        TwophaseSolver {
            config,
            process: None,
        }
    }

    fn spawn(&self) -> io::Result<Process> {
        let table_dir = self.config.table_dir();
        fs::create_dir_all(&table_dir)?;

        info!(
            "Starting {} with tables in {}",
            self.config.command,
            table_dir.display()
        );

        let mut child = Command::new(&self.config.command)
            .current_dir(table_dir)
            .args(["-c", "-m"])
            .arg(self.config.max_length.to_string())
            .arg("-t")
            .arg(self.config.threads().to_string())
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let piped = |what| io::Error::other(format!("the solver's {what} is not piped"));
        let stdin = child.stdin.take().ok_or_else(|| piped("stdin"))?;
        let stdout = BufReader::new(child.stdout.take().ok_or_else(|| piped("stdout"))?);

        Ok(Process {
            child,
            stdin,
            stdout,
        })
    }

    /// Send one `solve` request and return the line holding the solution
    fn request(&mut self, facelets: &str) -> io::Result<String> {
        let process = match &mut self.process {
            Some(process) => process,
            None => self.process.insert(self.spawn()?),
        };

        /*
        The conversation looks like

        ```
        This is rob-twophase v2.0; copyright Elias Frantar 2020.

        Loading tables ...
        Done. 0.518s

        Enter >>solve FACECUBE<< to solve, >>scramble<< to scramble or >>bench<< to benchmark.

        Ready!
        solve LBDLULDDURDRRRFRURBFFRFBFRDLDBDDBDFBBULRLFFBUFLUUBUULL
        30.177ms
        R F2 R' U R U2 F2 U2 F' D' R D2 L2 D2 L' U2 F2 (17)
        Ready!
        ```
        */

        loop {
            let mut line = String::new();
            if process.stdout.read_line(&mut line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "the solver exited before it was ready",
                ));
            }

            trace!("twophase: {}", line.trim_end());

            if line.trim_end() == "Ready!" {
                break;
            }
        }

        writeln!(process.stdin, "solve {facelets}")?;
        process.stdin.flush()?;

        let mut timing = String::new();
        process.stdout.read_line(&mut timing)?;
        debug!("Solved in {}", timing.trim_end());

        let mut solution = String::new();
        if process.stdout.read_line(&mut solution)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "the solver exited without a solution",
            ));
        }

        Ok(solution)
    }
}

impl Drop for TwophaseSolver {
    fn drop(&mut self) {
        if let Some(mut process) = self.process.take() {
            if let Err(e) = process.child.kill() {
                warn!("Failed to stop the solver: {e}");
            }
            let _ = process.child.wait();
        }
    }
}

/// Parse a line like `R F2 R' U (4)`, dropping the move count
fn parse_solution(line: &str) -> Result<Algorithm, String> {
    let moves = line
        .replace(['(', ')'], "")
        .split_whitespace()
        .filter(|v| v.chars().next().is_some_and(|v| !v.is_ascii_digit()))
        .join(" ");

    moves
        .parse()
        .map_err(|_| format!("unexpected output `{}`", line.trim_end()))
}

impl Solver for TwophaseSolver {
    fn solve(&mut self, facelets: &str) -> Result<Algorithm, ScrambleError> {
        let failure = |reason: String| ScrambleError::SolverFailure {
            state: facelets.to_owned(),
            reason,
        };

        let line = self.request(facelets).map_err(|e| {
            // Start a fresh process next time
            self.process = None;
            failure(e.to_string())
        })?;

        parse_solution(&line).map_err(failure)
    }
}
