#![warn(clippy::pedantic)]

use std::{
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use log::{debug, info, trace};
use thiserror::Error;
use yasg_core::{Adjustment, ScrambleError, Scrambler};

pub mod pieces;
mod script;

pub use script::{Command, Script, Statement, WithSpan};

/// How many files may be included inside of each other by default
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 16;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Line {line}: unknown command `{keyword}`")]
    UnknownCommand { line: usize, keyword: String },
    #[error("Line {line}: {reason}")]
    Syntax { line: usize, reason: String },
    #[error("Line {line}: {source}")]
    Scramble {
        line: usize,
        #[source]
        source: ScrambleError,
    },
    #[error("Expected `corners | edges`, got `{0}`")]
    MissingSeparator(String),
    #[error(transparent)]
    Notation(#[from] ScrambleError),
    #[error("Could not read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("In `{}`: {source}", path.display())]
    Included {
        path: PathBuf,
        #[source]
        source: Box<ScriptError>,
    },
    #[error("Files are included more than {0} levels deep")]
    IncludeDepth(usize),
}

impl Script {
    /// Read and parse a script from disk
    pub fn from_file(path: &Path) -> Result<Script, ScriptError> {
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_owned(),
            source,
        })?;

        Script::parse(&text)
    }
}

/// What the statement that was just executed did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionPerformed {
    Executed { line: usize },
    ChoseAlternative { index: usize, of: usize },
    Included { path: PathBuf },
    /// Reached the end of a block or an included file
    Returned,
    Finished,
}

/// A block of statements being executed
struct Frame {
    statements: Rc<[Statement]>,
    program_counter: usize,
    /// Directory that `file` commands are relative to
    dir: PathBuf,
    include_depth: usize,
}

type Loader = Box<dyn FnMut(&Path) -> io::Result<String>>;

/// Executes a script against a scrambler, one statement at a time
pub struct Interpreter {
    scrambler: Scrambler,
    frames: Vec<Frame>,
    loader: Loader,
    max_include_depth: usize,
    strict: bool,
    adjustment: Adjustment,
}

impl Interpreter {
    /// Create an interpreter for a script whose includes resolve against `dir`
    pub fn new(script: &Script, dir: impl Into<PathBuf>, scrambler: Scrambler) -> Interpreter {
        Interpreter {
            scrambler,
            frames: vec![Frame {
                statements: Rc::clone(script.statements()),
                program_counter: 0,
                dir: dir.into(),
                include_depth: 0,
            }],
            loader: Box::new(|path: &Path| fs::read_to_string(path)),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            strict: false,
            adjustment: Adjustment::default(),
        }
    }

    /// Read included files through `loader` instead of from disk
    #[must_use]
    pub fn with_loader(
        mut self,
        loader: impl FnMut(&Path) -> io::Result<String> + 'static,
    ) -> Interpreter {
        self.loader = Box::new(loader);
        self
    }

    #[must_use]
    pub fn with_max_include_depth(mut self, max_include_depth: usize) -> Interpreter {
        self.max_include_depth = max_include_depth;
        self
    }

    /// Fail instead of warning when a constrained command has to compromise a target
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Interpreter {
        self.strict = strict;
        self
    }

    pub fn scrambler(&self) -> &Scrambler {
        &self.scrambler
    }

    pub fn into_scrambler(self) -> Scrambler {
        self.scrambler
    }

    /// Everything the constrained commands had to give up so far
    pub fn adjustment(&self) -> &Adjustment {
        &self.adjustment
    }

    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }

    /// Execute statements until the script ends
    pub fn run(&mut self) -> Result<&Adjustment, ScriptError> {
        while self.step()? != ActionPerformed::Finished {}

        Ok(&self.adjustment)
    }

    /// Execute one statement
    pub fn step(&mut self) -> Result<ActionPerformed, ScriptError> {
        let Some(frame) = self.frames.last_mut() else {
            return Ok(ActionPerformed::Finished);
        };

        let Some(statement) = frame.statements.get(frame.program_counter).cloned() else {
            self.frames.pop();
            trace!("Returning, {} frames left", self.frames.len());

            return Ok(if self.frames.is_empty() {
                ActionPerformed::Finished
            } else {
                ActionPerformed::Returned
            });
        };

        frame.program_counter += 1;

        match statement {
            Statement::Alternatives(branches) => {
                let index = self.scrambler.rng().usize(..branches.len());
                trace!("Choosing alternative {} of {}", index + 1, branches.len());

                let dir = frame.dir.clone();
                let include_depth = frame.include_depth;
                self.frames.push(Frame {
                    statements: Rc::clone(&branches[index]),
                    program_counter: 0,
                    dir,
                    include_depth,
                });

                Ok(ActionPerformed::ChoseAlternative {
                    index,
                    of: branches.len(),
                })
            }
            Statement::Include(path) => {
                let path = frame.dir.join(&path.value);
                let include_depth = frame.include_depth + 1;
                self.include(path, include_depth)
            }
            Statement::Command(command) => {
                let line = command.line_num();

                let adjustment = execute(&mut self.scrambler, &command)
                    .map_err(|source| ScriptError::Scramble { line, source })?;

                if self.strict {
                    adjustment
                        .clone()
                        .require_exact()
                        .map_err(|source| ScriptError::Scramble { line, source })?;
                }

                self.adjustment.merge(adjustment);
                Ok(ActionPerformed::Executed { line })
            }
        }
    }

    fn include(
        &mut self,
        path: PathBuf,
        include_depth: usize,
    ) -> Result<ActionPerformed, ScriptError> {
        if include_depth > self.max_include_depth {
            return Err(ScriptError::IncludeDepth(self.max_include_depth));
        }

        info!("Including {}", path.display());

        let text = (self.loader)(&path).map_err(|source| ScriptError::Io {
            path: path.clone(),
            source,
        })?;
        let script = Script::parse(&text).map_err(|source| ScriptError::Included {
            path: path.clone(),
            source: Box::new(source),
        })?;

        self.frames.push(Frame {
            statements: Rc::clone(script.statements()),
            program_counter: 0,
            dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            include_depth,
        });

        Ok(ActionPerformed::Included { path })
    }
}

fn execute(scrambler: &mut Scrambler, command: &Command) -> Result<Adjustment, ScrambleError> {
    debug!("Executing {command:?}");

    let adjustment = match command {
        Command::Permutable(pieces) => {
            scrambler.random_permutation(&pieces.corners, &pieces.edges);
            Adjustment::default()
        }
        Command::Orientable(pieces) => {
            scrambler.random_corner_orientation(&pieces.corners);
            scrambler.random_edge_orientation(&pieces.edges);
            Adjustment::default()
        }
        Command::Step(step) => scrambler.set_step(*step),
        Command::BadEdges(n) => {
            scrambler.flip_exactly_n(*n)?;
            Adjustment::default()
        }
        Command::Ocll(cases) => scrambler.twist_last_layer_case(cases),
        Command::Moves(alg) => {
            scrambler.apply_algorithm(alg);
            Adjustment::default()
        }
        Command::Auf => {
            scrambler.random_auf();
            Adjustment::default()
        }
        Command::Orient { target, buffer } => scrambler.orient(target, buffer),
        Command::Disorient { target, buffer } => scrambler.disorient(target, buffer),
        Command::Arrange { target, buffer } => scrambler.arrange(target, buffer),
        Command::Derange { target, buffer } => scrambler.derange(target, buffer),
    };

    Ok(adjustment)
}
