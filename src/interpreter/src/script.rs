use std::{
    ops::{Deref, DerefMut},
    path::PathBuf,
    rc::Rc,
};

use yasg_core::{Algorithm, PieceSet, Step, TwistCase};

use crate::{ScriptError, pieces::parse_pieces};

/// A value along with the line of the script it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithSpan<T> {
    pub value: T,
    line_num: usize,
}

impl<T> Deref for WithSpan<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> DerefMut for WithSpan<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<T> WithSpan<T> {
    pub fn new(value: T, line_num: usize) -> WithSpan<T> {
        WithSpan { value, line_num }
    }

    pub fn line_num(&self) -> usize {
        self.line_num
    }
}

/// A single scrambling instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Permutable(PieceSet),
    Orientable(PieceSet),
    Step(Step),
    BadEdges(usize),
    Ocll(Vec<TwistCase>),
    Moves(Algorithm),
    Auf,
    Orient { target: PieceSet, buffer: PieceSet },
    Disorient { target: PieceSet, buffer: PieceSet },
    Arrange { target: PieceSet, buffer: PieceSet },
    Derange { target: PieceSet, buffer: PieceSet },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Command(WithSpan<Command>),
    /// Run another script, relative to the directory of this one
    Include(WithSpan<PathBuf>),
    /// Exactly one of the blocks runs, chosen uniformly
    Alternatives(Vec<Rc<[Statement]>>),
}

/// A parsed scramble script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    statements: Rc<[Statement]>,
}

impl Script {
    pub fn statements(&self) -> &Rc<[Statement]> {
        &self.statements
    }

    /// Parse the text of a script. Every command is checked here so that running it can only fail
    /// on engine errors and missing files.
    pub fn parse(text: &str) -> Result<Script, ScriptError> {
        // Blocks of alternatives that are still open, with the line they started on
        let mut open: Vec<(usize, Vec<Vec<Statement>>)> = Vec::new();
        let mut current = Vec::new();

        for (i, line) in text.lines().enumerate() {
            let line_num = i + 1;
            let line = line.split('#').next().unwrap_or_default().trim();

            if line.is_empty() {
                continue;
            }

            let (keyword, args) = line
                .split_once(char::is_whitespace)
                .map_or((line, ""), |(keyword, args)| (keyword, args.trim()));
            let keyword = keyword.to_ascii_lowercase();

            let syntax = |reason: String| ScriptError::Syntax {
                line: line_num,
                reason,
            };

            match keyword.as_str() {
                "[" | "or" | "]" if !args.is_empty() => {
                    return Err(syntax(format!("Unexpected `{args}` after `{keyword}`")));
                }
                "[" => open.push((line_num, vec![std::mem::take(&mut current)])),
                "or" => {
                    let Some((_, branches)) = open.last_mut() else {
                        return Err(syntax("`or` outside of a `[` block".to_owned()));
                    };
                    branches.push(std::mem::take(&mut current));
                }
                "]" => {
                    let Some((_, mut branches)) = open.pop() else {
                        return Err(syntax("`]` without a matching `[`".to_owned()));
                    };
                    // The first entry holds what came before the block
                    let alternatives = branches
                        .drain(1..)
                        .chain([std::mem::take(&mut current)])
                        .map(Rc::from)
                        .collect();
                    current = branches.pop().unwrap_or_default();
                    current.push(Statement::Alternatives(alternatives));
                }
                "file" if args.is_empty() => {
                    return Err(syntax("`file` needs a path".to_owned()));
                }
                "file" => current.push(Statement::Include(WithSpan::new(
                    PathBuf::from(args),
                    line_num,
                ))),
                _ => {
                    let command = parse_command(&keyword, args, line_num)?;
                    current.push(Statement::Command(WithSpan::new(command, line_num)));
                }
            }
        }

        if let Some((line, _)) = open.last() {
            return Err(ScriptError::Syntax {
                line: *line,
                reason: "`[` is never closed".to_owned(),
            });
        }

        Ok(Script {
            statements: Rc::from(current),
        })
    }
}

/// Split `target buffer pieces` at the `buffer` keyword; a missing buffer is empty
fn parse_buffered(args: &str) -> Result<(PieceSet, PieceSet), ScriptError> {
    let words = args.split_whitespace().collect::<Vec<_>>();

    match words
        .iter()
        .position(|word| word.eq_ignore_ascii_case("buffer"))
    {
        Some(i) => Ok((
            parse_pieces(&words[..i].join(" "))?,
            parse_pieces(&words[i + 1..].join(" "))?,
        )),
        None => Ok((parse_pieces(args)?, PieceSet::none())),
    }
}

fn parse_command(keyword: &str, args: &str, line_num: usize) -> Result<Command, ScriptError> {
    let in_line = |err: ScriptError| match err {
        ScriptError::Syntax { .. } => err,
        err => ScriptError::Syntax {
            line: line_num,
            reason: err.to_string(),
        },
    };

    let command = match keyword {
        "permutable" | "permute" => Command::Permutable(parse_pieces(args).map_err(in_line)?),
        "orientable" => Command::Orientable(parse_pieces(args).map_err(in_line)?),
        "step" => Command::Step(
            args.parse()
                .map_err(|err: yasg_core::ScrambleError| in_line(err.into()))?,
        ),
        "badedges" => Command::BadEdges(args.parse().map_err(|_| ScriptError::Syntax {
            line: line_num,
            reason: format!("`{args}` is not a number of edges"),
        })?),
        "ocll" => Command::Ocll(TwistCase::parse_list(args).map_err(|err| in_line(err.into()))?),
        "moves" => Command::Moves(
            args.parse()
                .map_err(|err: yasg_core::ScrambleError| in_line(err.into()))?,
        ),
        "auf" => Command::Auf,
        "orient" | "disorient" | "arrange" | "derange" => {
            let (target, buffer) = parse_buffered(args).map_err(in_line)?;
            match keyword {
                "orient" => Command::Orient { target, buffer },
                "disorient" => Command::Disorient { target, buffer },
                "arrange" => Command::Arrange { target, buffer },
                _ => Command::Derange { target, buffer },
            }
        }
        _ => {
            return Err(ScriptError::UnknownCommand {
                line: line_num,
                keyword: keyword.to_owned(),
            });
        }
    };

    Ok(command)
}
