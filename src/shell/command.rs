use std::{
    collections::BTreeMap,
    io::{self, Write},
};

use clap::{error::ErrorKind, Parser};
use thiserror::Error;

use crate::{
    path::{follow, PathError},
    tree::{NodeId, Tree},
};

use super::commands::{Cd, Find, Ls, Pwd, Quit, TreeCmd};

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Args(#[from] clap::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("too many arguments")]
    TooManyArguments,
    #[error("{0}: unknown command")]
    UnknownCommand(String),
    #[error("missing file name after '>'")]
    MissingRedirect,
    #[error("{0}")]
    Invalid(String),
}

/// What the shell does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The navigation state shared by every command.
#[derive(Debug, Clone)]
pub struct Session {
    pub tree: Tree,
    pub current: NodeId,
}

impl Session {
    pub fn new(tree: Tree) -> Self {
        let current = tree.root();
        Session { tree, current }
    }

    /// Follows `path` from the current node.
    pub fn resolve(&self, path: &str) -> Result<NodeId, PathError> {
        follow(&self.tree, path, Some(self.current))
    }

    pub fn pwd(&self) -> String {
        self.tree.path_of(self.current)
    }
}

/// Where a command writes. `color` is off when the output goes to a file.
pub struct Output<'w> {
    writer: &'w mut dyn Write,
    pub color: bool,
}

impl<'w> Output<'w> {
    pub fn new(writer: &'w mut dyn Write, color: bool) -> Self {
        Output { writer, color }
    }
}

impl Write for Output<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

pub trait Command {
    /// The verb that runs the command.
    fn name(&self) -> &'static str;

    /// One line for the help listing.
    fn summary(&self) -> &'static str;

    /// Whether wildcard words are expanded before [`Command::run`] sees them.
    fn expands_globs(&self) -> bool {
        true
    }

    /// `args` excludes the verb.
    fn run(&self, session: &mut Session, args: &[String], out: &mut Output)
        -> Result<Flow, ShellError>;
}

/// Parses `args` with clap. `-h` prints the usage and yields `None`.
pub(crate) fn parse_args<P: Parser>(
    verb: &str,
    args: &[String],
    out: &mut Output,
) -> Result<Option<P>, ShellError> {
    let argv = std::iter::once(verb).chain(args.iter().map(String::as_str));
    match P::try_parse_from(argv) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            write!(out, "{}", e.render())?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub type Constructor = fn() -> Box<dyn Command>;

/// Maps verbs to command constructors.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: BTreeMap<&'static str, Constructor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `ls`, `cd`, `pwd`, `tree`, `find` and `q`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add("ls", || Box::new(Ls));
        registry.add("cd", || Box::new(Cd));
        registry.add("pwd", || Box::new(Pwd));
        registry.add("tree", || Box::new(TreeCmd));
        registry.add("find", || Box::new(Find));
        registry.add("q", || Box::new(Quit));
        registry
    }

    /// Registers `verb`, replacing any previous command with that verb.
    pub fn add(&mut self, verb: &'static str, constructor: Constructor) {
        self.commands.insert(verb, constructor);
    }

    pub fn create(&self, verb: &str) -> Option<Box<dyn Command>> {
        self.commands.get(verb).map(|make| make())
    }

    pub fn verbs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    pub fn help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Available commands:")?;
        for (verb, make) in &self.commands {
            writeln!(out, "\t{verb}\t{}", make().summary())?;
        }
        writeln!(out, "Run \"cmd -h\" for the usage of any command.")
    }
}
