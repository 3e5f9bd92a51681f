//! An interactive shell for walking a [`Tree`] the way one walks a file system.
//!
//! A line is split into words (see [`words`]), the first word picks a
//! [`Command`] from the [`Registry`], wildcard arguments are expanded against
//! the tree, and the command runs against the [`Session`]. Anything after a
//! `>` names a file that receives the output instead.

use std::{
    fs::File,
    io::{BufWriter, Write},
};

use log::debug;

pub mod command;
pub mod commands;
pub mod words;

pub use command::{Command, Flow, Output, Registry, Session, ShellError};
use words::{expand_words, split_words};

use crate::tree::{visitors::Decoration, Tree};

pub struct Shell {
    pub session: Session,
    pub registry: Registry,
    /// Colour the prompt and non-leaf names on the terminal.
    pub color: bool,
}

impl Shell {
    pub fn new(tree: Tree, color: bool) -> Self {
        Shell {
            session: Session::new(tree),
            registry: Registry::standard(),
            color,
        }
    }

    pub fn prompt(&self) -> String {
        let pwd = self.session.pwd();
        if self.color {
            let Decoration { open, close } = Decoration::default();
            format!("{open}{pwd}{close}> ")
        } else {
            format!("{pwd}> ")
        }
    }

    pub fn help(&self, out: &mut dyn Write) -> std::io::Result<()> {
        self.registry.help(out)
    }

    /// Runs one command line. Blank lines do nothing; `h` and `help` print the
    /// command listing.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow, ShellError> {
        let (line, target) = match split_redirect(line) {
            Some((line, target)) => match target.trim() {
                "" => return Err(ShellError::MissingRedirect),
                target => (line, Some(target)),
            },
            None => (line, None),
        };

        let words = split_words(line)?;
        let Some((verb, rest)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        let verb = verb.unquoted();

        let Some(command) = self.registry.create(verb) else {
            if verb == "h" || verb == "help" {
                self.help(out)?;
                return Ok(Flow::Continue);
            }
            return Err(ShellError::UnknownCommand(verb.to_string()));
        };

        let args = if command.expands_globs() {
            expand_words(&self.session.tree, self.session.current, rest)?
        } else {
            rest.iter().map(|w| w.unquoted().to_string()).collect()
        };
        debug!("{verb} {args:?}");

        match target {
            Some(target) => {
                let mut file = BufWriter::new(File::create(target)?);
                let flow = command.run(&mut self.session, &args, &mut Output::new(&mut file, false))?;
                file.flush()?;
                Ok(flow)
            }
            None => command.run(&mut self.session, &args, &mut Output::new(out, self.color)),
        }
    }
}

/// Splits `line` at the first `>` that is not inside double quotes.
fn split_redirect(line: &str) -> Option<(&str, &str)> {
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '>' if !quoted => return Some((&line[..i], &line[i + 1..])),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn redirect_ignores_quoted_arrows() {
        assert_eq!(split_redirect("ls A > out"), Some(("ls A ", " out")));
        assert_eq!(split_redirect("find \"a>b\""), None);
        assert_eq!(
            split_redirect("find \"a>b\" > out"),
            Some(("find \"a>b\" ", " out"))
        );
        assert_eq!(split_redirect("pwd"), None);
    }
}
