//! The stock commands.

use std::io::Write;

use clap::Parser;

use super::command::{parse_args, Command, Flow, Output, Session, ShellError};
use crate::tree::{
    visitors::{find, print_tree, Decoration, NameMatch, PrintConfig},
    Node, NodeId, Tree,
};

fn write_name(out: &mut Output, node: &Node<()>, long: bool) -> Result<(), ShellError> {
    if long {
        write!(out, "{}: {}: ", node.level(), node.index())?;
    }
    if out.color && !node.is_leaf() {
        let Decoration { open, close } = Decoration::default();
        writeln!(out, "{open}{}{close}", node.name())?;
    } else {
        writeln!(out, "{}", node.name())?;
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "ls", about = "List nodes", disable_version_flag = true)]
struct LsArgs {
    /// Long listing: level and index before each name.
    #[arg(short)]
    long: bool,
    /// List the node itself instead of its children.
    #[arg(short)]
    directory: bool,
    paths: Vec<String>,
}

pub struct Ls;

impl Ls {
    fn list(
        tree: &Tree,
        id: NodeId,
        args: &LsArgs,
        out: &mut Output,
    ) -> Result<(), ShellError> {
        let node = &tree[id];
        if node.is_leaf() || args.directory {
            return write_name(out, node, args.long);
        }
        for child in tree.children(id) {
            write_name(out, &tree[child], args.long)?;
        }
        Ok(())
    }
}

impl Command for Ls {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn summary(&self) -> &'static str {
        "list nodes"
    }

    fn run(&self, session: &mut Session, args: &[String], out: &mut Output) -> Result<Flow, ShellError> {
        let Some(args) = parse_args::<LsArgs>(self.name(), args, out)? else {
            return Ok(Flow::Continue);
        };

        if args.paths.is_empty() {
            Self::list(&session.tree, session.current, &args, out)?;
        }
        for path in &args.paths {
            let id = session.resolve(path)?;
            Self::list(&session.tree, id, &args, out)?;
        }
        Ok(Flow::Continue)
    }
}

#[derive(Parser, Debug)]
#[command(name = "cd", about = "Change the current node; no path goes to the root", disable_version_flag = true)]
struct CdArgs {
    paths: Vec<String>,
}

pub struct Cd;

impl Command for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn summary(&self) -> &'static str {
        "change directory"
    }

    fn run(&self, session: &mut Session, args: &[String], out: &mut Output) -> Result<Flow, ShellError> {
        let Some(args) = parse_args::<CdArgs>(self.name(), args, out)? else {
            return Ok(Flow::Continue);
        };

        session.current = match args.paths.as_slice() {
            [] => session.tree.root(),
            [path] if path.trim().is_empty() => session.tree.root(),
            [path] => session.resolve(path)?,
            _ => return Err(ShellError::TooManyArguments),
        };
        Ok(Flow::Continue)
    }
}

#[derive(Parser, Debug)]
#[command(name = "pwd", about = "Print the path of the current node", disable_version_flag = true)]
struct PwdArgs {}

pub struct Pwd;

impl Command for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn summary(&self) -> &'static str {
        "print working directory"
    }

    fn run(&self, session: &mut Session, args: &[String], out: &mut Output) -> Result<Flow, ShellError> {
        if parse_args::<PwdArgs>(self.name(), args, out)?.is_some() {
            writeln!(out, "{}", session.pwd())?;
        }
        Ok(Flow::Continue)
    }
}

#[derive(Parser, Debug)]
#[command(name = "tree", about = "Print the tree below the current node or below a path", disable_version_flag = true)]
struct TreeArgs {
    /// Long print: level and index before each name.
    #[arg(short)]
    long: bool,
    /// Descend no more than this many levels.
    #[arg(short = 'L', value_name = "DEPTH")]
    max_depth: Option<usize>,
    /// Character used for indentation.
    #[arg(short = 't', value_name = "CHAR", default_value_t = '\t')]
    indent: char,
    paths: Vec<String>,
}

pub struct TreeCmd;

impl Command for TreeCmd {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn summary(&self) -> &'static str {
        "print tree"
    }

    fn run(&self, session: &mut Session, args: &[String], out: &mut Output) -> Result<Flow, ShellError> {
        let Some(args) = parse_args::<TreeArgs>(self.name(), args, out)? else {
            return Ok(Flow::Continue);
        };

        let start = match args.paths.as_slice() {
            [] => session.current,
            [path] => session.resolve(path)?,
            _ => return Err(ShellError::TooManyArguments),
        };

        let config = PrintConfig {
            long: args.long,
            indent: Some(args.indent),
            min_depth: 0,
            max_depth: args.max_depth.map(|d| d.saturating_add(1)),
            decoration: out.color.then(Decoration::default),
        };
        print_tree(&session.tree, start, &mut *out, config)?;
        Ok(Flow::Continue)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "find",
    about = "Find nodes by name",
    override_usage = "find [-e] [-l LEVEL] [WHERE] [WHAT]",
    disable_version_flag = true
)]
struct FindArgs {
    /// Exact match instead of a wildcard pattern.
    #[arg(short)]
    exact: bool,
    /// Search this level only.
    #[arg(short, value_name = "LEVEL")]
    level: Option<usize>,
    /// `[what]` or `[where] [what]`.
    words: Vec<String>,
}

pub struct Find;

impl Command for Find {
    fn name(&self) -> &'static str {
        "find"
    }

    fn summary(&self) -> &'static str {
        "find node"
    }

    // `what` is matched against names, never expanded against the tree
    fn expands_globs(&self) -> bool {
        false
    }

    fn run(&self, session: &mut Session, args: &[String], out: &mut Output) -> Result<Flow, ShellError> {
        let Some(args) = parse_args::<FindArgs>(self.name(), args, out)? else {
            return Ok(Flow::Continue);
        };

        let (start, what) = match args.words.as_slice() {
            [] => (session.current, "*"),
            [what] => (session.current, what.as_str()),
            [place, what] => (session.resolve(place)?, what.as_str()),
            _ => return Err(ShellError::TooManyArguments),
        };

        let delimiter = session.tree.delimiter();
        if what.contains(delimiter) {
            return Err(ShellError::Invalid(format!(
                "find matches names only, but {what:?} contains the delimiter {delimiter:?}"
            )));
        }

        let matcher = if args.exact {
            NameMatch::Exact(what.to_string())
        } else {
            NameMatch::glob(what)?
        };
        for id in find(&session.tree, start, matcher, args.level) {
            writeln!(out, "{}", session.tree.path_of(id))?;
        }
        Ok(Flow::Continue)
    }
}

pub struct Quit;

impl Command for Quit {
    fn name(&self) -> &'static str {
        "q"
    }

    fn summary(&self) -> &'static str {
        "quit"
    }

    fn run(&self, _: &mut Session, _: &[String], _: &mut Output) -> Result<Flow, ShellError> {
        Ok(Flow::Quit)
    }
}

#[cfg(test)]
mod test {
    use similar_asserts::assert_eq;

    use super::*;

    fn session() -> Session {
        Session::new(Tree::from_paths(["/A/A1/A23", "/A/A2", "/B/B1"], '/'))
    }

    fn run(cmd: &dyn Command, session: &mut Session, args: &[&str]) -> Result<String, ShellError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let mut buf = Vec::new();
        cmd.run(session, &args, &mut Output::new(&mut buf, false))?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn ls_children_and_self() {
        let mut s = session();
        assert_eq!(run(&Ls, &mut s, &[]).unwrap(), "A\nB\n");
        assert_eq!(run(&Ls, &mut s, &["A", "/B/B1"]).unwrap(), "A1\nA2\nB1\n");
        assert_eq!(run(&Ls, &mut s, &["-d", "A"]).unwrap(), "A\n");
        assert_eq!(run(&Ls, &mut s, &["-l", "A"]).unwrap(), "2: 3: A1\n2: 4: A2\n");
        assert!(matches!(run(&Ls, &mut s, &["C"]), Err(ShellError::Path(_))));
    }

    #[test]
    fn cd_and_pwd() {
        let mut s = session();
        run(&Cd, &mut s, &["A/A1"]).unwrap();
        assert_eq!(run(&Pwd, &mut s, &[]).unwrap(), "/A/A1\n");
        run(&Cd, &mut s, &["../A2"]).unwrap();
        assert_eq!(s.pwd(), "/A/A2");
        run(&Cd, &mut s, &[]).unwrap();
        assert_eq!(s.current, s.tree.root());
        assert!(matches!(
            run(&Cd, &mut s, &["A", "B"]),
            Err(ShellError::TooManyArguments)
        ));
        // a failed cd stays put
        run(&Cd, &mut s, &["B"]).unwrap();
        assert!(run(&Cd, &mut s, &["nope"]).is_err());
        assert_eq!(s.pwd(), "/B");
        // an empty path goes home, like no path at all
        run(&Cd, &mut s, &[""]).unwrap();
        assert_eq!(s.current, s.tree.root());
    }

    #[test]
    fn tree_depth_bound() {
        let mut s = session();
        assert_eq!(
            run(&TreeCmd, &mut s, &["-t", "-", "-L", "1"]).unwrap(),
            "/\n-A\n-B\n"
        );
        assert_eq!(
            run(&TreeCmd, &mut s, &["-t", ".", "A"]).unwrap(),
            "A\n.A1\n..A23\n.A2\n"
        );
        let max = usize::MAX.to_string();
        assert_eq!(
            run(&TreeCmd, &mut s, &["-t", "-", "-L", &max, "B"]).unwrap(),
            "B\n-B1\n"
        );
    }

    #[test]
    fn find_by_name() {
        let mut s = session();
        assert_eq!(
            run(&Find, &mut s, &["A*"]).unwrap(),
            "/A\n/A/A1\n/A/A2\n/A/A1/A23\n"
        );
        assert_eq!(run(&Find, &mut s, &["-e", "B1"]).unwrap(), "/B/B1\n");
        assert_eq!(run(&Find, &mut s, &["-l", "2", "A", "*"]).unwrap(), "/A/A1\n/A/A2\n");
        assert!(matches!(
            run(&Find, &mut s, &["A/A1"]),
            Err(ShellError::Invalid(_))
        ));
        assert!(matches!(
            run(&Find, &mut s, &["a", "b", "c"]),
            Err(ShellError::TooManyArguments)
        ));
    }

    #[test]
    fn help_is_not_an_error() {
        let mut s = session();
        let usage = run(&Ls, &mut s, &["-h"]).unwrap();
        assert!(usage.contains("Usage: ls"));
        assert!(matches!(run(&Ls, &mut s, &["-x"]), Err(ShellError::Args(_))));
    }

    #[test]
    fn quit() {
        let mut s = session();
        let mut buf = Vec::new();
        let flow = Quit.run(&mut s, &[], &mut Output::new(&mut buf, false)).unwrap();
        assert_eq!(flow, Flow::Quit);
    }
}
