use std::{
    fs,
    io::{self, BufRead, IsTerminal, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use treenav::{
    shell::{Flow, Shell, ShellError},
    tree::{Tree, DEFAULT_DELIMITER},
};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "treenav",
    about = "Navigate a labeled tree with ls, cd, tree and find, like a file system."
)]
struct Cli {
    /// Tree file: one delimited path per line. Without it a small demo tree is used.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Node delimiter used in the tree file and in paths.
    #[arg(short, long, value_name = "CHAR", default_value_t = DEFAULT_DELIMITER)]
    delimiter: char,
    /// Never colour the output.
    #[arg(long)]
    no_color: bool,
}

fn load(cli: &Cli) -> Result<Tree> {
    let Some(input) = &cli.input else {
        return Ok(Tree::demo());
    };
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read tree file {}", input.display()))?;
    let tree = Tree::from_paths(text.lines(), cli.delimiter);
    info!("loaded {} nodes from {}", tree.len(), input.display());
    Ok(tree)
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let tree = load(&cli)?;

    let interactive = io::stdin().is_terminal();
    let color = !cli.no_color && io::stdout().is_terminal();
    let mut shell = Shell::new(tree, color);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    loop {
        if interactive {
            write!(stdout, "{}", shell.prompt())?;
            stdout.flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("failed to read command")? == 0 {
            break;
        }

        match shell.execute(line.trim_end(), &mut stdout) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(ShellError::UnknownCommand(verb)) => {
                writeln!(stderr, "{verb}: command not found")?;
                shell.help(&mut stderr)?;
            }
            Err(err) => writeln!(stderr, "{err}")?,
        }
        stdout.flush()?;
    }
    Ok(())
}
