use std::fs;

use similar_asserts::assert_eq;
use treenav::{
    shell::{Flow, Shell, ShellError},
    Tree,
};

fn shell() -> Shell {
    Shell::new(Tree::from_paths(["/A/A1/A23", "/A/A2", "/B/B1"], '/'), false)
}

fn exec(shell: &mut Shell, line: &str) -> Result<String, ShellError> {
    let mut out = Vec::new();
    shell.execute(line, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn session_walkthrough() {
    let mut sh = shell();
    assert_eq!(sh.prompt(), "/> ");
    assert_eq!(exec(&mut sh, "ls").unwrap(), "A\nB\n");
    exec(&mut sh, "cd A/A1").unwrap();
    assert_eq!(sh.prompt(), "/A/A1> ");
    assert_eq!(exec(&mut sh, "ls ../A*").unwrap(), "A23\nA2\n");
    exec(&mut sh, "cd ..").unwrap();
    assert_eq!(exec(&mut sh, "pwd").unwrap(), "/A\n");
    assert_eq!(exec(&mut sh, "   ").unwrap(), "");
    assert_eq!(sh.execute("q", &mut Vec::new()).unwrap(), Flow::Quit);
}

#[test]
fn globs_expand_to_absolute_paths() {
    let mut sh = shell();
    exec(&mut sh, "cd B").unwrap();
    assert_eq!(exec(&mut sh, "ls -d ../*/*").unwrap(), "A1\nA2\nB1\n");
    // quoted words are never expanded
    assert!(matches!(
        exec(&mut sh, "ls \"../*\""),
        Err(ShellError::Path(_))
    ));
    // find matches names itself
    assert_eq!(exec(&mut sh, "find / B*").unwrap(), "/B\n/B/B1\n");
}

#[test]
fn errors_leave_the_session_alone() {
    let mut sh = shell();
    exec(&mut sh, "cd A").unwrap();
    assert!(matches!(exec(&mut sh, "cd nope"), Err(ShellError::Path(_))));
    assert!(matches!(
        exec(&mut sh, "frobnicate"),
        Err(ShellError::UnknownCommand(verb)) if verb == "frobnicate"
    ));
    assert!(matches!(exec(&mut sh, "ls A["), Err(ShellError::Path(_))));
    assert!(matches!(exec(&mut sh, "ls \"open"), Err(ShellError::Path(_))));
    assert!(matches!(exec(&mut sh, "ls >  "), Err(ShellError::MissingRedirect)));
    assert_eq!(sh.session.pwd(), "/A");
}

#[test]
fn quoted_words_keep_their_arrows_and_emptiness() {
    let mut sh = shell();
    assert_eq!(exec(&mut sh, "find \"a>b\"").unwrap(), "");
    exec(&mut sh, "cd A/A1").unwrap();
    exec(&mut sh, "cd \"\"").unwrap();
    assert_eq!(sh.session.pwd(), "/");
}

#[test]
fn help_lists_every_verb() {
    let mut sh = shell();
    let help = exec(&mut sh, "help").unwrap();
    for verb in sh.registry.verbs() {
        assert!(help.contains(verb), "{verb} missing from {help}");
    }
}

#[test]
fn redirect_writes_uncoloured_output() {
    let dir = std::env::temp_dir().join(format!("treenav-redirect-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let file = dir.join("tree.txt");

    let mut sh = Shell::new(Tree::from_paths(["/A/A1/A23", "/A/A2", "/B/B1"], '/'), true);
    let printed = {
        let mut out = Vec::new();
        sh.execute(&format!("tree -t - A > {}", file.display()), &mut out)
            .unwrap();
        out
    };
    assert!(printed.is_empty());
    assert_eq!(fs::read_to_string(&file).unwrap(), "A\n-A1\n--A23\n-A2\n");

    fs::remove_dir_all(&dir).unwrap();
}
