use std::io::{ErrorKind, Write};
use std::process::{Command, Output, Stdio};

const TEXT: &str = "nothing here\nxx aababb yy\nabb\n";

fn thompson_grep(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_thompson-grep"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    // The process may exit without reading its input.
    if let Err(err) = child.stdin.take().unwrap().write_all(stdin.as_bytes()) {
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    }
    child.wait_with_output().unwrap()
}

fn text(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).unwrap()
}

#[test]
fn exit_zero_on_match() {
    let out = thompson_grep(&["(a|b)*abb"], TEXT);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(text(&out.stdout), "2:xx aababb yy\n3:abb\n");
    assert_eq!(text(&out.stderr), "");
}

#[test]
fn exit_one_without_match() {
    let out = thompson_grep(&["zzz", "-"], TEXT);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(text(&out.stdout), "");
    assert_eq!(text(&out.stderr), "No matches found.\n");
}

#[test]
fn exit_two_on_invalid_pattern() {
    let out = thompson_grep(&["(a"], TEXT);
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(
        text(&out.stderr),
        "thompson-grep: invalid pattern \"(a\": syntax error: unclosed group at position 0\n"
    );
}

#[test]
fn exit_two_on_unknown_option() {
    let out = thompson_grep(&["--frobnicate", "a"], TEXT);
    assert_eq!(out.status.code(), Some(2));
    assert!(text(&out.stderr).starts_with("thompson-grep: unrecognized option"));
}

#[test]
fn count_and_postfix() {
    let out = thompson_grep(&["--postfix", "--count", "a|bc"], "a\nbc\nb\n");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(text(&out.stdout), "postfix: abc&|\n2\n");
}

#[test]
fn help_exits_zero() {
    let out = thompson_grep(&["--help"], "");
    assert_eq!(out.status.code(), Some(0));
    assert!(text(&out.stdout).starts_with("Usage: thompson-grep"));
}
