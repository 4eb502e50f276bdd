use std::fmt;
use std::path::PathBuf;

use anyhow::bail;

pub const USAGE: &str = "\
Usage: thompson-grep [OPTIONS] PATTERN [FILE...]

Print every line that contains a match for PATTERN. With no FILE, or when
FILE is -, read standard input.

Pattern syntax: literal characters, `ab` (concatenation), `a|b` (union),
`a*` (zero or more), `(...)` (grouping), `ε` (the empty string). A `\\`
makes the next character literal.

Options:
  -c, --count       Print only the number of matching lines
      --highlight   Mark every match within the printed lines
      --postfix     Print the pattern in postfix form before searching
      --dump        Print the compiled automaton before searching
      --time        Report how long the search took on stderr
  -h, --help        Print this help
  -V, --version     Print the version

Exit status is 0 if a line matched, 1 if none did and 2 on error.
";

/// Where to read lines from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Path(PathBuf),
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Stdin => write!(f, "(standard input)"),
            Input::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Options for a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub pattern: String,
    pub inputs: Vec<Input>,
    pub count: bool,
    pub highlight: bool,
    pub postfix: bool,
    pub dump: bool,
    pub time: bool,
}

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Search(Config),
    Help,
    Version,
}

/// Parse command line arguments, not including the program name.
///
/// Everything after `--` is positional, which is how a pattern starting
/// with `-` is passed.
pub fn parse_args<I>(args: I) -> anyhow::Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut positional = vec![];
    let (mut count, mut highlight, mut postfix, mut dump, mut time) =
        (false, false, false, false, false);
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-c" | "--count" => count = true,
            "--highlight" => highlight = true,
            "--postfix" => postfix = true,
            "--dump" => dump = true,
            "--time" => time = true,
            "--" => {
                positional.extend(args.by_ref());
                break;
            }
            "-" => positional.push(arg),
            flag if flag.starts_with('-') => {
                bail!("unrecognized option '{}'\n\n{}", flag, USAGE)
            }
            _ => positional.push(arg),
        }
    }
    let mut positional = positional.into_iter();
    let pattern = match positional.next() {
        Some(pattern) => pattern,
        None => bail!("missing PATTERN\n\n{}", USAGE),
    };
    let mut inputs: Vec<Input> = positional
        .map(|p| if p == "-" { Input::Stdin } else { Input::Path(p.into()) })
        .collect();
    if inputs.is_empty() {
        inputs.push(Input::Stdin);
    }
    Ok(Command::Search(Config {
        pattern,
        inputs,
        count,
        highlight,
        postfix,
        dump,
        time,
    }))
}
