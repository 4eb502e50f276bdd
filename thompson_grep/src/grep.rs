use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Instant;

use anyhow::Context;
use thompson_regex::{compile, parse};

use crate::args::{Config, Input};
use crate::highlight::{highlight, spans};
use crate::search::Searcher;

/// Run the search described by `config`.
///
/// Matching lines, and anything `--postfix`, `--dump` or `--count` ask for,
/// go to `out`. The summary goes to `err` so it never mixes with matched
/// lines. Returns whether any line matched.
pub fn run<W, E>(config: &Config, mut out: W, mut err: E) -> anyhow::Result<bool>
where
    W: Write,
    E: Write,
{
    let nfa = compile(&config.pattern)
        .with_context(|| format!("invalid pattern {:?}", config.pattern))?;
    if config.postfix {
        // The pattern already compiled, so it parses.
        let postfix = parse(&config.pattern)?;
        writeln!(out, "postfix: {}", postfix)?;
    }
    if config.dump {
        write!(out, "{}", nfa.describe())?;
    }

    let start = Instant::now();
    let mut searcher = Searcher::new(&nfa);
    let mut total = 0;
    let mut total_spans = 0;
    let with_names = config.inputs.len() > 1;
    for input in &config.inputs {
        log::debug!("searching {}", input);
        let reader = open(input)?;
        let prefix = if with_names { format!("{}:", input) } else { String::new() };
        let matched = searcher
            .search(reader, |number, line| {
                if config.count {
                    return Ok(());
                }
                if config.highlight {
                    let found = spans(&nfa, line);
                    total_spans += found.len();
                    writeln!(out, "{}{}:{}", prefix, number, highlight(line, &found))
                } else {
                    writeln!(out, "{}{}:{}", prefix, number, line)
                }
            })
            .with_context(|| format!("failed to search {}", input))?;
        if config.count {
            writeln!(out, "{}{}", prefix, matched)?;
        }
        total += matched;
    }
    out.flush()?;

    if total == 0 {
        writeln!(err, "No matches found.")?;
    } else if config.highlight {
        let plural = if total_spans == 1 { "match" } else { "matches" };
        writeln!(err, "{} {} found", total_spans, plural)?;
    }
    if config.time {
        writeln!(err, "search took {:?}", start.elapsed())?;
    }
    Ok(total > 0)
}

fn open(input: &Input) -> anyhow::Result<Box<dyn BufRead>> {
    Ok(match input {
        Input::Stdin => Box::new(BufReader::new(io::stdin())),
        Input::Path(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
    })
}
