use std::fmt;

use thompson_regex::{Automaton, Matcher};

/// Alternating background colours, yellow then cyan, so that adjacent
/// matches stay distinguishable.
const COLORS: [&str; 2] = ["\x1b[43m", "\x1b[46m"];
const RESET: &str = "\x1b[0m";

/// The location of one match in a line, as byte offsets.
///
/// Both offsets always fall on character boundaries, so `&line[start..end]`
/// is the matched text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Find the matches of `nfa` in `line`.
///
/// Matches are found left to right. At each position the longest non-empty
/// match starting there is taken and scanning resumes where it ended, so
/// the spans never overlap. Empty matches are not reported.
///
/// The automaton only answers whole-string questions, so every candidate
/// substring is tested separately. That makes this cubic in the length of
/// the line; lines without any match are rejected up front with a single
/// linear search.
pub fn spans(nfa: &Automaton, line: &str) -> Vec<Span> {
    let mut matcher = Matcher::new(nfa);
    let mut found = vec![];
    if !matcher.finds_match_in(line) {
        return found;
    }
    // Byte offset of every character boundary, including the end.
    let bounds: Vec<usize> = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()))
        .collect();
    let n = bounds.len() - 1;
    let mut i = 0;
    while i < n {
        let end = (i + 1..=n)
            .rev()
            .find(|&j| matcher.accepts(&line[bounds[i]..bounds[j]]));
        match end {
            Some(j) => {
                found.push(Span { start: bounds[i], end: bounds[j] });
                i = j;
            }
            None => i += 1,
        }
    }
    log::trace!("{} match(es) in {:?}", found.len(), line);
    found
}

/// Render `line` with every span wrapped in an ANSI background colour,
/// alternating between two colours from one span to the next.
pub fn highlight(line: &str, spans: &[Span]) -> String {
    let mut out = String::with_capacity(line.len() + spans.len() * 9);
    let mut last = 0;
    for (k, span) in spans.iter().enumerate() {
        out.push_str(&line[last..span.start]);
        out.push_str(COLORS[k % COLORS.len()]);
        out.push_str(&line[span.start..span.end]);
        out.push_str(RESET);
        last = span.end;
    }
    out.push_str(&line[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use thompson_regex::compile;

    fn texts(pattern: &str, line: &str) -> Vec<String> {
        let nfa = compile(pattern).unwrap();
        spans(&nfa, line)
            .into_iter()
            .map(|s| line[s.start..s.end].to_string())
            .collect()
    }

    #[test]
    fn longest_match_wins() {
        assert_eq!(texts("ab*", "xabbbyab"), vec!["abbb", "ab"]);
        assert_eq!(texts("a|ab", "ab"), vec!["ab"]);
    }

    #[test]
    fn matches_do_not_overlap() {
        assert_eq!(texts("aa", "aaaaa"), vec!["aa", "aa"]);
        assert_eq!(texts("aba", "ababa"), vec!["aba"]);
    }

    #[test]
    fn empty_matches_are_skipped() {
        assert!(texts("b*", "aaa").is_empty());
        assert_eq!(texts("b*", "abba"), vec!["bb"]);
        assert!(texts("", "abc").is_empty());
    }

    #[test]
    fn byte_offsets_respect_char_boundaries() {
        let nfa = compile("üü*").unwrap();
        let line = "aüüb";
        assert_eq!(spans(&nfa, line), vec![Span { start: 1, end: 5 }]);
    }

    #[test]
    fn no_match() {
        assert!(texts("abb", "xxabyy").is_empty());
    }

    #[test]
    fn highlight_alternates_colours() {
        let line = "ab-ab";
        let spans = vec![Span { start: 0, end: 2 }, Span { start: 3, end: 5 }];
        assert_eq!(
            highlight(line, &spans),
            "\x1b[43mab\x1b[0m-\x1b[46mab\x1b[0m"
        );
        assert_eq!(highlight(line, &[]), line);
    }
}
