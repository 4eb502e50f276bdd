use std::io::{self, BufRead};

use thompson_regex::{Automaton, Matcher};

/// Reports the lines of an input that contain a match.
///
/// One searcher reuses its matcher's scratch space across every line and
/// every input it is given.
#[derive(Debug)]
pub struct Searcher<'a> {
    matcher: Matcher<'a>,
}

impl<'a> Searcher<'a> {
    pub fn new(nfa: &'a Automaton) -> Self {
        Searcher { matcher: Matcher::new(nfa) }
    }

    /// Call `sink` with the 1-based number and the contents of every
    /// matching line read from `reader`, and return how many lines matched.
    ///
    /// Line terminators (`\n` or `\r\n`) are not part of the line. Stops at
    /// the first error from either the reader or the sink.
    pub fn search<R, F>(&mut self, reader: R, mut sink: F) -> io::Result<u64>
    where
        R: BufRead,
        F: FnMut(u64, &str) -> io::Result<()>,
    {
        let mut matched = 0;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if self.matcher.finds_match_in(&line) {
                matched += 1;
                sink(i as u64 + 1, &line)?;
            }
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thompson_regex::compile;

    #[test]
    fn reports_matching_lines() {
        let nfa = compile("(a|b)*abb").unwrap();
        let text = "nothing here\nxx aababb yy\r\nab ab\nabb\n";
        let mut hits = vec![];
        let n = Searcher::new(&nfa)
            .search(text.as_bytes(), |no, line| {
                hits.push((no, line.to_string()));
                Ok(())
            })
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            hits,
            vec![(2, "xx aababb yy".to_string()), (4, "abb".to_string())]
        );
    }

    #[test]
    fn epsilon_matches_every_line() {
        let nfa = compile("").unwrap();
        let n = Searcher::new(&nfa)
            .search("a\n\nb\n".as_bytes(), |_, _| Ok(()))
            .unwrap();
        assert_eq!(n, 3);
    }

    #[test]
    fn sink_errors_stop_the_search() {
        let nfa = compile("a").unwrap();
        let mut calls = 0;
        let err = Searcher::new(&nfa)
            .search("a\na\n".as_bytes(), |_, _| {
                calls += 1;
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            })
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(calls, 1);
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let nfa = compile("a").unwrap();
        let input: &[u8] = b"a\n\xff\n";
        let err = Searcher::new(&nfa).search(input, |_, _| Ok(())).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
