/*!
A small regular expression engine built on Thompson's construction.

A pattern is parsed into postfix order, compiled into a nondeterministic
finite automaton and then simulated directly, without determinization or
backtracking. The supported syntax is:

* any character matches itself (`\` escapes a metacharacter),
* `ε` matches the empty string, as does the empty pattern,
* `ab` matches `a` followed by `b`,
* `a|b` matches `a` or `b`,
* `a*` matches zero or more `a`s,
* `(...)` groups.

`*` binds tightest, then concatenation, then `|`.

# Example

```
use thompson_regex::compile;

let nfa = compile("(a|b)*abb").unwrap();
// Whole-string acceptance.
assert!(nfa.accepts("aababb"));
assert!(!nfa.accepts("abab"));
// Does any part of the line match?
assert!(nfa.finds_match_in("xx abb yy"));
```

Invalid patterns are reported with the offending position:

```
use thompson_regex::{compile, SyntaxErrorKind};

let err = compile("(ab").unwrap_err();
assert!(err.is_syntax());
assert_eq!(err.syntax().map(|e| e.kind()), Some(SyntaxErrorKind::UnclosedGroup));
assert_eq!(err.position(), Some(0));
```

# Crate features

* **logging** (enabled by default) - Emits compilation details through the
  [`log`](https://docs.rs/log) crate.
*/

#![deny(missing_debug_implementations)]

#[macro_use]
mod macros;

pub mod compiler;
pub mod matcher;
pub mod nfa;
pub mod parser;
mod sparse_set;
pub mod state;

use std::fmt;

pub use compiler::{Compiler, InternalError};
pub use matcher::Matcher;
pub use nfa::Automaton;
pub use parser::{parse, Postfix, SyntaxError, SyntaxErrorKind, Token};
pub use state::{Label, StateAllocator, StateId, Transition, EPSILON};

// Runs the examples in the README as doctests.
#[cfg(doctest)]
doc_comment::doctest!("../README.md");

/// The result of compiling a pattern.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur during compilation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompileError {
    /// The pattern is malformed.
    Syntax(SyntaxError),
    /// The parser produced something the compiler could not evaluate. This
    /// is a bug in this crate, not a problem with the pattern.
    Internal(InternalError),
}

impl CompileError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, CompileError::Syntax(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, CompileError::Internal(_))
    }

    /// The syntax error, if this is one.
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            CompileError::Syntax(err) => Some(err),
            CompileError::Internal(_) => None,
        }
    }

    /// The character offset in the pattern where a syntax error was found.
    pub fn position(&self) -> Option<usize> {
        self.syntax().map(SyntaxError::position)
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Syntax(err) => write!(f, "syntax error: {}", err),
            CompileError::Internal(err) => write!(f, "internal error: {}", err),
        }
    }
}

// The inner error is already part of the message, so it is not also
// exposed as the source.
impl std::error::Error for CompileError {}

impl From<SyntaxError> for CompileError {
    fn from(err: SyntaxError) -> Self {
        CompileError::Syntax(err)
    }
}

impl From<InternalError> for CompileError {
    fn from(err: InternalError) -> Self {
        CompileError::Internal(err)
    }
}

/// Compile a pattern into an automaton.
///
/// Each call uses its own [`Compiler`], so state identifiers start at zero
/// for every compiled pattern.
pub fn compile(pattern: &str) -> CompileResult<Automaton> {
    let postfix = parse(pattern)?;
    debug!("compiling {:?}, postfix form: {}", pattern, postfix);
    let nfa = Compiler::new().build(&postfix)?;
    debug!(
        "compiled {:?}: {} states, {} transitions",
        pattern,
        nfa.states().len(),
        nfa.transitions().len(),
    );
    Ok(nfa)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_reports_syntax_errors() {
        for pattern in ["(a", "a|", "*a", "a)", r"\"] {
            let err = compile(pattern).unwrap_err();
            assert!(err.is_syntax(), "{}: {:?}", pattern, err);
            assert!(!err.is_internal());
            assert!(err.position().is_some());
        }
    }

    #[test]
    fn internal_errors_are_distinct() {
        let err = CompileError::from(InternalError::EmptyPostfix);
        assert!(err.is_internal());
        assert_eq!(err.position(), None);
        assert_eq!(err.to_string(), "internal error: empty postfix sequence");
    }

    #[test]
    fn error_chain_does_not_repeat_the_message() {
        use std::error::Error;

        let err = compile("a||b").unwrap_err();
        assert!(err.source().is_none());
        assert_eq!(
            err.syntax().unwrap().to_string(),
            "operator or group is missing an operand at position 2"
        );
        let chained = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(
            chained,
            "syntax error: operator or group is missing an operand at position 2"
        );
    }


    #[test]
    fn fresh_identifiers_per_compile() {
        let a = compile("a").unwrap();
        let b = compile("a").unwrap();
        assert_eq!(a.states(), b.states());
        assert_eq!(a.describe(), b.describe());
    }
}
