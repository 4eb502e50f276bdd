//! Line-oriented search on top of `thompson-regex`.
//!
//! The core crate only answers yes/no questions about an automaton and a
//! piece of text. This crate builds the user-facing pieces on top of that:
//! reading lines from files, reporting the ones that match, and locating the
//! individual matches within a line so they can be highlighted.

pub mod args;
pub mod grep;
pub mod highlight;
pub mod search;

pub use args::{parse_args, Command, Config, Input};
pub use grep::run;
pub use highlight::{highlight, spans, Span};
pub use search::Searcher;
