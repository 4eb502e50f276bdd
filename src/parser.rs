/*!
Conversion of infix patterns to postfix token order.

The grammar is deliberately small: literal characters, the epsilon literal
`ε`, union `|`, implicit concatenation, Kleene star `*` and grouping with
parentheses. A backslash turns the following character into a literal, so
`\*` matches a star.

Precedence, from loosest to tightest binding, is union, concatenation, star.
Both binary operators are left associative. The output is a [`Postfix`]
sequence that can be evaluated by a plain stack machine without any further
precedence reasoning.
*/

use std::fmt;

use crate::state::EPSILON;

/// A token in postfix order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// Matches exactly one character.
    Literal(char),
    /// Matches the empty string.
    Epsilon,
    /// Alternation of the two preceding operands.
    Union,
    /// Concatenation of the two preceding operands.
    Concat,
    /// Zero or more repetitions of the preceding operand.
    Star,
}

impl Token {
    /// The number of operands this token pops when evaluated.
    pub fn arity(self) -> usize {
        match self {
            Token::Literal(_) | Token::Epsilon => 0,
            Token::Star => 1,
            Token::Union | Token::Concat => 2,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Token::Literal(c) if is_meta(c) || c == '&' => write!(f, "\\{}", c),
            Token::Literal(c) => write!(f, "{}", c),
            Token::Epsilon => write!(f, "{}", EPSILON),
            Token::Union => write!(f, "|"),
            Token::Concat => write!(f, "&"),
            Token::Star => write!(f, "*"),
        }
    }
}

/// A pattern in postfix (reverse Polish) order.
///
/// A `Postfix` produced by [`parse`] is always well formed: evaluating it
/// with a stack leaves exactly one operand behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Postfix {
    tokens: Vec<Token>,
}

impl Postfix {
    /// Wrap a raw token sequence.
    ///
    /// No validation is performed. Building an automaton from a malformed
    /// sequence fails with an internal error.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Postfix { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

/// The reason a pattern failed to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A `(` without a matching `)`.
    UnclosedGroup,
    /// A `)` without a matching `(`.
    UnopenedGroup,
    /// An operator, or a group, with nothing to operate on.
    MissingOperand,
    /// A `\` at the very end of the pattern.
    DanglingEscape,
}

/// An error that occurred while parsing a pattern.
///
/// The position is a 0-based offset in characters (not bytes). For errors
/// only detectable at the end of input it equals the pattern's length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    kind: SyntaxErrorKind,
    position: usize,
}

impl SyntaxError {
    fn new(kind: SyntaxErrorKind, position: usize) -> Self {
        SyntaxError { kind, position }
    }

    pub fn kind(&self) -> SyntaxErrorKind {
        self.kind
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            SyntaxErrorKind::UnclosedGroup => "unclosed group",
            SyntaxErrorKind::UnopenedGroup => "unopened group",
            SyntaxErrorKind::MissingOperand => "operator or group is missing an operand",
            SyntaxErrorKind::DanglingEscape => "dangling escape at end of pattern",
        };
        write!(f, "{} at position {}", msg, self.position)
    }
}

impl std::error::Error for SyntaxError {}

/// Returns true for characters that must be escaped to be used literally.
fn is_meta(ch: char) -> bool {
    matches!(ch, '|' | '*' | '(' | ')' | '\\' | EPSILON)
}

/// A lexical item of the infix pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lexeme {
    Literal(char),
    Epsilon,
    Union,
    Concat,
    Star,
    Open,
    Close,
}

impl Lexeme {
    /// Can this lexeme be the last thing of an operand?
    fn ends_operand(self) -> bool {
        matches!(
            self,
            Lexeme::Literal(_) | Lexeme::Epsilon | Lexeme::Close | Lexeme::Star
        )
    }

    /// Can this lexeme be the first thing of an operand?
    fn starts_operand(self) -> bool {
        matches!(self, Lexeme::Literal(_) | Lexeme::Epsilon | Lexeme::Open)
    }

    fn precedence(self) -> u8 {
        match self {
            Lexeme::Union => 1,
            Lexeme::Concat => 2,
            _ => 0,
        }
    }
}

/// Split a pattern into lexemes, inserting explicit concatenation between
/// adjacent operands.
///
/// Inserted concatenations carry the position of the operand that follows
/// them.
fn lex(pattern: &str) -> Result<Vec<(Lexeme, usize)>, SyntaxError> {
    let mut out: Vec<(Lexeme, usize)> = Vec::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().enumerate();
    while let Some((pos, ch)) = chars.next() {
        let lexeme = match ch {
            '|' => Lexeme::Union,
            '*' => Lexeme::Star,
            '(' => Lexeme::Open,
            ')' => Lexeme::Close,
            EPSILON => Lexeme::Epsilon,
            '\\' => match chars.next() {
                Some((_, escaped)) => Lexeme::Literal(escaped),
                None => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::DanglingEscape,
                        pos,
                    ))
                }
            },
            c => Lexeme::Literal(c),
        };
        if let Some(&(prev, _)) = out.last() {
            if prev.ends_operand() && lexeme.starts_operand() {
                out.push((Lexeme::Concat, pos));
            }
        }
        out.push((lexeme, pos));
    }
    Ok(out)
}

/// Convert an infix pattern to postfix order.
///
/// The empty pattern is treated as the epsilon literal.
pub fn parse(pattern: &str) -> Result<Postfix, SyntaxError> {
    let lexemes = lex(pattern)?;
    if lexemes.is_empty() {
        return Ok(Postfix::from_tokens(vec![Token::Epsilon]));
    }

    let mut output: Vec<Token> = Vec::with_capacity(lexemes.len());
    let mut operators: Vec<(Lexeme, usize)> = Vec::new();
    // True whenever the next lexeme must begin an operand.
    let mut expect_operand = true;

    for (lexeme, pos) in lexemes {
        match lexeme {
            Lexeme::Literal(c) => {
                output.push(Token::Literal(c));
                expect_operand = false;
            }
            Lexeme::Epsilon => {
                output.push(Token::Epsilon);
                expect_operand = false;
            }
            Lexeme::Open => {
                operators.push((lexeme, pos));
                expect_operand = true;
            }
            Lexeme::Close => {
                if expect_operand {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::MissingOperand,
                        pos,
                    ));
                }
                loop {
                    match operators.pop() {
                        Some((Lexeme::Open, _)) => break,
                        Some((op, _)) => output.push(binary_token(op)),
                        None => {
                            return Err(SyntaxError::new(
                                SyntaxErrorKind::UnopenedGroup,
                                pos,
                            ))
                        }
                    }
                }
            }
            Lexeme::Star => {
                if expect_operand {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::MissingOperand,
                        pos,
                    ));
                }
                // Star binds tightest and is postfix already, so it applies
                // to whatever operand was just completed.
                output.push(Token::Star);
            }
            Lexeme::Union | Lexeme::Concat => {
                if expect_operand {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::MissingOperand,
                        pos,
                    ));
                }
                while let Some(&(top, _)) = operators.last() {
                    if top == Lexeme::Open
                        || top.precedence() < lexeme.precedence()
                    {
                        break;
                    }
                    operators.pop();
                    output.push(binary_token(top));
                }
                operators.push((lexeme, pos));
                expect_operand = true;
            }
        }
    }

    let end = pattern.chars().count();
    if let Some(&(_, pos)) =
        operators.iter().rev().find(|&&(op, _)| op == Lexeme::Open)
    {
        return Err(SyntaxError::new(SyntaxErrorKind::UnclosedGroup, pos));
    }
    if expect_operand {
        return Err(SyntaxError::new(SyntaxErrorKind::MissingOperand, end));
    }
    while let Some((op, _)) = operators.pop() {
        output.push(binary_token(op));
    }
    Ok(Postfix::from_tokens(output))
}

/// Map an operator lexeme left on the operator stack to its token.
///
/// Only binary operators and open parentheses are ever pushed on the
/// operator stack, and parentheses are consumed before this is called.
fn binary_token(lexeme: Lexeme) -> Token {
    match lexeme {
        Lexeme::Union => Token::Union,
        Lexeme::Concat => Token::Concat,
        other => unreachable!("{:?} on the operator stack", other),
    }
}
