//! Translation of user queries into FTS5 match expressions.
//!
//! Users write `python AND remote`, `rust NOT onsite`, `(go OR rust) remote`,
//! `"machine learning"`, `by:alice` or `pyth*`. Every term is emitted as a
//! quoted FTS5 string so punctuation (`front-end`, `c++`) is never read as
//! query syntax. Adjacent operands are joined with an explicit `OR`.
//!
//! FTS5 `NOT` is binary, so `a AND NOT b` is emitted as `a NOT b`. A `NOT`
//! with nothing on its left (`NOT remote`, `(NOT x)`, `a OR NOT b`) has no
//! FTS5 form and is rejected with [`StoreError::InvalidQuery`]. Other
//! structural errors (unbalanced parentheses, dangling operators) are
//! emitted as-is and reported by SQLite.

use crate::error::StoreError;

/// Column searched by terms without a field prefix.
const DEFAULT_COLUMN: &str = "text";

/// Columns a `field:value` term may target.
const FIELD_COLUMNS: &[&str] = &["by", "id", "text"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    And,
    Or,
    Not,
    Term {
        column: &'static str,
        text: String,
        prefix: bool,
    },
}

impl Token {
    fn ends_operand(&self) -> bool {
        matches!(self, Token::Close | Token::Term { .. })
    }

    fn starts_operand(&self) -> bool {
        matches!(self, Token::Open | Token::Term { .. })
    }

    fn render(&self) -> String {
        match self {
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
            Token::And => "AND".to_string(),
            Token::Or => "OR".to_string(),
            Token::Not => "NOT".to_string(),
            Token::Term {
                column,
                text,
                prefix,
            } => {
                let star = if *prefix { " *" } else { "" };
                format!("{} : {}{}", column, quote(text), star)
            }
        }
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Split `word` into a target column and value if it names a known field.
fn split_field(word: &str) -> Option<(&'static str, &str)> {
    let (field, value) = word.split_once(':')?;
    let column = FIELD_COLUMNS
        .iter()
        .find(|c| c.eq_ignore_ascii_case(field))
        .copied()?;
    Some((column, value))
}

fn bare_term(column: &'static str, word: &str) -> Token {
    match word.strip_suffix('*') {
        Some(stem) if !stem.is_empty() => Token::Term {
            column,
            text: stem.to_string(),
            prefix: true,
        },
        _ => Token::Term {
            column,
            text: word.to_string(),
            prefix: false,
        },
    }
}

/// Read a quoted phrase starting after its opening quote. An unterminated
/// phrase runs to the end of input.
fn read_phrase(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut phrase = String::new();
    for c in chars.by_ref() {
        if c == '"' {
            break;
        }
        phrase.push(c);
    }
    phrase
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '"' => {
                chars.next();
                tokens.push(Token::Term {
                    column: DEFAULT_COLUMN,
                    text: read_phrase(&mut chars),
                    prefix: false,
                });
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }

                let token = match word.as_str() {
                    "AND" => Token::And,
                    "OR" => Token::Or,
                    "NOT" => Token::Not,
                    _ => match split_field(&word) {
                        // by:"Jane Doe"
                        Some((column, "")) if chars.peek() == Some(&'"') => {
                            chars.next();
                            Token::Term {
                                column,
                                text: read_phrase(&mut chars),
                                prefix: false,
                            }
                        }
                        Some((column, value)) if !value.is_empty() => bare_term(column, value),
                        _ => bare_term(DEFAULT_COLUMN, &word),
                    },
                };
                tokens.push(token);
            }
        }
    }

    tokens
}

/// Translate a user query into an FTS5 `MATCH` expression.
///
/// Returns an empty string for blank input.
pub fn to_fts_query(input: &str) -> Result<String, StoreError> {
    let mut emitted: Vec<Token> = Vec::new();

    for token in tokenize(input) {
        if token == Token::Not {
            if emitted.last() == Some(&Token::And) {
                emitted.pop();
            }
            if !emitted.last().is_some_and(Token::ends_operand) {
                return Err(StoreError::InvalidQuery(format!(
                    "NOT needs a term on its left, as in `python NOT remote`: {}",
                    input.trim()
                )));
            }
        } else if token.starts_operand() && emitted.last().is_some_and(Token::ends_operand) {
            emitted.push(Token::Or);
        }
        emitted.push(token);
    }

    Ok(emitted
        .iter()
        .map(Token::render)
        .collect::<Vec<_>>()
        .join(" "))
}
