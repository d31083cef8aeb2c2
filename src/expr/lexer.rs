//! Tokenizer for the guard/action expression language.

use super::error::ExprError;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Int(i64),
    Float(f64),
    Bool(bool),
    Ident(String),
    LParen,
    RParen,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Assign,
    Semicolon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Ident(name) => f.write_str(name),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Percent => f.write_str("%"),
            Self::EqEq => f.write_str("=="),
            Self::NotEq => f.write_str("!="),
            Self::Lt => f.write_str("<"),
            Self::Le => f.write_str("<="),
            Self::Gt => f.write_str(">"),
            Self::Ge => f.write_str(">="),
            Self::And => f.write_str("and"),
            Self::Or => f.write_str("or"),
            Self::Not => f.write_str("not"),
            Self::Assign => f.write_str("="),
            Self::Semicolon => f.write_str(";"),
        }
    }
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch.is_ascii_digit() || (ch == '.' && next_is_digit(source, offset)) {
            tokens.push(lex_number(&mut chars)?);
            continue;
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            tokens.push(lex_word(&mut chars));
            continue;
        }

        chars.next();
        let token = match ch {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            ';' => Token::Semicolon,
            '=' => pick(&mut chars, '=', Token::EqEq, Token::Assign),
            '!' => pick(&mut chars, '=', Token::NotEq, Token::Not),
            '<' => pick(&mut chars, '=', Token::Le, Token::Lt),
            '>' => pick(&mut chars, '=', Token::Ge, Token::Gt),
            '&' if matches!(chars.peek(), Some((_, '&'))) => {
                chars.next();
                Token::And
            }
            '|' if matches!(chars.peek(), Some((_, '|'))) => {
                chars.next();
                Token::Or
            }
            other => return Err(ExprError::UnexpectedChar { ch: other, offset }),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn next_is_digit(source: &str, offset: usize) -> bool {
    source[offset + 1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

/// Consume `expected` if it is next and return `matched`, otherwise `single`.
fn pick(
    chars: &mut Peekable<CharIndices<'_>>,
    expected: char,
    matched: Token,
    single: Token,
) -> Token {
    if chars.peek().is_some_and(|&(_, c)| c == expected) {
        chars.next();
        matched
    } else {
        single
    }
}

fn lex_number(chars: &mut Peekable<CharIndices<'_>>) -> Result<Token, ExprError> {
    let mut literal = String::new();
    let mut is_float = false;

    while let Some(&(_, c)) = chars.peek() {
        if c.is_ascii_digit() || c == '_' {
            literal.push(c);
        } else if c == '.' && !is_float {
            is_float = true;
            literal.push(c);
        } else {
            break;
        }
        chars.next();
    }

    let cleaned = literal.replace('_', "");
    let parsed = if is_float {
        cleaned.parse::<f64>().map(Token::Float).ok()
    } else {
        cleaned.parse::<i64>().map(Token::Int).ok()
    };
    parsed.ok_or(ExprError::InvalidNumber { literal })
}

fn lex_word(chars: &mut Peekable<CharIndices<'_>>) -> Token {
    let mut word = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            word.push(c);
            chars.next();
        } else {
            break;
        }
    }

    match word.as_str() {
        "true" | "True" => Token::Bool(true),
        "false" | "False" => Token::Bool(false),
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        _ => Token::Ident(word),
    }
}
