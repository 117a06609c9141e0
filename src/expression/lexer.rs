//! Allow-list check and tokenizer for the restricted expression grammar.

use crate::error::{CompileError, CompileResult};

/// Lexical token kinds.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character of the token.
    pub position: usize,
}

/// Whether `c` belongs to the expression alphabet.
pub(crate) fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || matches!(c, '+' | '-' | '*' | '/' | '^' | '(' | ')' | '.' | ',' | '_')
}

/// Rejects the input at the first character outside the allow-list.
pub(crate) fn check_allowed(input: &str) -> CompileResult<()> {
    match input.char_indices().find(|(_, c)| !is_allowed(*c)) {
        Some((position, character)) => Err(CompileError::IllegalCharacter {
            character,
            position,
        }),
        None => Ok(()),
    }
}

/// Splits an allow-listed input into tokens.
pub(crate) fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (position, c) = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let single = match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '^' => Some(TokenKind::Caret),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = single {
            tokens.push(Token { kind, position });
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let end = scan_number(&chars, i);
            let text = slice(input, &chars, i, end);
            let value = text.parse::<f64>().map_err(|_| CompileError::Syntax {
                message: format!("malformed number '{text}'"),
                position,
            })?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                position,
            });
            i = end;
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let mut end = i + 1;
            while end < chars.len() && (chars[end].1.is_ascii_alphanumeric() || chars[end].1 == '_')
            {
                end += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(slice(input, &chars, i, end).to_string()),
                position,
            });
            i = end;
            continue;
        }

        // Only reachable when the allow-list check was skipped.
        return Err(CompileError::IllegalCharacter {
            character: c,
            position,
        });
    }

    Ok(tokens)
}

/// Returns the index one past the end of the number starting at `start`.
///
/// Accepts `12`, `1.5`, `.5`, `5.` and an optional exponent (`1e3`, `2.5E-4`).
/// An `e` not followed by digits is left for the next token.
fn scan_number(chars: &[(usize, char)], start: usize) -> usize {
    let digit_at = |idx: usize| chars.get(idx).is_some_and(|(_, c)| c.is_ascii_digit());

    let mut end = start;
    while digit_at(end) {
        end += 1;
    }
    if chars.get(end).is_some_and(|(_, c)| *c == '.') {
        end += 1;
        while digit_at(end) {
            end += 1;
        }
    }
    if chars.get(end).is_some_and(|(_, c)| *c == 'e' || *c == 'E') {
        let mut exp = end + 1;
        if chars.get(exp).is_some_and(|(_, c)| *c == '+' || *c == '-') {
            exp += 1;
        }
        if digit_at(exp) {
            end = exp;
            while digit_at(end) {
                end += 1;
            }
        }
    }
    end
}

fn slice<'a>(input: &'a str, chars: &[(usize, char)], start: usize, end: usize) -> &'a str {
    let from = chars[start].0;
    let to = chars.get(end).map_or(input.len(), |(offset, _)| *offset);
    &input[from..to]
}
