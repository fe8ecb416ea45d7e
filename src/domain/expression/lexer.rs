//! Tokenizer for arithmetic expressions.
//!
//! The lexer never fails. Characters that belong to constructs outside the
//! arithmetic grammar become [`Token::Forbidden`]; anything else it cannot
//! place becomes [`Token::Unknown`]. The parser decides how to report them.

use super::Number;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(Number),
    Ident(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
    /// Attribute access, assignment, indexing, strings, comparisons.
    Forbidden(char),
    Unknown(char),
}

/// A token and the character offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

const FORBIDDEN: &str = "=.[]{};:'\"<>!&|~@`$\\";

pub(crate) fn tokenize(input: &str) -> Vec<Spanned> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let offset = i;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let starts_number =
            c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit));
        if starts_number {
            let (number, next) = read_number(&chars, i);
            tokens.push(Spanned {
                token: Token::Number(number),
                offset,
            });
            i = next;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Spanned {
                token: Token::Ident(chars[start..i].iter().collect()),
                offset,
            });
            continue;
        }

        let next = chars.get(i + 1).copied();
        let (token, width) = match c {
            '+' => (Token::Plus, 1),
            '-' => (Token::Minus, 1),
            '*' if next == Some('*') => (Token::DoubleStar, 2),
            '*' => (Token::Star, 1),
            '/' if next == Some('/') => (Token::DoubleSlash, 2),
            '/' => (Token::Slash, 1),
            '%' => (Token::Percent, 1),
            '^' => (Token::Caret, 1),
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            ',' => (Token::Comma, 1),
            c if FORBIDDEN.contains(c) => (Token::Forbidden(c), 1),
            c => (Token::Unknown(c), 1),
        };
        tokens.push(Spanned { token, offset });
        i += width;
    }

    tokens
}

/// Reads `digits [. digits] [e [+-] digits]` starting at `start`.
fn read_number(chars: &[char], start: usize) -> (Number, usize) {
    let mut i = start;
    let mut is_float = false;

    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        is_float = true;
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            is_float = true;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    let text: String = chars[start..i].iter().collect();
    let number = if is_float {
        Number::Float(text.parse().unwrap_or(f64::NAN))
    } else {
        match text.parse::<i64>() {
            Ok(value) => Number::Integer(value),
            Err(_) => Number::Float(text.parse().unwrap_or(f64::NAN)),
        }
    };
    (number, i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input).into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn tokenizes_arithmetic() {
        assert_eq!(
            kinds("2 + 3*4"),
            vec![
                Token::Number(Number::Integer(2)),
                Token::Plus,
                Token::Number(Number::Integer(3)),
                Token::Star,
                Token::Number(Number::Integer(4)),
            ]
        );
    }

    #[test]
    fn recognizes_two_character_operators() {
        assert_eq!(
            kinds("2**3//4"),
            vec![
                Token::Number(Number::Integer(2)),
                Token::DoubleStar,
                Token::Number(Number::Integer(3)),
                Token::DoubleSlash,
                Token::Number(Number::Integer(4)),
            ]
        );
    }

    #[test]
    fn reads_floats_and_exponents() {
        assert_eq!(kinds("1.5"), vec![Token::Number(Number::Float(1.5))]);
        assert_eq!(kinds(".5"), vec![Token::Number(Number::Float(0.5))]);
        assert_eq!(kinds("2e3"), vec![Token::Number(Number::Float(2000.0))]);
        assert_eq!(kinds("2E-1"), vec![Token::Number(Number::Float(0.2))]);
    }

    #[test]
    fn bare_e_after_number_is_an_identifier() {
        assert_eq!(
            kinds("2e"),
            vec![
                Token::Number(Number::Integer(2)),
                Token::Ident("e".to_string()),
            ]
        );
    }

    #[test]
    fn huge_integer_literal_becomes_float() {
        assert!(matches!(
            kinds("99999999999999999999")[0],
            Token::Number(Number::Float(_))
        ));
    }

    #[test]
    fn identifiers_and_calls() {
        assert_eq!(
            kinds("sqrt(x)"),
            vec![
                Token::Ident("sqrt".to_string()),
                Token::LParen,
                Token::Ident("x".to_string()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn marks_forbidden_and_unknown_characters() {
        assert_eq!(
            kinds("a.b"),
            vec![
                Token::Ident("a".to_string()),
                Token::Forbidden('.'),
                Token::Ident("b".to_string()),
            ]
        );
        assert_eq!(kinds("#"), vec![Token::Unknown('#')]);
    }

    #[test]
    fn records_offsets() {
        let tokens = tokenize("1 + 22");
        assert_eq!(tokens[2].offset, 4);
    }
}
