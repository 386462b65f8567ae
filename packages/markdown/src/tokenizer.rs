//! # Inline Tokenizer
//!
//! Logos-based tokenizer for inline markup. Block structure is line-oriented
//! and handled by the parser; this tokenizer only sees the text inside a
//! single block.

use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    #[token("**")]
    StrongStar,

    #[token("__")]
    StrongUnder,

    #[token("*")]
    EmStar,

    #[token("_")]
    EmUnder,

    #[token("`")]
    Backtick,

    #[token("![")]
    ImageOpen,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    /// Backslash escape of a markup character, e.g. `\*`.
    #[regex(r"\\[*_`\[\]()!\\]")]
    Escaped,

    /// Run of characters with no inline significance.
    #[regex(r"[^*_`\[\]()\\!]+")]
    Text,
}

/// Tokenize inline source. Characters the grammar does not recognize (a lone
/// `!` or trailing `\`) come back as `Text` so no input is ever lost.
pub fn tokenize(source: &str) -> Vec<(Token, Range<usize>)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => tokens.push((Token::Text, lexer.span())),
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_plain_text_is_one_token() {
        assert_eq!(kinds("hello world"), vec![Token::Text]);
    }

    #[test]
    fn test_strong_markers_win_over_emphasis() {
        assert_eq!(
            kinds("**a**"),
            vec![Token::StrongStar, Token::Text, Token::StrongStar]
        );
        assert_eq!(
            kinds("*a*"),
            vec![Token::EmStar, Token::Text, Token::EmStar]
        );
    }

    #[test]
    fn test_image_open_wins_over_bracket() {
        assert_eq!(
            kinds("![alt](url)"),
            vec![
                Token::ImageOpen,
                Token::Text,
                Token::BracketClose,
                Token::ParenOpen,
                Token::Text,
                Token::ParenClose,
            ]
        );
    }

    #[test]
    fn test_escapes_and_strays_are_preserved() {
        assert_eq!(kinds(r"\*x"), vec![Token::Escaped, Token::Text]);
        // A bang not followed by `[` has no token of its own; it falls out as
        // an error the tokenizer maps back to text.
        assert_eq!(kinds("a!b"), vec![Token::Text, Token::Text, Token::Text]);
    }

    #[test]
    fn test_spans_cover_the_input() {
        let source = "**bold** and `code`";
        let tokens = tokenize(source);
        let mut end = 0;
        for (_, span) in &tokens {
            assert_eq!(span.start, end);
            end = span.end;
        }
        assert_eq!(end, source.len());
    }
}
