//! §4.1 Lexer — tokenization of RPAL source text.
//!
//! The `Lexer` greedily looks for the longest next token, then consumes
//! it and advances by the token's length, skipping whitespace and
//! comments between tokens.

use std::rc::Rc;

use crate::common::{source::Source, span::Spanned};
use crate::compiler::syntax::Syntax;
use crate::construct::token::{Token, Tokens, KEYWORDS};

/// Characters that make up RPAL operator tokens. Operators are matched
/// greedily: the longest run of these characters starting at the current
/// position becomes one `Operator` token.
const OP_CHARS: &str = "+-*<>&.@/:=~|$!#%^_[]{}\"'?";
const PUNCTUATION: &str = "();,";

#[derive(Debug)]
pub struct Lexer {
    source: Rc<Source>,
    index: usize,
}

impl Lexer {
    /// Lexes a whole source into a token stream, terminated by `Eof`.
    pub fn lex(source: Rc<Source>) -> Result<Tokens, Syntax> {
        let mut lexer = Lexer { source, index: 0 };
        let mut tokens = Tokens::new();

        lexer.strip();
        while lexer.index < lexer.source.contents.len() {
            let token = lexer.next_token()?;
            tokens.push(token);
            lexer.strip();
        }

        let eof_span = crate::common::span::Span::point(&lexer.source, lexer.index);
        tokens.push(Spanned::new(Token::Eof, eof_span));
        Ok(tokens)
    }

    fn remaining(&self) -> &str {
        &self.source.contents[self.index..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Skips whitespace and `//`-to-end-of-line comments.
    fn strip(&mut self) {
        loop {
            let before = self.index;

            while let Some(c) = self.peek_char() {
                if c.is_whitespace() {
                    self.index += c.len_utf8();
                } else {
                    break;
                }
            }

            if self.remaining().starts_with("//") {
                while let Some(c) = self.peek_char() {
                    self.index += c.len_utf8();
                    if c == '\n' {
                        break;
                    }
                }
            }

            if self.index == before {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Spanned<Token>, Syntax> {
        let start = self.index;
        let c = self.peek_char().expect("next_token called at end of input");

        let token = if c.is_alphabetic() {
            self.lex_identifier_or_keyword()
        } else if c.is_ascii_digit() {
            self.lex_integer()
        } else if c == '\'' {
            self.lex_string(start)?
        } else if PUNCTUATION.contains(c) {
            self.index += 1;
            Token::Punction(c)
        } else if OP_CHARS.contains(c) {
            self.lex_operator()
        } else {
            let span = crate::common::span::Span::new(&self.source, start, c.len_utf8());
            return Err(Syntax::lexical(format!("unrecognized character '{}'", c), span));
        };

        let span = crate::common::span::Span::new(&self.source, start, self.index - start);
        Ok(Spanned::new(token, span))
    }

    fn lex_identifier_or_keyword(&mut self) -> Token {
        let start = self.index;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.index += c.len_utf8();
            } else {
                break;
            }
        }
        let text = self.source.contents[start..self.index].to_string();
        if KEYWORDS.contains(&text.as_str()) {
            Token::Keyword(text)
        } else {
            Token::Identifier(text)
        }
    }

    fn lex_integer(&mut self) -> Token {
        let start = self.index;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.index += 1;
            } else {
                break;
            }
        }
        Token::Integer(self.source.contents[start..self.index].to_string())
    }

    fn lex_string(&mut self, start: usize) -> Result<Token, Syntax> {
        self.index += 1; // opening quote
        let mut value = String::new();

        loop {
            match self.peek_char() {
                None => {
                    let span = crate::common::span::Span::new(&self.source, start, self.index - start);
                    return Err(Syntax::lexical("unterminated string literal".into(), span));
                }
                Some('\'') => {
                    self.index += 1;
                    break;
                }
                Some('\\') => {
                    self.index += 1;
                    match self.peek_char() {
                        Some('t') => { value.push('\t'); self.index += 1; }
                        Some('n') => { value.push('\n'); self.index += 1; }
                        Some('\\') => { value.push('\\'); self.index += 1; }
                        Some('\'') => { value.push('\''); self.index += 1; }
                        Some(other) => {
                            let span = crate::common::span::Span::new(&self.source, self.index, other.len_utf8());
                            return Err(Syntax::lexical(format!("unknown escape sequence '\\{}'", other), span));
                        }
                        None => {
                            let span = crate::common::span::Span::new(&self.source, start, self.index - start);
                            return Err(Syntax::lexical("unterminated string literal".into(), span));
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.index += c.len_utf8();
                }
            }
        }

        Ok(Token::Str(value))
    }

    fn lex_operator(&mut self) -> Token {
        let start = self.index;
        while let Some(c) = self.peek_char() {
            if OP_CHARS.contains(c) {
                self.index += c.len_utf8();
            } else {
                break;
            }
        }
        Token::Operator(self.source.contents[start..self.index].to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lex(src: &str) -> Tokens {
        Lexer::lex(Rc::new(Source::source(src))).expect("lex failed")
    }

    #[test]
    fn identifiers_and_keywords() {
        let tokens = lex("let x = letter in x");
        let kinds: Vec<Token> = tokens.into_iter().map(|t| t.item).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Keyword("let".into()),
                Token::Identifier("x".into()),
                Token::Operator("=".into()),
                Token::Identifier("letter".into()),
                Token::Keyword("in".into()),
                Token::Identifier("x".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn integers_and_strings() {
        let tokens = lex("42 'hi\\n'");
        let kinds: Vec<Token> = tokens.into_iter().map(|t| t.item).collect();
        assert_eq!(
            kinds,
            vec![Token::Integer("42".into()), Token::Str("hi\n".into()), Token::Eof]
        );
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        let tokens = lex("x // a comment\n  + y");
        let kinds: Vec<Token> = tokens.into_iter().map(|t| t.item).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Identifier("x".into()),
                Token::Operator("+".into()),
                Token::Identifier("y".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn unrecognized_character_is_lexical_error() {
        let err = Lexer::lex(Rc::new(Source::source("x ` y")));
        assert!(err.is_err());
    }

    #[test]
    fn unterminated_string_is_lexical_error() {
        let err = Lexer::lex(Rc::new(Source::source("'abc")));
        assert!(err.is_err());
    }
}
