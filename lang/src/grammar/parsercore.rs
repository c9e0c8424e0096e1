use super::token::{Pos, Punct, Token, TokenKind, TokenSequence};
use crate::error::{Error, TokenInfo};
use crate::scope::Scopes;

pub struct Parser {
    tokens: TokenSequence,
    pub(crate) scopes: Scopes,
    last: Pos,
}

impl Parser {
    pub fn new(tokens: TokenSequence) -> Self {
        Parser {
            tokens,
            scopes: Scopes::new(),
            last: Pos::default(),
        }
    }

    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }

    pub fn into_scopes(self) -> Scopes {
        self.scopes
    }
}

impl Parser {
    /// Peek : Watch next token without consuming it
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.peek()
    }

    /// Next : Consume next token and return it
    pub fn next(&mut self) -> Option<Token> {
        let token = self.tokens.pop();
        if let Some(token) = &token {
            self.last = token.pos;
        }
        token
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&self, cond: F) -> bool {
        self.peek().is_some_and(cond)
    }

    /// Consume if next token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        if self.check_if(cond) {
            self.next()
        } else {
            None
        }
    }

    /// Skip end-of-line markers
    pub fn skip_eol(&mut self) {
        while self.consume_if(|token| token.kind == TokenKind::EndOfLine).is_some() {}
    }

    /// True once only `EndOfFile` (or nothing) is left.
    pub fn exhausted(&self) -> bool {
        !self.check_if(|token| token.kind != TokenKind::EndOfFile)
    }

    /// Next token must be match with condition
    pub fn eat<F: Fn(&Token) -> bool>(
        &mut self,
        expected: &'static str,
        cond: F,
    ) -> Result<Token, Error> {
        if self.check_if(&cond) {
            if let Some(token) = self.next() {
                return Ok(token);
            }
        }
        Err(self.unexpected(expected))
    }

    /// Next token must be the closing punctuation. Running out of tokens
    /// (or of the line, for a parenthesis) before it is an unterminated block.
    pub fn eat_close(&mut self, punct: Punct) -> Result<Token, Error> {
        let expected = TokenKind::Punctuation(punct).name();
        let at_eol = self.check_if(|token| token.kind == TokenKind::EndOfLine);
        if self.exhausted() || (punct == Punct::RParen && at_eol) {
            return Err(Error::UnterminatedBlock {
                expected,
                found: self.found(),
            });
        }
        self.eat(expected, |token| token.kind == TokenKind::Punctuation(punct))
    }

    /// The token in front, or the end of input after the last consumed one.
    pub fn found(&self) -> TokenInfo {
        match self.peek() {
            Some(token) => token.into(),
            None => TokenInfo {
                kind: TokenKind::EndOfFile.name(),
                text: String::new(),
                line: self.last.line,
                col: self.last.col,
            },
        }
    }

    pub fn unexpected(&self, expected: &'static str) -> Error {
        Error::Syntax {
            expected,
            found: self.found(),
        }
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat, $name:expr) => {
        $parser.eat($name, |token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(&token.kind, $trigger))
    };
}
