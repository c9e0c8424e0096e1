use c8arch::op::{Directive, Mnemonic};
use c8arch::reg::{Reg, Special};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: Pos) -> Self {
        Token {
            kind,
            text: text.into(),
            pos,
        }
    }

    /// Resolved value of a number literal.
    pub fn value(&self) -> Option<u32> {
        match self.kind {
            TokenKind::Number(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize, // 0-based line index
    pub col: usize,  // 0-based byte offset
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Mnemonic(Mnemonic),
    Directive(Directive),
    GeneralRegister(Reg),
    SpecialRegister(Special),
    Number(u32),
    Arithmetic(ArithOp),
    Assignment, // '='
    Relational(RelOp),
    Logical(LogicOp),
    Keyword(Keyword),
    LabelDefinition(String), // name:
    LabelReference(String),  // &name
    Punctuation(Punct),
    EndOfLine,
    EndOfFile,
}

impl TokenKind {
    /// Kind name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Mnemonic(_) => "mnemonic",
            TokenKind::Directive(_) => "directive",
            TokenKind::GeneralRegister(_) => "register",
            TokenKind::SpecialRegister(_) => "special register",
            TokenKind::Number(_) => "number",
            TokenKind::Arithmetic(_) => "arithmetic operator",
            TokenKind::Assignment => "'='",
            TokenKind::Relational(_) => "relational operator",
            TokenKind::Logical(_) => "logical operator",
            TokenKind::Keyword(_) => "keyword",
            TokenKind::LabelDefinition(_) => "label definition",
            TokenKind::LabelReference(_) => "label reference",
            TokenKind::Punctuation(Punct::LParen) => "'('",
            TokenKind::Punctuation(Punct::RParen) => "')'",
            TokenKind::Punctuation(Punct::LCurly) => "'{'",
            TokenKind::Punctuation(Punct::RCurly) => "'}'",
            TokenKind::EndOfLine => "end of line",
            TokenKind::EndOfFile => "end of file",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add, // '+'
    Sub, // '-'
    Mul, // '*'
    Div, // '/'
    Mod, // '%'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq, // '=='
    Ne, // '!='
    Lt, // '<'
    Gt, // '>'
    Le, // '<='
    Ge, // '>='
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And, // '&&'
    Or,  // '||'
    Not, // '!' | "NOT"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    If,
    Else,
    While,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    LParen, // '('
    RParen, // ')'
    LCurly, // '{'
    RCurly, // '}'
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
            RelOp::Lt => "<",
            RelOp::Gt => ">",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogicOp::And => "&&",
            LogicOp::Or => "||",
            LogicOp::Not => "!",
        };
        write!(f, "{s}")
    }
}

// ----------------------------------------------------------------------------
// Token sequence

/// Ordered, single-consumption queue of tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSequence(VecDeque<Token>);

impl TokenSequence {
    pub fn new() -> Self {
        TokenSequence(VecDeque::new())
    }

    pub fn push(&mut self, token: Token) {
        self.0.push_back(token);
    }

    /// Watch the front token without consuming it
    pub fn peek(&self) -> Option<&Token> {
        self.0.front()
    }

    /// Remove the front token
    pub fn pop(&mut self) -> Option<Token> {
        self.0.pop_front()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend(&mut self, other: TokenSequence) {
        self.0.extend(other.0);
    }

    /// Rewrite every token in place, keeping the order.
    pub fn map_tokens<E>(self, f: impl FnMut(Token) -> Result<Token, E>) -> Result<Self, E> {
        self.0
            .into_iter()
            .map(f)
            .collect::<Result<VecDeque<Token>, E>>()
            .map(TokenSequence)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.0.iter()
    }
}

impl Iterator for TokenSequence {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.pop()
    }
}
