use super::token::{ArithOp, Keyword, LogicOp, Pos, Punct, RelOp, Token, TokenKind, TokenSequence};
use crate::error::Error;
use c8arch::op::{Directive, Mnemonic};
use c8arch::reg::{Reg, Special};
use c8arch::ADDR_MAX;
use std::iter::Peekable;
use std::str::CharIndices;

pub const COMMENT: char = ';';

/// Strip the trailing comment, turn comma separators into spaces and trim
/// trailing whitespace.
pub fn clean_line(raw: &str) -> String {
    let code = match raw.find(COMMENT) {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    code.replace(',', " ").trim_end().to_string()
}

/// Tokenize one line. A blank line gives `Ok(None)`.
pub fn tokenize(line: &str) -> Result<Option<TokenSequence>, Error> {
    tokenize_at(line, 0)
}

pub fn tokenize_at(line: &str, line_idx: usize) -> Result<Option<TokenSequence>, Error> {
    let code = clean_line(line);
    LineLexer::new(&code, line_idx).parse()
}

/// Tokenize a whole source unit into one sequence terminated by `EndOfFile`.
pub fn tokenize_source(code: &str) -> Result<TokenSequence, Error> {
    Lexer::new(code).parse()
}

pub struct Lexer<'a> {
    code: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self { code }
    }

    pub fn parse(self) -> Result<TokenSequence, Error> {
        let mut tokens = TokenSequence::new();
        let mut last = 0;
        for (line_idx, line) in self.code.lines().enumerate() {
            if let Some(toks) = tokenize_at(line, line_idx)? {
                tokens.extend(toks);
            }
            last = line_idx;
        }
        let pos = Pos { line: last, col: 0 };
        tokens.push(Token::new(TokenKind::EndOfFile, "", pos));
        Ok(tokens)
    }
}

pub struct LineLexer<'a> {
    iter: Peekable<CharIndices<'a>>,
    code: &'a str,
    line: usize,
}

impl<'a> LineLexer<'a> {
    pub fn new(code: &'a str, line: usize) -> Self {
        Self {
            iter: code.char_indices().peekable(),
            code,
            line,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<(usize, char)> {
        self.iter.clone().nth(n)
    }
    fn consume(&mut self) -> Option<(usize, char)> {
        self.iter.next()
    }
    fn pos(&self, col: usize) -> Pos {
        Pos {
            line: self.line,
            col,
        }
    }
}

// ----------------------------------------------------------------------------
// Lexer
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    pub fn parse(mut self) -> Result<Option<TokenSequence>, Error> {
        let mut tokens = TokenSequence::new();
        while let Some((idx, ch0)) = self.peek_nth(0) {
            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            // 1. Double character token
            if let Some((_, ch1)) = self.peek_nth(1) {
                if let Some(kind) = double_char_token(ch0, ch1) {
                    self.consume();
                    self.consume();
                    let text = &self.code[idx..idx + 2];
                    tokens.push(Token::new(kind, text, self.pos(idx)));
                    continue;
                }
            }

            // 2. Single character token
            if let Some(kind) = single_char_token(ch0) {
                self.consume();
                tokens.push(Token::new(kind, ch0.to_string(), self.pos(idx)));
                continue;
            }

            // 3. Word
            let word = self.parse_word(idx);
            match classify(word) {
                Some(kind) => tokens.push(Token::new(kind, word, self.pos(idx))),
                None => {
                    return Err(Error::Lex {
                        lexeme: word.to_string(),
                        line: self.line,
                        col: idx,
                    })
                }
            }
        }

        if tokens.is_empty() {
            return Ok(None);
        }
        let eol = self.pos(self.code.len());
        tokens.push(Token::new(TokenKind::EndOfLine, "", eol));
        Ok(Some(tokens))
    }

    fn parse_word(&mut self, start: usize) -> &'a str {
        let mut end = start;
        while let Some((idx, ch)) = self.peek_nth(0) {
            if ch.is_whitespace() || single_char_token(ch).is_some() {
                break;
            }
            if let Some((_, next)) = self.peek_nth(1) {
                if double_char_token(ch, next).is_some() {
                    break;
                }
            }
            self.consume();
            end = idx + ch.len_utf8();
        }
        let code = self.code;
        &code[start..end]
    }
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        ('=', '=') => Some(TokenKind::Relational(RelOp::Eq)),
        ('!', '=') => Some(TokenKind::Relational(RelOp::Ne)),
        ('<', '=') => Some(TokenKind::Relational(RelOp::Le)),
        ('>', '=') => Some(TokenKind::Relational(RelOp::Ge)),
        ('&', '&') => Some(TokenKind::Logical(LogicOp::And)),
        ('|', '|') => Some(TokenKind::Logical(LogicOp::Or)),
        _ => None,
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '+' => Some(TokenKind::Arithmetic(ArithOp::Add)),
        '-' => Some(TokenKind::Arithmetic(ArithOp::Sub)),
        '*' => Some(TokenKind::Arithmetic(ArithOp::Mul)),
        '/' => Some(TokenKind::Arithmetic(ArithOp::Div)),
        '%' => Some(TokenKind::Arithmetic(ArithOp::Mod)),
        '=' => Some(TokenKind::Assignment),
        '<' => Some(TokenKind::Relational(RelOp::Lt)),
        '>' => Some(TokenKind::Relational(RelOp::Gt)),
        '!' => Some(TokenKind::Logical(LogicOp::Not)),
        '(' => Some(TokenKind::Punctuation(Punct::LParen)),
        ')' => Some(TokenKind::Punctuation(Punct::RParen)),
        '{' => Some(TokenKind::Punctuation(Punct::LCurly)),
        '}' => Some(TokenKind::Punctuation(Punct::RCurly)),
        _ => None,
    }
}

fn keyword(s: &str) -> Option<TokenKind> {
    match s.to_ascii_uppercase().as_str() {
        "IF" => Some(TokenKind::Keyword(Keyword::If)),
        "ELSE" => Some(TokenKind::Keyword(Keyword::Else)),
        "WHILE" => Some(TokenKind::Keyword(Keyword::While)),
        _ => None,
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}

/// Hex literals are capped at 12 bits; decimals are left for the field check.
fn number(s: &str) -> Option<u32> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => {
            let value = u32::from_str_radix(hex, 16).ok()?;
            (value <= ADDR_MAX as u32).then_some(value)
        }
        None if s.bytes().all(|b| b.is_ascii_digit()) => s.parse::<u32>().ok(),
        None => None,
    }
}

/// Word classification, in priority order.
fn classify(word: &str) -> Option<TokenKind> {
    if let Some(dir) = Directive::parse(word) {
        return Some(TokenKind::Directive(dir));
    }
    if let Some(op) = Mnemonic::parse(word) {
        return Some(TokenKind::Mnemonic(op));
    }
    if let Some(kw) = keyword(word) {
        return Some(kw);
    }
    if let Some(reg) = Reg::parse(word) {
        return Some(TokenKind::GeneralRegister(reg));
    }
    if let Some(special) = Special::parse(word) {
        return Some(TokenKind::SpecialRegister(special));
    }
    if word.starts_with(|ch: char| ch.is_ascii_digit()) {
        return number(word).map(TokenKind::Number);
    }
    if let Some(name) = word.strip_prefix('&') {
        return is_ident(name).then(|| TokenKind::LabelReference(name.to_string()));
    }
    if let Some(name) = word.strip_suffix(':') {
        return is_ident(name).then(|| TokenKind::LabelDefinition(name.to_string()));
    }
    if word.eq_ignore_ascii_case("NOT") {
        return Some(TokenKind::Logical(LogicOp::Not));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind> {
        tokenize(line)
            .unwrap()
            .unwrap()
            .map(|tok| tok.kind)
            .collect()
    }

    #[test]
    fn clean() {
        assert_eq!(clean_line("LD V0, 0x10 ; load"), "LD V0  0x10");
        assert_eq!(clean_line("   ; only comment"), "");
        assert_eq!(clean_line("CLS   "), "CLS");
    }

    #[test]
    fn blank_line() {
        assert_eq!(tokenize(""), Ok(None));
        assert_eq!(tokenize("  ; nothing here"), Ok(None));
    }

    #[test]
    fn numbers() {
        assert_eq!(number("0x10"), Some(0x10));
        assert_eq!(number("0XFFF"), Some(0xFFF));
        assert_eq!(number("0x1000"), None);
        assert_eq!(number("4095"), Some(0xFFF));
        assert_eq!(number("4096"), Some(0x1000));
        assert_eq!(number("5000"), Some(5000));
        assert_eq!(number("99999999999"), None);
        assert_eq!(number("0x"), None);
        assert_eq!(number("12a"), None);
    }

    #[test]
    fn priority() {
        use TokenKind as T;
        // "B" and "F" are registers, "AND" is a mnemonic before anything else
        assert_eq!(
            kinds("LD B V3"),
            vec![
                T::Mnemonic(Mnemonic::LD),
                T::SpecialRegister(Special::B),
                T::GeneralRegister(Reg::V3),
                T::EndOfLine
            ]
        );
        assert_eq!(
            kinds("and: AND V1 V2"),
            vec![
                T::LabelDefinition("and".into()),
                T::Mnemonic(Mnemonic::AND),
                T::GeneralRegister(Reg::V1),
                T::GeneralRegister(Reg::V2),
                T::EndOfLine
            ]
        );
        assert_eq!(kinds("NOT")[0], T::Logical(LogicOp::Not));
        assert_eq!(kinds(".DB 1")[0], T::Directive(Directive::DB));
        assert_eq!(kinds("while")[0], T::Keyword(Keyword::While));
        assert_eq!(kinds("[I]")[0], T::SpecialRegister(Special::Mem));
        assert_eq!(kinds("&loop")[0], T::LabelReference("loop".into()));
    }

    #[test]
    fn operators() {
        use TokenKind as T;
        assert_eq!(
            kinds("V1=V2+3<=V4&&!V5"),
            vec![
                T::GeneralRegister(Reg::V1),
                T::Assignment,
                T::GeneralRegister(Reg::V2),
                T::Arithmetic(ArithOp::Add),
                T::Number(3),
                T::Relational(RelOp::Le),
                T::GeneralRegister(Reg::V4),
                T::Logical(LogicOp::And),
                T::Logical(LogicOp::Not),
                T::GeneralRegister(Reg::V5),
                T::EndOfLine
            ]
        );
    }

    #[test]
    fn lex_errors() {
        assert!(matches!(tokenize("LD V16 1"), Err(Error::Lex { lexeme, .. }) if lexeme == "V16"));
        assert!(matches!(tokenize("JP 0x1000"), Err(Error::Lex { lexeme, .. }) if lexeme == "0x1000"));
        assert!(matches!(tokenize("JP &"), Err(Error::Lex { .. })));
        assert!(matches!(tokenize("foo"), Err(Error::Lex { col: 0, .. })));
        assert!(matches!(tokenize("CLS @"), Err(Error::Lex { col: 4, .. })));
    }

    #[test]
    fn whole_source() {
        let tokens = tokenize_source("CLS\n\n; comment\nRET").unwrap();
        let lines: Vec<_> = tokens.map(|tok| (tok.kind, tok.pos.line)).collect();
        assert_eq!(
            lines,
            vec![
                (TokenKind::Mnemonic(Mnemonic::CLS), 0),
                (TokenKind::EndOfLine, 0),
                (TokenKind::Mnemonic(Mnemonic::RET), 3),
                (TokenKind::EndOfLine, 3),
                (TokenKind::EndOfFile, 3),
            ]
        );
    }
}
