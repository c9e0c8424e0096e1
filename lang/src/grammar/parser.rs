use super::ast::{Node, RegRef};
use super::parsercore::Parser;
use super::token::{ArithOp, Keyword, LogicOp, Punct, TokenKind, TokenSequence};
use crate::error::Error;
use crate::{check, expect, optional};

/// Parse one statement.
pub fn parse(tokens: TokenSequence) -> Result<Node, Error> {
    Parser::new(tokens).parse()
}

/// Parse a whole source unit into a `Block`.
pub fn parse_program(tokens: TokenSequence) -> Result<Node, Error> {
    Parser::new(tokens).parse_program()
}

impl Parser {
    /// stmt [ EOL ]
    pub fn parse(&mut self) -> Result<Node, Error> {
        self.skip_eol();
        let stmt = self.parse_expr()?;
        self.skip_eol();
        if !self.exhausted() {
            return Err(self.unexpected("end of line"));
        }
        Ok(stmt)
    }

    /// program = { stmt EOL }
    pub fn parse_program(&mut self) -> Result<Node, Error> {
        let mut stmts = Vec::new();
        loop {
            self.skip_eol();
            if self.exhausted() {
                break;
            }
            let stmt = self.parse_expr()?;
            self.end_of_stmt(&stmt)?;
            stmts.push(stmt);
        }
        Ok(Node::Block(stmts))
    }
}

impl Parser {
    /// expr = conditional | instruction | additive [ relop additive ] [ "=" expr ]
    fn parse_expr(&mut self) -> Result<Node, Error> {
        if check!(self, TokenKind::Keyword(Keyword::If | Keyword::While)) {
            return self.parse_conditional();
        }
        if check!(self, TokenKind::Mnemonic(_)) {
            return self.parse_instruction();
        }

        let line = self.found().line;
        let mut node = self.parse_additive()?;

        let rel = self.peek().and_then(|token| match token.kind {
            TokenKind::Relational(op) => Some(op),
            _ => None,
        });
        if let Some(op) = rel {
            self.next();
            let right = self.parse_additive()?;
            node = Node::relational(op, node, right);
        }

        if optional!(self, TokenKind::Assignment).is_some() {
            return match node {
                Node::RegisterRef(reg) => {
                    self.scopes.declare(&reg.to_string(), line);
                    let value = self.parse_expr()?;
                    Ok(Node::assign(Node::RegisterRef(reg), value))
                }
                other => Err(Error::InvalidAssignmentTarget {
                    target: other.to_string(),
                    line,
                }),
            };
        }

        Ok(node)
    }

    /// instruction = mnemonic { factor }
    fn parse_instruction(&mut self) -> Result<Node, Error> {
        let token = expect!(self, TokenKind::Mnemonic(_), "mnemonic")?;
        let op = match token.kind {
            TokenKind::Mnemonic(op) => op,
            _ => return Err(self.unexpected("mnemonic")),
        };

        let mut args = Vec::new();
        while check!(
            self,
            TokenKind::Number(_)
                | TokenKind::GeneralRegister(_)
                | TokenKind::SpecialRegister(_)
                | TokenKind::LabelReference(_)
                | TokenKind::Punctuation(Punct::LParen)
        ) {
            if args.len() == op.max_operands() {
                return Err(self.unexpected("end of instruction"));
            }
            args.push(self.parse_factor()?);
        }
        Ok(Node::Instruction(op, args))
    }

    /// additive = term { ( "+" | "-" ) term }
    fn parse_additive(&mut self) -> Result<Node, Error> {
        let mut node = self.parse_term()?;
        while let Some(op) = self.peek_arith(&[ArithOp::Add, ArithOp::Sub]) {
            self.next();
            let right = self.parse_term()?;
            node = Node::binary(op, node, right);
        }
        Ok(node)
    }

    /// term = factor { ( "*" | "/" | "%" ) factor }
    fn parse_term(&mut self) -> Result<Node, Error> {
        let mut node = self.parse_factor()?;
        while let Some(op) = self.peek_arith(&[ArithOp::Mul, ArithOp::Div, ArithOp::Mod]) {
            self.next();
            let right = self.parse_factor()?;
            node = Node::binary(op, node, right);
        }
        Ok(node)
    }

    fn peek_arith(&self, ops: &[ArithOp]) -> Option<ArithOp> {
        self.peek().and_then(|token| match token.kind {
            TokenKind::Arithmetic(op) if ops.contains(&op) => Some(op),
            _ => None,
        })
    }

    /// factor = num-lit | reg | label-ref | "(" expr ")" | block
    fn parse_factor(&mut self) -> Result<Node, Error> {
        let kind = self.peek().map(|token| token.kind.clone());
        match kind {
            Some(TokenKind::Number(value)) => {
                self.next();
                Ok(Node::NumberLiteral(value))
            }
            Some(TokenKind::GeneralRegister(reg)) => {
                self.next();
                Ok(Node::RegisterRef(RegRef::General(reg)))
            }
            Some(TokenKind::SpecialRegister(reg)) => {
                self.next();
                Ok(Node::RegisterRef(RegRef::Special(reg)))
            }
            Some(TokenKind::LabelReference(name)) => {
                self.next();
                Ok(Node::LabelRef(name))
            }
            Some(TokenKind::Punctuation(Punct::LParen)) => {
                self.next();
                let node = self.parse_expr()?;
                self.eat_close(Punct::RParen)?;
                Ok(node)
            }
            Some(TokenKind::Punctuation(Punct::LCurly)) => self.parse_block(),
            _ => Err(self.unexpected("number, register, label or '('")),
        }
    }

    /// cond = unary { ( "&&" | "||" ) unary }
    fn parse_condition(&mut self) -> Result<Node, Error> {
        let mut node = self.parse_unary()?;
        loop {
            let op = self.peek().and_then(|token| match token.kind {
                TokenKind::Logical(op @ (LogicOp::And | LogicOp::Or)) => Some(op),
                _ => None,
            });
            let Some(op) = op else { break };
            self.next();
            let right = self.parse_unary()?;
            node = Node::logical(op, node, right);
        }
        Ok(node)
    }

    /// unary = ( "!" | "NOT" ) unary | expr
    fn parse_unary(&mut self) -> Result<Node, Error> {
        if optional!(self, TokenKind::Logical(LogicOp::Not)).is_some() {
            let node = self.parse_unary()?;
            return Ok(Node::Not(Box::new(node)));
        }
        self.parse_expr()
    }

    /// conditional = "IF" "(" cond ")" block [ "ELSE" block ] | "WHILE" "(" cond ")" block
    fn parse_conditional(&mut self) -> Result<Node, Error> {
        let token = expect!(self, TokenKind::Keyword(Keyword::If | Keyword::While), "IF or WHILE")?;
        expect!(self, TokenKind::Punctuation(Punct::LParen), "'('")?;
        let cond = self.parse_condition()?;
        self.eat_close(Punct::RParen)?;
        self.skip_eol();
        let body = self.parse_block()?;

        match token.kind {
            TokenKind::Keyword(Keyword::While) => {
                Ok(Node::WhileStatement(Box::new(cond), Box::new(body)))
            }
            _ => {
                self.skip_eol();
                let els = match optional!(self, TokenKind::Keyword(Keyword::Else)) {
                    Some(_) => {
                        self.skip_eol();
                        Some(Box::new(self.parse_block()?))
                    }
                    None => None,
                };
                Ok(Node::IfStatement(Box::new(cond), Box::new(body), els))
            }
        }
    }

    /// block = "{" { stmt EOL } "}"
    fn parse_block(&mut self) -> Result<Node, Error> {
        expect!(self, TokenKind::Punctuation(Punct::LCurly), "'{'")?;
        self.scopes.enter();
        let mut stmts = Vec::new();
        loop {
            self.skip_eol();
            if check!(self, TokenKind::Punctuation(Punct::RCurly)) {
                break;
            }
            if self.exhausted() {
                return Err(Error::UnterminatedBlock {
                    expected: "'}'",
                    found: self.found(),
                });
            }
            let stmt = self.parse_expr()?;
            self.end_of_stmt(&stmt)?;
            stmts.push(stmt);
        }
        self.eat_close(Punct::RCurly)?;
        self.scopes.exit();
        Ok(Node::Block(stmts))
    }

    /// A statement ends at a line break, a closing brace or the end of input.
    /// Statements ending in a block may be followed directly by the next one.
    fn end_of_stmt(&mut self, stmt: &Node) -> Result<(), Error> {
        let kind = self.peek().map(|token| token.kind.clone());
        match kind {
            Some(TokenKind::EndOfLine) => {
                self.next();
                Ok(())
            }
            None | Some(TokenKind::EndOfFile) | Some(TokenKind::Punctuation(Punct::RCurly)) => {
                Ok(())
            }
            Some(_) if ends_with_block(stmt) => Ok(()),
            Some(_) => Err(self.unexpected("end of line")),
        }
    }
}

fn ends_with_block(node: &Node) -> bool {
    matches!(
        node,
        Node::Block(_) | Node::IfStatement(..) | Node::WhileStatement(..)
    )
}
