use super::token::{ArithOp, LogicOp, RelOp};
use c8arch::op::Mnemonic;
use c8arch::reg::{Reg, Special};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegRef {
    General(Reg),
    Special(Special),
}

impl fmt::Display for RegRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegRef::General(reg) => write!(f, "{reg}"),
            RegRef::Special(reg) => write!(f, "{reg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    NumberLiteral(u32),                           // num-lit
    RegisterRef(RegRef),                          // reg
    LabelRef(String),                             // "&" ident
    BinaryOp(ArithOp, Box<Node>, Box<Node>),      // expr ( "+" | "-" | "*" | "/" | "%" ) expr
    RelationalOp(RelOp, Box<Node>, Box<Node>),    // expr relop expr
    LogicalOp(LogicOp, Box<Node>, Box<Node>),     // cond ( "&&" | "||" ) cond
    Not(Box<Node>),                               // ( "!" | "NOT" ) expr
    AssignmentOp(Box<Node>, Box<Node>),           // reg "=" expr
    Instruction(Mnemonic, Vec<Node>),             // mnemonic { factor }
    Block(Vec<Node>),                             // "{" { stmt } "}"
    IfStatement(Box<Node>, Box<Node>, Option<Box<Node>>), // "IF" "(" cond ")" block [ "ELSE" block ]
    WhileStatement(Box<Node>, Box<Node>),         // "WHILE" "(" cond ")" block
}

impl Node {
    pub fn binary(op: ArithOp, left: Node, right: Node) -> Node {
        Node::BinaryOp(op, Box::new(left), Box::new(right))
    }

    pub fn relational(op: RelOp, left: Node, right: Node) -> Node {
        Node::RelationalOp(op, Box::new(left), Box::new(right))
    }

    pub fn logical(op: LogicOp, left: Node, right: Node) -> Node {
        Node::LogicalOp(op, Box::new(left), Box::new(right))
    }

    pub fn assign(target: Node, value: Node) -> Node {
        Node::AssignmentOp(Box::new(target), Box::new(value))
    }

    pub fn reg(reg: Reg) -> Node {
        Node::RegisterRef(RegRef::General(reg))
    }

    pub fn special(reg: Special) -> Node {
        Node::RegisterRef(RegRef::Special(reg))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::NumberLiteral(v) => write!(f, "0x{v:X}"),
            Node::RegisterRef(reg) => write!(f, "{reg}"),
            Node::LabelRef(name) => write!(f, "&{name}"),
            Node::BinaryOp(op, l, r) => write!(f, "({l} {op} {r})"),
            Node::RelationalOp(op, l, r) => write!(f, "({l} {op} {r})"),
            Node::LogicalOp(op, l, r) => write!(f, "({l} {op} {r})"),
            Node::Not(node) => write!(f, "!{node}"),
            Node::AssignmentOp(target, value) => write!(f, "({target} = {value})"),
            Node::Instruction(op, args) => {
                write!(f, "{op}")?;
                for (idx, arg) in args.iter().enumerate() {
                    let sep = if idx == 0 { " " } else { ", " };
                    write!(f, "{sep}{arg}")?;
                }
                Ok(())
            }
            Node::Block(stmts) => {
                write!(f, "{{")?;
                for stmt in stmts {
                    write!(f, " {stmt};")?;
                }
                write!(f, " }}")
            }
            Node::IfStatement(cond, then, els) => {
                write!(f, "IF {cond} {then}")?;
                match els {
                    Some(els) => write!(f, " ELSE {els}"),
                    None => Ok(()),
                }
            }
            Node::WhileStatement(cond, body) => write!(f, "WHILE {cond} {body}"),
        }
    }
}

/// Indented tree dump.
pub fn print_tree(node: &Node) -> String {
    let mut out = String::new();
    tree(node, 0, &mut out);
    out
}

fn tree(node: &Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Block(stmts) => {
            out.push_str(&format!("{indent}Block\n"));
            for stmt in stmts {
                tree(stmt, depth + 1, out);
            }
        }
        Node::IfStatement(cond, then, els) => {
            out.push_str(&format!("{indent}If {cond}\n"));
            tree(then, depth + 1, out);
            if let Some(els) = els {
                out.push_str(&format!("{indent}Else\n"));
                tree(els, depth + 1, out);
            }
        }
        Node::WhileStatement(cond, body) => {
            out.push_str(&format!("{indent}While {cond}\n"));
            tree(body, depth + 1, out);
        }
        other => out.push_str(&format!("{indent}{other}\n")),
    }
}
