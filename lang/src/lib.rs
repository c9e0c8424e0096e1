mod error;
pub mod grammar;
pub mod scope;

pub use error::{Error, TokenInfo};
pub use grammar::ast::{print_tree, Node, RegRef};
pub use grammar::lexer::{clean_line, tokenize, tokenize_at, tokenize_source, Lexer, LineLexer};
pub use grammar::parser::{parse, parse_program};
pub use grammar::parsercore::Parser;
pub use grammar::token::{Token, TokenKind, TokenSequence};
pub use scope::{Scope, Scopes, Variable};
