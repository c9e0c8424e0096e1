use crate::msg::Msg;
use std::fmt;
use thiserror::Error;

/// Immediate field an operand value is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Byte,   // .db parameter
    Nibble, // n
    Kk,     // kk
    Addr,   // nnn
}

impl Field {
    pub fn max(&self) -> i64 {
        match self {
            Field::Nibble => 0xF,
            Field::Byte | Field::Kk => 0xFF,
            Field::Addr => 0xFFF,
        }
    }

    /// Narrow `value` to the field, or fail with a range error.
    pub fn check(self, value: i64) -> Result<u16, Error> {
        if (0..=self.max()).contains(&value) {
            Ok(value as u16)
        } else {
            Err(Error::Range { value, field: self })
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Byte => write!(f, "data byte (0x00..=0xFF)"),
            Field::Nibble => write!(f, "n (0x0..=0xF)"),
            Field::Kk => write!(f, "kk (0x00..=0xFF)"),
            Field::Addr => write!(f, "nnn (0x000..=0xFFF)"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Lang(#[from] c8lang::Error),

    #[error("Re-defined label: `{name}` (first defined at line {})", prev + 1)]
    DuplicateLabel { name: String, prev: usize },

    #[error("Undefined label: `{0}`")]
    UnresolvedLabel(String),

    #[error("Invalid operands for `{mnemonic}`: ({kinds})")]
    InvalidOperand { mnemonic: String, kinds: String },

    #[error("Value {value} does not fit in {field}")]
    Range { value: i64, field: Field },

    #[error("Constant expression overflows")]
    ConstantOverflow,

    #[error("`.db` requires at least one byte")]
    EmptyDirective,

    #[error("Program does not fit below 0x1000 (unit at 0x{0:04X})")]
    AddressOverflow(u16),

    #[error("Division by zero in constant expression")]
    DivideByZero,

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Failed to serialize symbols")]
    Symbols(#[source] serde_yaml::Error),
}

impl Error {
    /// Process exit status for this kind of failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::FileOpen(..) | Error::FileRead(..) | Error::FileCreate(..) | Error::FileWrite(..) => 1,
            Error::Lang(err) => err.exit_code(),
            Error::DuplicateLabel { .. } => 6,
            Error::UnresolvedLabel(_) => 7,
            Error::InvalidOperand { .. } => 8,
            Error::Range { .. } | Error::ConstantOverflow => 9,
            Error::EmptyDirective
            | Error::AddressOverflow(_)
            | Error::DivideByZero
            | Error::Symbols(_) => 10,
        }
    }
}

/// An error tied to the 0-based source line it was raised on.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct LineError {
    pub line_idx: usize,
    pub error: Error,
}

impl LineError {
    pub fn new(line_idx: usize, error: impl Into<Error>) -> Self {
        LineError {
            line_idx,
            error: error.into(),
        }
    }

    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, file: &str, lines: &[String]) {
        let raw = lines.get(self.line_idx).map(|s| s.as_str()).unwrap_or("");
        Msg::Error(self.error.to_string()).print((file, self.line_idx + 1, raw));
    }
}
