use strum::{Display, EnumIter, EnumString};

/// Instruction mnemonics. One mnemonic may select several opcodes
/// depending on the shape of its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Mnemonic {
    CLS,
    RET,
    SYS,
    JP,
    CALL,
    SE,
    SNE,
    LD,
    ADD,
    OR,
    AND,
    XOR,
    SUB,
    SHR,
    SUBN,
    SHL,
    RND,
    DRW,
    SKP,
    SKNP,
}

impl Mnemonic {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    /// Largest number of operands any form of this mnemonic accepts.
    pub fn max_operands(&self) -> usize {
        use Mnemonic::*;
        match self {
            CLS | RET => 0,
            SYS | CALL | SKP | SKNP => 1,
            DRW => 3,
            _ => 2,
        }
    }
}

/// Assembler directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Directive {
    /// Reserve data bytes.
    #[strum(serialize = ".db")]
    DB,
}

impl Directive {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parse() {
        assert_eq!(Mnemonic::parse("ld"), Some(Mnemonic::LD));
        assert_eq!(Mnemonic::parse("SKNP"), Some(Mnemonic::SKNP));
        assert_eq!(Mnemonic::parse("MOV"), None);
        assert_eq!(Directive::parse(".db"), Some(Directive::DB));
        assert_eq!(Directive::parse(".DB"), Some(Directive::DB));
        assert_eq!(Directive::parse("db"), None);
        assert_eq!(Directive::DB.to_string(), ".db");
    }

    #[test]
    fn display_roundtrip() {
        for m in Mnemonic::iter() {
            assert_eq!(Mnemonic::parse(&m.to_string()), Some(m));
        }
    }
}
