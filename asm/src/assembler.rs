use crate::encode::{encode, operands};
use crate::error::{Error, Field, LineError};
use crate::image::{Data, Image, Unit};
use crate::label::Labels;
use crate::msg::{Diag, Msg};
use c8arch::inst::Inst;
use c8arch::op::Directive;
use c8arch::{ADDR_MAX, BASE_ADDR};
use c8lang::{tokenize_at, Node, Token, TokenInfo, TokenKind, TokenSequence};
use indexmap::IndexSet;

// ----------------------------------------------------------------------------
// Layout slots

#[derive(Debug)]
enum Slot {
    Guard,               // jump over leading data
    Pad,                 // aligns the following instruction
    Byte(u8),            // .db
    Inst(TokenSequence), // mnemonic and operands, labels unresolved
}

impl Slot {
    fn size(&self) -> u16 {
        match self {
            Slot::Guard | Slot::Inst(_) => 2,
            Slot::Pad | Slot::Byte(_) => 1,
        }
    }
}

#[derive(Debug)]
struct Pending {
    addr: u16,
    line_idx: usize,
    slot: Slot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    Unused,
    Open,
    Target(u16),
}

// ----------------------------------------------------------------------------
// Assembler

pub struct Assembler {
    lines: Vec<String>,
    pc: u16,
    labels: Labels,
    unbound: Vec<String>,
    pending: Vec<Pending>,
    guard: Guard,
    used: IndexSet<String>,
    diags: Vec<Diag>,
}

impl Assembler {
    pub fn new(source: &str) -> Self {
        Assembler {
            lines: source.lines().map(String::from).collect(),
            pc: BASE_ADDR,
            labels: Labels::new(),
            unbound: Vec::new(),
            pending: Vec::new(),
            guard: Guard::Unused,
            used: IndexSet::new(),
            diags: Vec::new(),
        }
    }

    /// Raw source lines, indexed by 0-based line number.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Warnings and notes collected so far.
    pub fn diags(&self) -> &[Diag] {
        &self.diags
    }

    fn note(&mut self, line_idx: usize, msg: String) {
        self.diags.push(Diag {
            line_idx,
            msg: Msg::Note(msg),
        });
    }
}

/// Run both passes over `source`.
pub fn assemble(source: &str) -> Result<Image, LineError> {
    let mut asm = Assembler::new(source);
    asm.layout()?;
    asm.resolve()
}

// ----------------------------------------------------------------------------
// Pass 1: layout

impl Assembler {
    /// Assign addresses, define labels and collect data bytes.
    pub fn layout(&mut self) -> Result<(), LineError> {
        for line_idx in 0..self.lines.len() {
            let tokens = tokenize_at(&self.lines[line_idx], line_idx)
                .map_err(|err| LineError::new(line_idx, err))?;
            if let Some(tokens) = tokens {
                self.layout_line(line_idx, tokens)
                    .map_err(|err| LineError::new(line_idx, err))?;
            }
        }

        // Labels after the last unit point at the end of the image
        let end = self.pc;
        for name in std::mem::take(&mut self.unbound) {
            self.labels.bind(&name, end);
        }
        if self.guard == Guard::Open {
            self.guard = Guard::Target(end);
        }
        Ok(())
    }

    fn layout_line(&mut self, line_idx: usize, mut tokens: TokenSequence) -> Result<(), Error> {
        while let Some(TokenKind::LabelDefinition(name)) = tokens.peek().map(|token| &token.kind) {
            self.labels.define(name, line_idx)?;
            self.unbound.push(name.clone());
            tokens.pop();
        }

        let head = tokens
            .peek()
            .map(|token| (token.kind.clone(), TokenInfo::from(token)));
        match head {
            None | Some((TokenKind::EndOfLine, _)) => Ok(()),
            Some((TokenKind::Directive(Directive::DB), _)) => {
                tokens.pop();
                self.layout_data(line_idx, tokens)
            }
            Some((TokenKind::Mnemonic(_), _)) => self.layout_inst(line_idx, tokens),
            Some((_, found)) => Err(c8lang::Error::Syntax {
                expected: "mnemonic or directive",
                found,
            }
            .into()),
        }
    }

    fn layout_data(&mut self, line_idx: usize, tokens: TokenSequence) -> Result<(), Error> {
        let mut bytes = Vec::new();
        for token in tokens {
            match token.kind {
                TokenKind::EndOfLine => break,
                TokenKind::Number(v) => bytes.push(Field::Byte.check(i64::from(v))? as u8),
                other => {
                    return Err(Error::InvalidOperand {
                        mnemonic: Directive::DB.to_string(),
                        kinds: other.name().to_string(),
                    })
                }
            }
        }
        if bytes.is_empty() {
            return Err(Error::EmptyDirective);
        }

        if self.pending.is_empty() {
            self.reserve(line_idx, Slot::Guard)?;
            self.guard = Guard::Open;
        }
        for byte in bytes {
            self.place(line_idx, Slot::Byte(byte))?;
        }
        Ok(())
    }

    fn layout_inst(&mut self, line_idx: usize, tokens: TokenSequence) -> Result<(), Error> {
        if self.pc % 2 == 1 {
            self.reserve(line_idx, Slot::Pad)?;
        }
        let addr = self.place(line_idx, Slot::Inst(tokens))?;
        if self.guard == Guard::Open {
            self.guard = Guard::Target(addr);
        }
        Ok(())
    }

    /// Lay out a unit that waiting labels bind to.
    fn place(&mut self, line_idx: usize, slot: Slot) -> Result<u16, Error> {
        let addr = self.reserve(line_idx, slot)?;
        for name in std::mem::take(&mut self.unbound) {
            self.labels.bind(&name, addr);
        }
        Ok(addr)
    }

    /// Lay out a unit without binding labels to it.
    fn reserve(&mut self, line_idx: usize, slot: Slot) -> Result<u16, Error> {
        let addr = self.pc;
        let next = addr as u32 + slot.size() as u32;
        if next > ADDR_MAX as u32 + 1 {
            return Err(Error::AddressOverflow(addr));
        }
        self.pending.push(Pending {
            addr,
            line_idx,
            slot,
        });
        self.pc = next as u16;
        Ok(addr)
    }
}

// ----------------------------------------------------------------------------
// Pass 2: resolve labels and encode

impl Assembler {
    /// Encode every laid-out unit into the final image.
    pub fn resolve(&mut self) -> Result<Image, LineError> {
        let pending = std::mem::take(&mut self.pending);
        let mut units = Vec::with_capacity(pending.len());

        for Pending {
            addr,
            line_idx,
            slot,
        } in pending
        {
            let data = match slot {
                Slot::Guard => {
                    let target = match self.guard {
                        Guard::Target(target) => target,
                        _ => self.pc,
                    };
                    let target = Field::Addr
                        .check(target as i64)
                        .map_err(|err| LineError::new(line_idx, err))?;
                    self.note(line_idx, format!("Inserted jump over leading data to 0x{target:03X}"));
                    Data::Word(Inst::JP(target).to_bin())
                }
                Slot::Pad => {
                    self.note(line_idx, format!("Inserted padding byte at 0x{addr:03X} to align instruction"));
                    Data::Byte(0x00)
                }
                Slot::Byte(byte) => Data::Byte(byte),
                Slot::Inst(tokens) => {
                    let inst = self
                        .encode_inst(tokens)
                        .map_err(|err| LineError::new(line_idx, err))?;
                    Data::Word(inst.to_bin())
                }
            };
            units.push(Unit {
                addr,
                line_idx,
                data,
            });
        }

        for (name, label) in self.labels.iter() {
            if !self.used.contains(name) {
                self.diags.push(Diag {
                    line_idx: label.line,
                    msg: Msg::Warn(format!("Unused label: `{name}`")),
                });
            }
        }

        Ok(Image::new(units))
    }

    fn encode_inst(&mut self, tokens: TokenSequence) -> Result<Inst, Error> {
        let labels = &self.labels;
        let used = &mut self.used;
        let tokens = tokens.map_tokens(|token| match token.kind {
            TokenKind::LabelReference(ref name) => {
                let addr = labels.get_val(name)?;
                used.insert(name.clone());
                Ok::<_, Error>(Token::new(TokenKind::Number(u32::from(addr)), token.text, token.pos))
            }
            _ => Ok(token),
        })?;

        match c8lang::parse(tokens)? {
            Node::Instruction(op, args) => encode(op, &operands(op, &args)?),
            other => Err(Error::InvalidOperand {
                mnemonic: other.to_string(),
                kinds: String::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(source: &str) -> Assembler {
        let mut asm = Assembler::new(source);
        asm.layout().unwrap();
        asm
    }

    #[test]
    fn labels_bind_to_next_unit() {
        let asm = layout("top:\n\nCLS\nmid: ; comment\n.db 1\nend:");
        assert_eq!(asm.labels().get_val("top").unwrap(), 0x200);
        assert_eq!(asm.labels().get_val("mid").unwrap(), 0x202);
        assert_eq!(asm.labels().get_val("end").unwrap(), 0x203);
    }

    #[test]
    fn label_skips_padding() {
        let asm = layout("CLS\n.db 1\nnext:\nRET");
        assert_eq!(asm.labels().get_val("next").unwrap(), 0x204);
    }

    #[test]
    fn label_on_instruction_line() {
        let asm = layout("CLS\nloop: JP &loop");
        assert_eq!(asm.labels().get_val("loop").unwrap(), 0x202);
    }

    #[test]
    fn guard_targets_first_instruction() {
        let mut asm = layout(".db 1 2 3\nCLS");
        assert_eq!(asm.guard, Guard::Target(0x206));
        let image = asm.resolve().unwrap();
        assert_eq!(image.to_bytes(), vec![0x12, 0x06, 1, 2, 3, 0x00, 0x00, 0xE0]);
    }

    #[test]
    fn guard_without_instruction_targets_end() {
        let image = assemble(".db 0x12 0x34").unwrap();
        assert_eq!(image.to_bytes(), vec![0x12, 0x04, 0x12, 0x34]);
    }

    #[test]
    fn no_guard_when_code_first() {
        let image = assemble("CLS\n.db 0xAB").unwrap();
        assert_eq!(image.to_bytes(), vec![0x00, 0xE0, 0xAB]);
    }

    #[test]
    fn notes_and_warnings() {
        let mut asm = layout(".db 0xAA\nunused:\nCLS");
        asm.resolve().unwrap();
        let msgs: Vec<_> = asm.diags().iter().map(|d| (d.line_idx, d.msg.clone())).collect();
        assert_eq!(
            msgs,
            vec![
                (0, Msg::Note("Inserted jump over leading data to 0x204".into())),
                (2, Msg::Note("Inserted padding byte at 0x203 to align instruction".into())),
                (1, Msg::Warn("Unused label: `unused`".into())),
            ]
        );
    }

    #[test]
    fn layout_errors() {
        let err = |source: &str| Assembler::new(source).layout().unwrap_err();

        let e = err("a:\nCLS\na: RET");
        assert_eq!(e.line_idx, 2);
        assert!(matches!(e.error, Error::DuplicateLabel { prev: 0, .. }));

        assert!(matches!(err(".db").error, Error::EmptyDirective));
        assert!(matches!(err(".db 0x100").error, Error::Range { value: 0x100, field: Field::Byte }));
        assert!(matches!(err(".db V0").error, Error::InvalidOperand { .. }));
        assert!(matches!(err("V0 = 1").error, Error::Lang(c8lang::Error::Syntax { .. })));
        assert!(matches!(err("CLS\nLD V0 0x1000").error, Error::Lang(c8lang::Error::Lex { line: 1, .. })));
    }

    #[test]
    fn address_overflow() {
        let fits = "CLS\n".repeat(((ADDR_MAX + 1 - BASE_ADDR) / 2) as usize);
        assert!(assemble(&fits).is_ok());

        let over = format!("{fits}RET");
        let e = assemble(&over).unwrap_err();
        assert!(matches!(e.error, Error::AddressOverflow(0x1000)));
    }

    #[test]
    fn resolve_errors() {
        let e = assemble("CLS\nJP &missing").unwrap_err();
        assert_eq!(e.line_idx, 1);
        assert!(matches!(e.error, Error::UnresolvedLabel(ref name) if name == "missing"));

        let e = assemble("LD V0 &data\ndata: .db 1").unwrap_err();
        assert!(matches!(e.error, Error::Range { value: 0x202, field: Field::Kk }));

        let e = assemble("LD V0 (4 / 0)").unwrap_err();
        assert!(matches!(e.error, Error::DivideByZero));
    }
}
