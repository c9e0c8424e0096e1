use crate::error::{Error, Field};
use c8arch::inst::Inst;
use c8arch::op::Mnemonic;
use c8arch::reg::{Reg, Special};
use c8lang::grammar::token::ArithOp;
use c8lang::{Node, RegRef};
use std::fmt;

/// Operand shape after constant folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Imm(i64),
    Special(Special),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(_) => write!(f, "reg"),
            Operand::Imm(_) => write!(f, "imm"),
            Operand::Special(reg) => write!(f, "{reg}"),
        }
    }
}

/// Reduce the operand nodes of an instruction to shapes.
pub fn operands(op: Mnemonic, args: &[Node]) -> Result<Vec<Operand>, Error> {
    args.iter()
        .map(|arg| match arg {
            Node::RegisterRef(RegRef::General(reg)) => Ok(Operand::Reg(*reg)),
            Node::RegisterRef(RegRef::Special(reg)) => Ok(Operand::Special(*reg)),
            _ => fold(op, arg).map(Operand::Imm),
        })
        .collect()
}

/// Evaluate a constant expression.
fn fold(op: Mnemonic, node: &Node) -> Result<i64, Error> {
    match node {
        Node::NumberLiteral(v) => Ok(i64::from(*v)),
        Node::LabelRef(name) => Err(Error::UnresolvedLabel(name.clone())),
        Node::BinaryOp(arith, l, r) => {
            let l = fold(op, l)?;
            let r = fold(op, r)?;
            let value = match arith {
                ArithOp::Add => l.checked_add(r),
                ArithOp::Sub => l.checked_sub(r),
                ArithOp::Mul => l.checked_mul(r),
                ArithOp::Div => Some(l.checked_div(r).ok_or(Error::DivideByZero)?),
                ArithOp::Mod => Some(l.checked_rem(r).ok_or(Error::DivideByZero)?),
            };
            value.ok_or(Error::ConstantOverflow)
        }
        other => Err(Error::InvalidOperand {
            mnemonic: op.to_string(),
            kinds: other.to_string(),
        }),
    }
}

/// Select the opcode for a mnemonic from the shape of its operands.
pub fn encode(op: Mnemonic, args: &[Operand]) -> Result<Inst, Error> {
    use Mnemonic::*;
    use Operand::{Imm, Reg as R, Special as S};

    let kk = |v: &i64| Field::Kk.check(*v).map(|v| v as u8);
    let n = |v: &i64| Field::Nibble.check(*v).map(|v| v as u8);
    let nnn = |v: &i64| Field::Addr.check(*v);

    match (op, args) {
        (CLS, []) => Ok(Inst::CLS()),
        (RET, []) => Ok(Inst::RET()),
        (SYS, [Imm(a)]) => Ok(Inst::SYS(nnn(a)?)),
        (JP, [Imm(a)]) => Ok(Inst::JP(nnn(a)?)),
        (JP, [R(Reg::V0), Imm(a)]) => Ok(Inst::JPV0(nnn(a)?)),
        (CALL, [Imm(a)]) => Ok(Inst::CALL(nnn(a)?)),

        (SE, [R(x), Imm(k)]) => Ok(Inst::SEI(*x, kk(k)?)),
        (SE, [R(x), R(y)]) => Ok(Inst::SE(*x, *y)),
        (SNE, [R(x), Imm(k)]) => Ok(Inst::SNEI(*x, kk(k)?)),
        (SNE, [R(x), R(y)]) => Ok(Inst::SNE(*x, *y)),

        (LD, [R(x), Imm(k)]) => Ok(Inst::LDI(*x, kk(k)?)),
        (LD, [R(x), R(y)]) => Ok(Inst::LD(*x, *y)),
        (LD, [S(Special::I), Imm(a)]) => Ok(Inst::LDA(nnn(a)?)),
        (LD, [S(Special::Mem), R(x)]) => Ok(Inst::STORE(*x)),
        (LD, [R(x), S(Special::Mem)]) => Ok(Inst::LOAD(*x)),
        (LD, [R(x), S(Special::DT)]) => Ok(Inst::LDVDT(*x)),
        (LD, [R(x), S(Special::K)]) => Ok(Inst::LDK(*x)),
        (LD, [S(Special::DT), R(x)]) => Ok(Inst::LDDT(*x)),
        (LD, [S(Special::ST), R(x)]) => Ok(Inst::LDST(*x)),
        (LD, [S(Special::F), R(x)]) => Ok(Inst::LDF(*x)),
        (LD, [S(Special::B), R(x)]) => Ok(Inst::LDB(*x)),

        (ADD, [S(Special::I), R(x)]) => Ok(Inst::ADDA(*x)),
        (ADD, [R(x), R(y)]) => Ok(Inst::ADD(*x, *y)),
        (ADD, [R(x), Imm(k)]) => Ok(Inst::ADDI(*x, kk(k)?)),

        (OR, [R(x), R(y)]) => Ok(Inst::OR(*x, *y)),
        (AND, [R(x), R(y)]) => Ok(Inst::AND(*x, *y)),
        (XOR, [R(x), R(y)]) => Ok(Inst::XOR(*x, *y)),
        (SUB, [R(x), R(y)]) => Ok(Inst::SUB(*x, *y)),
        (SUBN, [R(x), R(y)]) => Ok(Inst::SUBN(*x, *y)),

        (SHR, [R(x)]) => Ok(Inst::SHR(*x, Reg::V0)),
        (SHR, [R(x), R(y)]) => Ok(Inst::SHR(*x, *y)),
        (SHL, [R(x)]) => Ok(Inst::SHL(*x, Reg::V0)),
        (SHL, [R(x), R(y)]) => Ok(Inst::SHL(*x, *y)),

        (RND, [R(x), Imm(k)]) => Ok(Inst::RND(*x, kk(k)?)),
        (DRW, [R(x), R(y), Imm(k)]) => Ok(Inst::DRW(*x, *y, n(k)?)),
        (SKP, [R(x)]) => Ok(Inst::SKP(*x)),
        (SKNP, [R(x)]) => Ok(Inst::SKNP(*x)),

        _ => Err(Error::InvalidOperand {
            mnemonic: op.to_string(),
            kinds: kinds(args),
        }),
    }
}

/// Operand kinds as listed in diagnostics: `reg, imm`.
pub fn kinds(args: &[Operand]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use Operand::{Imm, Reg as R, Special as S};

    macro_rules! test_encode {
        ($($name:ident: $op:ident [$($arg:expr),*] => $bin:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let inst = encode(Mnemonic::$op, &[$($arg),*]).unwrap();
                    assert_eq!(inst.to_bin(), $bin);
                }
            )*
        };
    }

    test_encode! {
        cls: CLS [] => 0x00E0,
        ret: RET [] => 0x00EE,
        sys: SYS [Imm(0x123)] => 0x0123,
        jp: JP [Imm(0x204)] => 0x1204,
        jp_v0: JP [R(Reg::V0), Imm(0x300)] => 0xB300,
        call: CALL [Imm(0x2A0)] => 0x22A0,
        se_imm: SE [R(Reg::V3), Imm(0x42)] => 0x3342,
        se_reg: SE [R(Reg::V3), R(Reg::V4)] => 0x5340,
        sne_imm: SNE [R(Reg::V5), Imm(0xFF)] => 0x45FF,
        sne_reg: SNE [R(Reg::V5), R(Reg::V6)] => 0x9560,
        ld_imm: LD [R(Reg::V0), Imm(0x10)] => 0x6010,
        ld_reg: LD [R(Reg::V1), R(Reg::V2)] => 0x8120,
        ld_i: LD [S(Special::I), Imm(0xFFF)] => 0xAFFF,
        ld_store: LD [S(Special::Mem), R(Reg::V7)] => 0xF755,
        ld_load: LD [R(Reg::V7), S(Special::Mem)] => 0xF765,
        ld_from_dt: LD [R(Reg::V2), S(Special::DT)] => 0xF207,
        ld_key: LD [R(Reg::V2), S(Special::K)] => 0xF20A,
        ld_to_dt: LD [S(Special::DT), R(Reg::V2)] => 0xF215,
        ld_to_st: LD [S(Special::ST), R(Reg::V2)] => 0xF218,
        ld_font: LD [S(Special::F), R(Reg::V9)] => 0xF929,
        ld_bcd: LD [S(Special::B), R(Reg::V9)] => 0xF933,
        add_i: ADD [S(Special::I), R(Reg::V1)] => 0xF11E,
        add_reg: ADD [R(Reg::V1), R(Reg::V2)] => 0x8124,
        add_imm: ADD [R(Reg::V1), Imm(1)] => 0x7101,
        or: OR [R(Reg::V1), R(Reg::V2)] => 0x8121,
        and: AND [R(Reg::V1), R(Reg::V2)] => 0x8122,
        xor: XOR [R(Reg::V1), R(Reg::V2)] => 0x8123,
        sub: SUB [R(Reg::V1), R(Reg::V2)] => 0x8125,
        subn: SUBN [R(Reg::V1), R(Reg::V2)] => 0x8127,
        shr_one: SHR [R(Reg::V4)] => 0x8406,
        shr_two: SHR [R(Reg::V4), R(Reg::V5)] => 0x8456,
        shl_one: SHL [R(Reg::V4)] => 0x840E,
        shl_two: SHL [R(Reg::V4), R(Reg::V5)] => 0x845E,
        rnd: RND [R(Reg::V10), Imm(0x0F)] => 0xCA0F,
        drw: DRW [R(Reg::V0), R(Reg::V1), Imm(5)] => 0xD015,
        skp: SKP [R(Reg::V14)] => 0xEE9E,
        sknp: SKNP [R(Reg::V14)] => 0xEEA1,
    }

    #[test]
    fn field_bounds() {
        let ld = |v| encode(Mnemonic::LD, &[R(Reg::V0), Imm(v)]);
        assert!(ld(0xFF).is_ok());
        assert!(matches!(ld(0x100), Err(Error::Range { value: 0x100, field: Field::Kk })));
        assert!(matches!(ld(-1), Err(Error::Range { .. })));

        let drw = |v| encode(Mnemonic::DRW, &[R(Reg::V0), R(Reg::V1), Imm(v)]);
        assert!(drw(0xF).is_ok());
        assert!(matches!(drw(0x10), Err(Error::Range { field: Field::Nibble, .. })));

        let jp = |v| encode(Mnemonic::JP, &[Imm(v)]);
        assert!(jp(0xFFF).is_ok());
        assert!(matches!(jp(0x1000), Err(Error::Range { field: Field::Addr, .. })));
    }

    #[test]
    fn invalid_shapes() {
        let err = encode(Mnemonic::ADD, &[Imm(1), R(Reg::V0)]).unwrap_err();
        assert!(matches!(&err, Error::InvalidOperand { mnemonic, kinds } if mnemonic == "ADD" && kinds == "imm, reg"));

        let err = encode(Mnemonic::JP, &[R(Reg::V1), Imm(0x200)]).unwrap_err();
        assert!(matches!(err, Error::InvalidOperand { .. }));

        let err = encode(Mnemonic::LD, &[S(Special::K), R(Reg::V1)]).unwrap_err();
        assert!(matches!(&err, Error::InvalidOperand { kinds, .. } if kinds == "K, reg"));

        assert!(encode(Mnemonic::CLS, &[Imm(0)]).is_err());
        assert!(encode(Mnemonic::SKP, &[]).is_err());
    }

    #[test]
    fn constant_folding() {
        let n = |v| Box::new(Node::NumberLiteral(v));
        let expr = Node::BinaryOp(
            ArithOp::Add,
            n(0x10),
            Box::new(Node::BinaryOp(ArithOp::Mul, n(2), n(4))),
        );
        let args = [Node::reg(Reg::V0), expr];
        assert_eq!(
            operands(Mnemonic::LD, &args).unwrap(),
            vec![R(Reg::V0), Imm(0x18)]
        );

        let modulo = Node::BinaryOp(ArithOp::Mod, n(7), n(3));
        assert_eq!(operands(Mnemonic::LD, &[modulo]).unwrap(), vec![Imm(1)]);

        let div = Node::BinaryOp(ArithOp::Div, n(1), n(0));
        assert!(matches!(operands(Mnemonic::LD, &[div]), Err(Error::DivideByZero)));

        let rem = Node::BinaryOp(ArithOp::Mod, n(1), n(0));
        assert!(matches!(operands(Mnemonic::LD, &[rem]), Err(Error::DivideByZero)));
    }

    #[test]
    fn folding_overflow() {
        let n = |v| Box::new(Node::NumberLiteral(v));
        let mut product = Node::NumberLiteral(0xFFF);
        for _ in 0..6 {
            product = Node::BinaryOp(ArithOp::Mul, Box::new(product), n(0xFFF));
        }
        let err = operands(Mnemonic::JP, &[product]).unwrap_err();
        assert!(matches!(err, Error::ConstantOverflow));
        assert_eq!(err.exit_code(), 9);

        let under = Node::BinaryOp(ArithOp::Sub, n(0), n(1));
        assert_eq!(operands(Mnemonic::JP, &[under]).unwrap(), vec![Imm(-1)]);
    }

    #[test]
    fn non_constant_operand() {
        let expr = Node::binary(ArithOp::Add, Node::reg(Reg::V1), Node::NumberLiteral(1));
        let err = operands(Mnemonic::LD, &[Node::reg(Reg::V0), expr]).unwrap_err();
        assert!(matches!(&err, Error::InvalidOperand { mnemonic, kinds } if mnemonic == "LD" && kinds == "(V1 + 0x1)"));
    }
}
