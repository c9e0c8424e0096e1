use crate::reg::Reg;

use color_print::cformat;

/// Concrete CHIP-8 instructions, one variant per opcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    SYS(u16),          // 0nnn
    CLS(),             // 00E0
    RET(),             // 00EE
    JP(u16),           // 1nnn
    CALL(u16),         // 2nnn
    SEI(Reg, u8),      // 3xkk
    SNEI(Reg, u8),     // 4xkk
    SE(Reg, Reg),      // 5xy0
    LDI(Reg, u8),      // 6xkk
    ADDI(Reg, u8),     // 7xkk
    LD(Reg, Reg),      // 8xy0
    OR(Reg, Reg),      // 8xy1
    AND(Reg, Reg),     // 8xy2
    XOR(Reg, Reg),     // 8xy3
    ADD(Reg, Reg),     // 8xy4
    SUB(Reg, Reg),     // 8xy5
    SHR(Reg, Reg),     // 8xy6
    SUBN(Reg, Reg),    // 8xy7
    SHL(Reg, Reg),     // 8xyE
    SNE(Reg, Reg),     // 9xy0
    LDA(u16),          // Annn
    JPV0(u16),         // Bnnn
    RND(Reg, u8),      // Cxkk
    DRW(Reg, Reg, u8), // Dxyn
    SKP(Reg),          // Ex9E
    SKNP(Reg),         // ExA1
    LDVDT(Reg),        // Fx07
    LDK(Reg),          // Fx0A
    LDDT(Reg),         // Fx15
    LDST(Reg),         // Fx18
    ADDA(Reg),         // Fx1E
    LDF(Reg),          // Fx29
    LDB(Reg),          // Fx33
    STORE(Reg),        // Fx55
    LOAD(Reg),         // Fx65
}

impl Inst {
    pub fn to_bin(&self) -> u16 {
        let xy = |op: u16, x: &Reg, y: &Reg, n: u16| op << 12 | x.idx() << 8 | y.idx() << 4 | n;
        let xkk = |op: u16, x: &Reg, kk: &u8| op << 12 | x.idx() << 8 | *kk as u16;
        let nnn = |op: u16, addr: &u16| op << 12 | (addr & 0x0FFF);
        let fx = |x: &Reg, lo: u16| 0xF000 | x.idx() << 8 | lo;
        match self {
            Inst::SYS(addr) => nnn(0x0, addr),
            Inst::CLS() => 0x00E0,
            Inst::RET() => 0x00EE,
            Inst::JP(addr) => nnn(0x1, addr),
            Inst::CALL(addr) => nnn(0x2, addr),
            Inst::SEI(x, kk) => xkk(0x3, x, kk),
            Inst::SNEI(x, kk) => xkk(0x4, x, kk),
            Inst::SE(x, y) => xy(0x5, x, y, 0x0),
            Inst::LDI(x, kk) => xkk(0x6, x, kk),
            Inst::ADDI(x, kk) => xkk(0x7, x, kk),
            Inst::LD(x, y) => xy(0x8, x, y, 0x0),
            Inst::OR(x, y) => xy(0x8, x, y, 0x1),
            Inst::AND(x, y) => xy(0x8, x, y, 0x2),
            Inst::XOR(x, y) => xy(0x8, x, y, 0x3),
            Inst::ADD(x, y) => xy(0x8, x, y, 0x4),
            Inst::SUB(x, y) => xy(0x8, x, y, 0x5),
            Inst::SHR(x, y) => xy(0x8, x, y, 0x6),
            Inst::SUBN(x, y) => xy(0x8, x, y, 0x7),
            Inst::SHL(x, y) => xy(0x8, x, y, 0xE),
            Inst::SNE(x, y) => xy(0x9, x, y, 0x0),
            Inst::LDA(addr) => nnn(0xA, addr),
            Inst::JPV0(addr) => nnn(0xB, addr),
            Inst::RND(x, kk) => xkk(0xC, x, kk),
            Inst::DRW(x, y, n) => xy(0xD, x, y, (*n & 0xF) as u16),
            Inst::SKP(x) => 0xE000 | x.idx() << 8 | 0x9E,
            Inst::SKNP(x) => 0xE000 | x.idx() << 8 | 0xA1,
            Inst::LDVDT(x) => fx(x, 0x07),
            Inst::LDK(x) => fx(x, 0x0A),
            Inst::LDDT(x) => fx(x, 0x15),
            Inst::LDST(x) => fx(x, 0x18),
            Inst::ADDA(x) => fx(x, 0x1E),
            Inst::LDF(x) => fx(x, 0x29),
            Inst::LDB(x) => fx(x, 0x33),
            Inst::STORE(x) => fx(x, 0x55),
            Inst::LOAD(x) => fx(x, 0x65),
        }
    }

    /// Decode a 16-bit word. Words that are not a valid opcode give `None`.
    pub fn from_bin(bin: u16) -> Option<Inst> {
        let reg = |nibble: u16| Reg::try_from((nibble & 0xF) as u8).ok();
        let x = reg(bin >> 8)?;
        let y = reg(bin >> 4)?;
        let n = (bin & 0x000F) as u8;
        let kk = (bin & 0x00FF) as u8;
        let addr = bin & 0x0FFF;
        let inst = match bin >> 12 {
            0x0 => match bin {
                0x00E0 => Inst::CLS(),
                0x00EE => Inst::RET(),
                _ => Inst::SYS(addr),
            },
            0x1 => Inst::JP(addr),
            0x2 => Inst::CALL(addr),
            0x3 => Inst::SEI(x, kk),
            0x4 => Inst::SNEI(x, kk),
            0x5 if n == 0 => Inst::SE(x, y),
            0x6 => Inst::LDI(x, kk),
            0x7 => Inst::ADDI(x, kk),
            0x8 => match n {
                0x0 => Inst::LD(x, y),
                0x1 => Inst::OR(x, y),
                0x2 => Inst::AND(x, y),
                0x3 => Inst::XOR(x, y),
                0x4 => Inst::ADD(x, y),
                0x5 => Inst::SUB(x, y),
                0x6 => Inst::SHR(x, y),
                0x7 => Inst::SUBN(x, y),
                0xE => Inst::SHL(x, y),
                _ => return None,
            },
            0x9 if n == 0 => Inst::SNE(x, y),
            0xA => Inst::LDA(addr),
            0xB => Inst::JPV0(addr),
            0xC => Inst::RND(x, kk),
            0xD => Inst::DRW(x, y, n),
            0xE => match kk {
                0x9E => Inst::SKP(x),
                0xA1 => Inst::SKNP(x),
                _ => return None,
            },
            0xF => match kk {
                0x07 => Inst::LDVDT(x),
                0x0A => Inst::LDK(x),
                0x15 => Inst::LDDT(x),
                0x18 => Inst::LDST(x),
                0x1E => Inst::ADDA(x),
                0x29 => Inst::LDF(x),
                0x33 => Inst::LDB(x),
                0x55 => Inst::STORE(x),
                0x65 => Inst::LOAD(x),
                _ => return None,
            },
            _ => return None,
        };
        Some(inst)
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        macro_rules! ops {
            ($name:expr) => {
                cformat!("<r>{:<5}</>", $name)
            };
            ($name:expr, $a:expr) => {
                cformat!("<r>{:<5}</><b>{}</>", $name, $a)
            };
            ($name:expr, $a:expr, $b:expr) => {
                cformat!("<r>{:<5}</><b>{}, {}</>", $name, $a, $b)
            };
        }
        let addr = |a: &u16| cformat!("<y>0x{:03X}</>", a);
        let imm = |kk: &u8| cformat!("<y>0x{:02X}</>", kk);

        match self {
            Inst::SYS(a) => ops!("sys", addr(a)),
            Inst::CLS() => ops!("cls"),
            Inst::RET() => ops!("ret"),
            Inst::JP(a) => ops!("jp", addr(a)),
            Inst::CALL(a) => ops!("call", addr(a)),
            Inst::SEI(x, kk) => ops!("se", x, imm(kk)),
            Inst::SNEI(x, kk) => ops!("sne", x, imm(kk)),
            Inst::SE(x, y) => ops!("se", x, y),
            Inst::LDI(x, kk) => ops!("ld", x, imm(kk)),
            Inst::ADDI(x, kk) => ops!("add", x, imm(kk)),
            Inst::LD(x, y) => ops!("ld", x, y),
            Inst::OR(x, y) => ops!("or", x, y),
            Inst::AND(x, y) => ops!("and", x, y),
            Inst::XOR(x, y) => ops!("xor", x, y),
            Inst::ADD(x, y) => ops!("add", x, y),
            Inst::SUB(x, y) => ops!("sub", x, y),
            Inst::SHR(x, y) => ops!("shr", x, y),
            Inst::SUBN(x, y) => ops!("subn", x, y),
            Inst::SHL(x, y) => ops!("shl", x, y),
            Inst::SNE(x, y) => ops!("sne", x, y),
            Inst::LDA(a) => ops!("ld", "I", addr(a)),
            Inst::JPV0(a) => ops!("jp", "V0", addr(a)),
            Inst::RND(x, kk) => ops!("rnd", x, imm(kk)),
            Inst::DRW(x, y, n) => {
                cformat!("<r>{:<5}</><b>{}, {}, <y>0x{:X}</></>", "drw", x, y, n)
            }
            Inst::SKP(x) => ops!("skp", x),
            Inst::SKNP(x) => ops!("sknp", x),
            Inst::LDVDT(x) => ops!("ld", x, "DT"),
            Inst::LDK(x) => ops!("ld", x, "K"),
            Inst::LDDT(x) => ops!("ld", "DT", x),
            Inst::LDST(x) => ops!("ld", "ST", x),
            Inst::ADDA(x) => ops!("add", "I", x),
            Inst::LDF(x) => ops!("ld", "F", x),
            Inst::LDB(x) => ops!("ld", "B", x),
            Inst::STORE(x) => ops!("ld", "[I]", x),
            Inst::LOAD(x) => ops!("ld", x, "[I]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Reg::*;

    macro_rules! test_inst {
        ($($name:ident: $inst:expr => $bin:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let inst = $inst;
                    assert_eq!(inst.to_bin(), $bin, "{:?}", inst);
                    assert_eq!(Inst::from_bin($bin), Some(inst));
                }
            )*
        }
    }

    test_inst! {
        test_sys: Inst::SYS(0x123) => 0x0123,
        test_cls: Inst::CLS() => 0x00E0,
        test_ret: Inst::RET() => 0x00EE,
        test_jp: Inst::JP(0x204) => 0x1204,
        test_call: Inst::CALL(0x2F0) => 0x22F0,
        test_sei: Inst::SEI(V3, 0x42) => 0x3342,
        test_snei: Inst::SNEI(V4, 0xFF) => 0x44FF,
        test_se: Inst::SE(V1, V2) => 0x5120,
        test_ldi: Inst::LDI(V0, 0x10) => 0x6010,
        test_addi: Inst::ADDI(V15, 0x01) => 0x7F01,
        test_ld: Inst::LD(V10, V11) => 0x8AB0,
        test_or: Inst::OR(V1, V2) => 0x8121,
        test_and: Inst::AND(V1, V2) => 0x8122,
        test_xor: Inst::XOR(V1, V2) => 0x8123,
        test_add: Inst::ADD(V1, V2) => 0x8124,
        test_sub: Inst::SUB(V1, V2) => 0x8125,
        test_shr: Inst::SHR(V1, V0) => 0x8106,
        test_subn: Inst::SUBN(V1, V2) => 0x8127,
        test_shl: Inst::SHL(V1, V2) => 0x812E,
        test_sne: Inst::SNE(V5, V6) => 0x9560,
        test_lda: Inst::LDA(0x300) => 0xA300,
        test_jpv0: Inst::JPV0(0x210) => 0xB210,
        test_rnd: Inst::RND(V2, 0x0F) => 0xC20F,
        test_drw: Inst::DRW(V1, V2, 5) => 0xD125,
        test_skp: Inst::SKP(V7) => 0xE79E,
        test_sknp: Inst::SKNP(V7) => 0xE7A1,
        test_ldvdt: Inst::LDVDT(V3) => 0xF307,
        test_ldk: Inst::LDK(V3) => 0xF30A,
        test_lddt: Inst::LDDT(V3) => 0xF315,
        test_ldst: Inst::LDST(V3) => 0xF318,
        test_adda: Inst::ADDA(V3) => 0xF31E,
        test_ldf: Inst::LDF(V3) => 0xF329,
        test_ldb: Inst::LDB(V3) => 0xF333,
        test_store: Inst::STORE(V3) => 0xF355,
        test_load: Inst::LOAD(V3) => 0xF365,
    }

    #[test]
    fn invalid_words() {
        assert_eq!(Inst::from_bin(0x5121), None);
        assert_eq!(Inst::from_bin(0x8128), None);
        assert_eq!(Inst::from_bin(0xE100), None);
        assert_eq!(Inst::from_bin(0xF1FF), None);
    }
}
