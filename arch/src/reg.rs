use bimap::BiMap;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use once_cell::sync::Lazy;
use std::fmt::Display;

/// General purpose registers `V0`..`V15`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive,
)]
#[repr(u8)]
pub enum Reg {
    V0,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
    V10,
    V11,
    V12,
    V13,
    V14,
    V15,
}

impl Reg {
    /// `V` followed by one or two decimal digits naming 0..=15.
    pub fn parse(s: &str) -> Option<Reg> {
        let digits = s.strip_prefix(['V', 'v'])?;
        if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let idx: u8 = digits.parse().ok()?;
        Reg::try_from(idx).ok()
    }

    pub fn idx(self) -> u16 {
        u8::from(self) as u16
    }
}

impl Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "V{}", u8::from(*self))
    }
}

/// Registers and operands with a fixed spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    I,      // address register
    Mem,    // [I], memory at I
    DT,     // delay timer
    ST,     // sound timer
    F,      // font sprite location
    K,      // key press
    B,      // BCD store
}

static SPECIAL_MAP: Lazy<BiMap<&'static str, Special>> = Lazy::new(|| {
    let mut map: BiMap<&'static str, Special> = BiMap::new();
    map.insert("I", Special::I);
    map.insert("[I]", Special::Mem);
    map.insert("DT", Special::DT);
    map.insert("ST", Special::ST);
    map.insert("F", Special::F);
    map.insert("K", Special::K);
    map.insert("B", Special::B);
    map
});

impl Special {
    pub fn parse(s: &str) -> Option<Special> {
        SPECIAL_MAP.get_by_left(s.to_ascii_uppercase().as_str()).copied()
    }

    pub fn format(&self) -> &'static str {
        SPECIAL_MAP.get_by_right(self).copied().unwrap_or("?")
    }
}

impl Display for Special {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}
