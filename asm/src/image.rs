#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Data {
    Word(u16),
    Byte(u8),
}

impl Data {
    pub fn size(&self) -> u16 {
        match self {
            Data::Word(_) => 2,
            Data::Byte(_) => 1,
        }
    }
}

/// One laid-out unit of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub addr: u16,
    pub line_idx: usize,
    pub data: Data,
}

/// Program image, loaded at `BASE_ADDR`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    units: Vec<Unit>,
}

impl Image {
    pub fn new(units: Vec<Unit>) -> Self {
        Image { units }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.iter().map(|unit| unit.data.size() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Raw image, words big-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len());
        for unit in &self.units {
            match unit.data {
                Data::Word(word) => bytes.extend_from_slice(&word.to_be_bytes()),
                Data::Byte(byte) => bytes.push(byte),
            }
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_words() {
        let image = Image::new(vec![
            Unit { addr: 0x200, line_idx: 0, data: Data::Word(0x1204) },
            Unit { addr: 0x202, line_idx: 1, data: Data::Byte(0xAA) },
            Unit { addr: 0x203, line_idx: 1, data: Data::Byte(0x00) },
            Unit { addr: 0x204, line_idx: 2, data: Data::Word(0x00E0) },
        ]);
        assert_eq!(image.len(), 6);
        assert_eq!(image.to_bytes(), vec![0x12, 0x04, 0xAA, 0x00, 0x00, 0xE0]);
    }

    #[test]
    fn empty() {
        let image = Image::default();
        assert!(image.is_empty());
        assert!(image.to_bytes().is_empty());
    }
}
