use crate::error::Error;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub line: usize,        // 0-based line of the definition
    pub addr: Option<u16>,  // None until the next unit is laid out
}

/// Label name -> definition, in definition order.
#[derive(Debug, Clone, Default)]
pub struct Labels(IndexMap<String, Label>);

impl Labels {
    pub fn new() -> Self {
        Labels(IndexMap::new())
    }

    pub fn define(&mut self, name: &str, line: usize) -> Result<(), Error> {
        if let Some(prev) = self.0.get(name) {
            return Err(Error::DuplicateLabel {
                name: name.to_string(),
                prev: prev.line,
            });
        }
        self.0.insert(name.to_string(), Label { line, addr: None });
        Ok(())
    }

    /// Set the address of a defined label.
    pub fn bind(&mut self, name: &str, addr: u16) {
        if let Some(label) = self.0.get_mut(name) {
            label.addr = Some(addr);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Label> {
        self.0.get(name)
    }

    pub fn get_val(&self, name: &str) -> Result<u16, Error> {
        self.0
            .get(name)
            .and_then(|label| label.addr)
            .ok_or_else(|| Error::UnresolvedLabel(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Label)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
