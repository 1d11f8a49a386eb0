//! Label table.
//!
//! Built during the layout pass, before any instruction needing label
//! resolution is finally encoded. Duplicate definitions are first-class
//! diagnostics, not crashes: the first definition wins for address
//! resolution and every later one is reported.

use std::collections::HashMap;

use crate::common::error::AssemblerErrorKind;

/// Mapping from label name to resolved byte address.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    entries: HashMap<String, Definition>,
}

#[derive(Debug, Clone)]
struct Definition {
    addr: u32,
    line: usize,
}

impl LabelTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a label definition.
    ///
    /// # Errors
    ///
    /// `DuplicateLabel` if the name is already defined; the original
    /// definition is kept.
    pub fn define(&mut self, name: &str, addr: u32, line: usize) -> Result<(), AssemblerErrorKind> {
        if let Some(first) = self.entries.get(name) {
            return Err(AssemblerErrorKind::DuplicateLabel {
                label: name.to_owned(),
                first_line: first.line,
            });
        }
        let _ = self.entries.insert(name.to_owned(), Definition { addr, line });
        Ok(())
    }

    /// Resolves a label to its address.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.entries.get(name).map(|d| d.addr)
    }

    /// All labels and addresses, for external observers.
    pub fn to_map(&self) -> HashMap<String, u32> {
        self.entries
            .iter()
            .map(|(name, def)| (name.clone(), def.addr))
            .collect()
    }
}
