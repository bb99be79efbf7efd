//! Card name catalog backing token and deck validation.

use cardtable_core::CardCatalog;
use std::collections::HashSet;
use std::path::Path;

/// Names this client accepts for tokens and deck lists
#[derive(Debug, Clone, Default)]
pub enum Catalog {
    /// No card database configured: every name is accepted
    #[default]
    Open,
    Names(HashSet<String>),
}

impl Catalog {
    /// One card name per line; blank lines and `#` comments are skipped
    pub fn parse(text: &str) -> Self {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Catalog::Names(names)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> Option<usize> {
        match self {
            Catalog::Open => None,
            Catalog::Names(names) => Some(names.len()),
        }
    }
}

impl CardCatalog for Catalog {
    fn resolve_card(&self, name: &str) -> bool {
        match self {
            Catalog::Open => true,
            Catalog::Names(names) => names.resolve_card(name),
        }
    }
}
