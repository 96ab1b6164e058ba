//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Terminal capability database.
//!
//! Maps a terminal family name to the escape sequence templates used to drive it. The source
//! format is a subset of terminfo source: one entry per family, a `name|alias|description,`
//! header line followed by indented `cap=value,`, `cap#number,`, `cap,` and `cap@,` fields,
//! with `use=other,` inheriting from another entry.

mod builtin;
mod format;
mod parser;

pub use self::format::expand;

use crate::{TerminalError, TerminalResult};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::error;

/// A single capability value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Boolean capability that is present
    Flag,
    /// Numeric capability
    Number(u32),
    /// String capability, escapes already decoded
    String(Vec<u8>),
}

/// One terminal family and its resolved capabilities.
#[derive(Clone, Debug)]
pub struct TerminalEntry {
    names: Vec<String>,
    description: String,
    capabilities: HashMap<String, Capability>,
}

impl TerminalEntry {
    /// Canonical family name.
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    /// Alternative names this entry answers to.
    pub fn aliases(&self) -> &[String] {
        &self.names[1..]
    }

    /// Human readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Raw capability value.
    pub fn get(&self, capability: &str) -> Option<&Capability> {
        self.capabilities.get(capability)
    }

    /// String capability bytes.
    pub fn string(&self, capability: &str) -> Option<&[u8]> {
        match self.capabilities.get(capability) {
            Some(Capability::String(value)) => Some(value),
            _ => None,
        }
    }

    /// Numeric capability.
    pub fn number(&self, capability: &str) -> Option<u32> {
        match self.capabilities.get(capability) {
            Some(Capability::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Whether a boolean capability is present.
    pub fn flag(&self, capability: &str) -> bool {
        matches!(self.capabilities.get(capability), Some(Capability::Flag))
    }

    /// Expands a string capability with `params`.
    pub fn format(&self, capability: &str, params: &[i32]) -> TerminalResult<Vec<u8>> {
        let template = self
            .string(capability)
            .ok_or_else(|| TerminalError::MissingCapability {
                family: self.name().to_string(),
                capability: capability.to_string(),
            })?;
        expand(capability, template, params)
    }
}

/// Read-only set of terminal descriptions, shared between connections.
#[derive(Clone, Debug, Default)]
pub struct CapabilityDatabase {
    entries: Vec<TerminalEntry>,
    index: HashMap<String, usize>,
}

impl CapabilityDatabase {
    /// Parses terminfo-style source text.
    pub fn parse(source: &str) -> TerminalResult<Self> {
        let raw = parser::parse_entries(source)?;
        let entries = parser::resolve(&raw)?;
        let mut index = HashMap::new();
        for (position, entry) in entries.iter().enumerate() {
            for name in &entry.names {
                index.entry(name.clone()).or_insert(position);
            }
        }
        Ok(CapabilityDatabase { entries, index })
    }

    /// The built-in families, parsed once per process.
    pub fn builtin() -> Arc<CapabilityDatabase> {
        static BUILTIN: OnceLock<Arc<CapabilityDatabase>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                Arc::new(CapabilityDatabase::parse(builtin::SOURCE).unwrap_or_else(|err| {
                    error!(%err, "built-in capability database is invalid");
                    CapabilityDatabase::default()
                }))
            })
            .clone()
    }

    /// Finds a family by name or alias, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&TerminalEntry> {
        let index = match self.index.get(name) {
            Some(index) => *index,
            None => *self.index.get(&name.to_ascii_lowercase())?,
        };
        self.entries.get(index)
    }

    /// Whether a family is known.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All entries in source order.
    pub fn entries(&self) -> impl Iterator<Item = &TerminalEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the database has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
