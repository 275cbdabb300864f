//! # Composite Record Values
//!
//! [`Record`] is the materialized form of a record node: an ordered list of
//! `(name, value)` fields, append-only during construction, with both
//! position- and name-based access over the same backing store. Field order
//! is the schema's field order after unavailable and hidden fields have
//! been skipped.
//!
//! The `Display` form is a one-line-per-field structure dump:
//!
//! ```text
//!                              dsr:record (12 fields)
//!                      temperature:[5x7 double]
//!                          station:"NL-0034"
//!                            count:42
//! ```

use hashbrown::HashMap;

use crate::error::{Error, Result};
use crate::value::Value;

/// Ordered name-to-value container produced for record nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Record {
        Record::default()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Appends a field. Field names are schema-unique, so a duplicate name
    /// here is an upstream bug; it is not defended against beyond a debug
    /// assertion.
    pub fn append(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        debug_assert!(
            !self.index.contains_key(&name),
            "duplicate record field '{name}'"
        );
        self.index.insert(name.clone(), self.fields.len());
        self.fields.push((name, value));
    }

    /// Returns the field with the given name.
    pub fn get(&self, name: &str) -> Result<&Value> {
        match self.index.get(name) {
            Some(&i) => Ok(&self.fields[i].1),
            None => Err(Error::NotFound {
                name: name.to_owned(),
            }),
        }
    }

    /// Returns the field at the given position. Negative positions count
    /// from the end, so `-1` is the last field.
    pub fn at(&self, index: i64) -> Result<&Value> {
        let n = self.fields.len() as i64;
        let effective = if index < 0 { index + n } else { index };
        if effective < 0 || effective >= n {
            return Err(Error::IndexOutOfRange { index, size: n });
        }
        Ok(&self.fields[effective as usize].1)
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Multi-line structure dump: padded field name, then a short per-kind
/// rendering (nested records and arrays are summarized, not expanded).
impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, value) in &self.fields {
            write!(f, "{name:>32}:")?;
            match value {
                Value::Record(r) => writeln!(f, "record ({} fields)", r.len())?,
                Value::Array(a) => writeln!(f, "{a}")?,
                Value::Text(s) => writeln!(f, "\"{s}\"")?,
                Value::Char(c) => writeln!(f, "\"{c}\"")?,
                other => writeln!(f, "{other}")?,
            }
        }
        Ok(())
    }
}
