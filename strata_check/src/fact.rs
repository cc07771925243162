// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named diagnostic facts.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// One `key: value` line of failure diagnostics.
///
/// A fact with an empty value is a bare label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fact {
    /// What the value describes.
    pub key: String,
    /// The observed or expected value, rendered for humans.
    pub value: String,
}

impl Fact {
    /// Creates a fact.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }

    /// Creates a fact with no value.
    #[must_use]
    pub fn label(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: String::new(),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            f.write_str(&self.key)
        } else {
            write!(f, "{}: {}", self.key, self.value)
        }
    }
}

/// Joins names with `", "` for fact values.
pub(crate) fn join(names: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    let parts: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
    parts.join(", ")
}

/// Writes facts one per line, indented.
pub(crate) fn write_facts(f: &mut fmt::Formatter<'_>, facts: &[Fact]) -> fmt::Result {
    for fact in facts {
        writeln!(f, "    {fact}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_value() {
        assert_eq!(Fact::new("Could not find", "StatusBar").to_string(), "Could not find: StatusBar");
        assert_eq!(Fact::label("Entry should be empty").to_string(), "Entry should be empty");
    }

    #[test]
    fn join_uses_comma_space() {
        assert_eq!(join(["a", "b", "c"]), "a, b, c");
        assert_eq!(join(Vec::<String>::new()), "");
    }
}
