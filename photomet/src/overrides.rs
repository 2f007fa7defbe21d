//! Inline `NAME=VALUE` parameter overrides.
//!
//! The override string is the highest-precedence parameter source. It is
//! case-folded to uppercase, so parameter names and token values compare
//! without regard to the case the user typed.

use crate::error::ConfigError;
use std::str::FromStr;

/// Parsed override pairs, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineOverrides {
    pairs: Vec<(String, String)>,
}

impl InlineOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an override string such as `"WH=0.52 theta = 30"`.
    ///
    /// `NONE` and the empty string mean no overrides. A later duplicate name
    /// replaces the earlier value.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut normalized = text.to_uppercase().replace('"', "");
        while normalized.contains(" =") || normalized.contains("= ") {
            normalized = normalized.replace(" =", "=").replace("= ", "=");
        }

        let normalized = normalized.trim();
        if normalized.is_empty() || normalized == "NONE" {
            return Ok(Self::new());
        }

        let mut overrides = Self::new();
        for token in normalized.split_whitespace() {
            let parts: Vec<&str> = token.split('=').collect();
            match parts.as_slice() {
                [name, value] if !name.is_empty() && !value.is_empty() => {
                    overrides.insert(name, value);
                }
                _ => {
                    return Err(ConfigError::MalformedOverride {
                        token: token.to_string(),
                    })
                }
            }
        }
        Ok(overrides)
    }

    fn insert(&mut self, name: &str, value: &str) {
        match self.pairs.iter_mut().find(|(n, _)| n == name) {
            Some(pair) => pair.1 = value.to_string(),
            None => self.pairs.push((name.to_string(), value.to_string())),
        }
    }

    /// Value for a parameter, compared case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(n, _)| n.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl FromStr for InlineOverrides {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
