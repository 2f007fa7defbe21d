//! Structured model-configuration documents.
//!
//! A document holds one object per model kind (`PhotometricModel`,
//! `NormalizationModel`, `AtmosphericModel`). Each object carries a list of
//! `Algorithm` definitions, and each definition is an ordered set of
//! `KEYWORD = value` pairs, for example:
//!
//! ```json
//! {
//!   "NormalizationModel": {
//!     "Algorithm": [
//!       { "NORMNAME": "ALBEDO", "INCREF": "30", "THRESH": "30", "ALBEDO": "0.5" }
//!     ]
//!   }
//! }
//! ```
//!
//! Keyword order survives a load/save cycle. Values are held as strings;
//! numbers and booleans are accepted on input and written back as strings.

use crate::catalog::{self, ModelKind};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Configuration I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// One model definition: ordered keyword/value pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlgorithmGroup {
    keywords: Vec<(String, String)>,
}

impl AlgorithmGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style keyword insertion
    pub fn with(mut self, keyword: &str, value: impl Into<String>) -> Self {
        self.set(keyword, value);
        self
    }

    /// Case-insensitive keyword lookup
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(keyword))
            .map(|(_, v)| v.as_str())
    }

    /// Set a keyword, replacing an existing value in place
    pub fn set(&mut self, keyword: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .keywords
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(keyword))
        {
            Some(entry) => entry.1 = value,
            None => self.keywords.push((keyword.to_string(), value)),
        }
    }

    pub fn keywords(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keywords.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether the group carries the kind's name keyword or `NAME`
    pub fn has_name_keyword(&self, kind: ModelKind) -> bool {
        self.get(kind.name_keyword()).is_some() || self.get("NAME").is_some()
    }

    /// Model name from the kind's name keyword, falling back to `NAME`.
    ///
    /// A group named `NONE` or `FROMPVL` counts as unnamed.
    pub fn model_name(&self, kind: ModelKind) -> Option<&str> {
        [kind.name_keyword(), "NAME"]
            .into_iter()
            .filter_map(|k| self.get(k))
            .map(str::trim)
            .find(|name| !name.is_empty())
            .filter(|name| !catalog::is_sentinel(name))
    }
}

impl Serialize for AlgorithmGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keywords.len()))?;
        for (k, v) in &self.keywords {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AlgorithmGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AlgorithmGroupVisitor)
    }
}

struct AlgorithmGroupVisitor;

impl<'de> Visitor<'de> for AlgorithmGroupVisitor {
    type Value = AlgorithmGroup;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of keyword to string, number or boolean")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut group = AlgorithmGroup::new();
        while let Some((keyword, value)) = access.next_entry::<String, Value>()? {
            let text = keyword_text(&value).ok_or_else(|| {
                serde::de::Error::custom(format!("unsupported value for keyword {keyword}"))
            })?;
            group.set(&keyword, text);
        }
        Ok(group)
    }
}

fn keyword_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Value::Array(items) => items
            .iter()
            .map(keyword_text)
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(",")),
        Value::Null | Value::Object(_) => None,
    }
}

/// All definitions of one model kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigObject {
    #[serde(rename = "Algorithm", default)]
    pub algorithms: Vec<AlgorithmGroup>,
}

/// Model-configuration document, keyed by object name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    objects: BTreeMap<String, ConfigObject>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, kind: ModelKind) -> Option<&ConfigObject> {
        self.objects
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(kind.object_name()))
            .map(|(_, obj)| obj)
    }

    /// Definitions for a kind in document order; empty when the object is absent
    pub fn definitions(&self, kind: ModelKind) -> &[AlgorithmGroup] {
        self.object(kind)
            .map(|obj| obj.algorithms.as_slice())
            .unwrap_or(&[])
    }

    pub fn add_definition(&mut self, kind: ModelKind, group: AlgorithmGroup) {
        self.objects
            .entry(kind.object_name().to_string())
            .or_default()
            .algorithms
            .push(group);
    }

    pub fn is_empty(&self) -> bool {
        self.objects.values().all(|obj| obj.algorithms.is_empty())
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), DocumentError> {
        let json = self.to_json_string()?;
        std::fs::write(path, json).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, DocumentError> {
        let json = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let doc = Self::from_json_str(&json)?;
        log::debug!(
            "Loaded configuration with {} object(s) from {}",
            doc.objects.len(),
            path.display()
        );
        Ok(doc)
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, object) in &self.objects {
            writeln!(f, "Object = {name}")?;
            for group in &object.algorithms {
                writeln!(f, "  Group = Algorithm")?;
                for (k, v) in group.keywords() {
                    writeln!(f, "    {k} = {v}")?;
                }
                writeln!(f, "  End_Group")?;
            }
            writeln!(f, "End_Object")?;
        }
        write!(f, "End")
    }
}
