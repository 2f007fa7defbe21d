//! Cube labels.
//!
//! A label is a list of named groups (`Instrument`, `BandBin`, ...) holding
//! keyword/value pairs. Keyword and group names match case-insensitively.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One named group of label keywords.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelGroup {
    pub name: String,
    #[serde(default)]
    pub keywords: BTreeMap<String, Value>,
}

impl LabelGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: BTreeMap::new(),
        }
    }

    /// Builder-style keyword insertion
    pub fn with(mut self, keyword: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(keyword.into(), value.into());
        self
    }

    /// Case-insensitive keyword lookup
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(keyword))
            .map(|(_, v)| v)
    }
}

/// Cube label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub groups: Vec<LabelGroup>,
}

impl Label {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group, replacing any group with the same name
    pub fn add_group(&mut self, group: LabelGroup) {
        self.groups
            .retain(|g| !g.name.eq_ignore_ascii_case(&group.name));
        self.groups.push(group);
    }

    pub fn group(&self, name: &str) -> Option<&LabelGroup> {
        self.groups.iter().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// Find a keyword in any group, searching groups in order
    pub fn find_keyword(&self, keyword: &str) -> Option<&Value> {
        self.groups.iter().find_map(|g| g.get(keyword))
    }

    /// Numeric value of a keyword anywhere in the label.
    ///
    /// Arrays yield their first element and numeric strings are parsed.
    pub fn find_f64(&self, keyword: &str) -> Option<f64> {
        self.find_keyword(keyword).and_then(value_as_f64)
    }

    /// Numeric value of a keyword inside a specific group.
    pub fn group_f64(&self, group: &str, keyword: &str) -> Option<f64> {
        self.group(group)
            .and_then(|g| g.get(keyword))
            .and_then(value_as_f64)
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) => items.first().and_then(value_as_f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn sample_label() -> Label {
        let mut label = Label::new();
        label.add_group(
            LabelGroup::new("Instrument")
                .with("SpacecraftName", "MARS_RECONNAISSANCE_ORBITER")
                .with("PhaseAngle", 42.5),
        );
        label.add_group(LabelGroup::new("BandBin").with("Center", json!([0.75, 0.9])));
        label
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let label = sample_label();
        assert!(label.group("bandbin").is_some());
        assert_eq!(label.find_f64("phaseangle"), Some(42.5));
    }

    #[test]
    fn test_array_yields_first_element() {
        let label = sample_label();
        assert_eq!(label.group_f64("BandBin", "Center"), Some(0.75));
    }

    #[test]
    fn test_numeric_strings_parse() {
        let mut label = Label::new();
        label.add_group(LabelGroup::new("Mapping").with("EmissionAngle", " 12.25 "));
        assert_eq!(label.find_f64("EmissionAngle"), Some(12.25));
        assert_eq!(label.find_f64("IncidenceAngle"), None);
    }

    #[test]
    fn test_exponent_strings_parse() {
        let mut label = Label::new();
        label.add_group(LabelGroup::new("BandBin").with("Center", "7.5E-1"));
        let center = label.group_f64("BandBin", "Center").unwrap();
        assert_relative_eq!(center, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_add_group_replaces_existing() {
        let mut label = sample_label();
        label.add_group(LabelGroup::new("BANDBIN").with("Center", 1.5));
        assert_eq!(label.groups.len(), 2);
        assert_eq!(label.group_f64("BandBin", "Center"), Some(1.5));
    }
}
