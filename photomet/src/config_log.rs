//! Audit log of the parameters a run actually used.
//!
//! One group per resolved model, named `<Kind>ModelParametersUsed`, holding the
//! name keyword followed by every parameter in declared order. The log renders
//! as keyword text for humans and converts back into a [`ConfigDocument`] that
//! reproduces the same models when fed in as a prior configuration.

use crate::catalog::ModelKind;
use crate::document::{AlgorithmGroup, ConfigDocument};
use crate::resolver::ModelSpec;
use std::fmt;
use std::path::Path;

/// Parameters used by one model.
#[derive(Debug, Clone, PartialEq)]
pub struct LogGroup {
    pub kind: ModelKind,
    pub keywords: Vec<(String, String)>,
}

impl LogGroup {
    pub fn name(&self) -> &'static str {
        self.kind.log_group()
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(keyword))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLog {
    groups: Vec<LogGroup>,
}

impl ConfigLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the group for a resolved model
    pub fn record(&mut self, spec: &ModelSpec) {
        let mut keywords = Vec::with_capacity(spec.parameters.len() + 1);
        keywords.push((spec.kind.name_keyword().to_string(), spec.name.clone()));
        keywords.extend(spec.parameters.iter().cloned());
        self.groups.push(LogGroup {
            kind: spec.kind,
            keywords,
        });
    }

    pub fn groups(&self) -> &[LogGroup] {
        &self.groups
    }

    pub fn group(&self, kind: ModelKind) -> Option<&LogGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }

    /// Emit every line of the rendered log at info level
    pub fn log_info(&self) {
        for line in self.to_string().lines() {
            log::info!("{line}");
        }
    }

    /// Document reproducing the logged models as a prior configuration
    pub fn to_document(&self) -> ConfigDocument {
        let mut doc = ConfigDocument::new();
        for group in &self.groups {
            let mut def = AlgorithmGroup::new();
            for (k, v) in &group.keywords {
                def.set(k, v.clone());
            }
            doc.add_definition(group.kind, def);
        }
        doc
    }

    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, format!("{self}\n"))
    }
}

impl fmt::Display for ConfigLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let width = group.keywords.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            writeln!(f, "Group = {}", group.name())?;
            for (k, v) in &group.keywords {
                writeln!(f, "  {k:<width$} = {v}")?;
            }
            write!(f, "End_Group")?;
        }
        Ok(())
    }
}
