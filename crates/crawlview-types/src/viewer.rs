use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a detail field's value is rendered.
///
/// The set is closed: documents naming any other format are rejected when
/// the configuration is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    #[default]
    Plain,
    Departments,
    Email,
    Date,
    Url,
}

/// Number of department lines shown before the rest is collapsed
pub const DEFAULT_COLLAPSE_AFTER: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub label: String,
    pub key: String,
    #[serde(default, alias = "fallback_keys")]
    pub fallback_keys: Vec<String>,
    #[serde(default)]
    pub format: FieldFormat,
    #[serde(
        default,
        alias = "collapse_after",
        skip_serializing_if = "Option::is_none"
    )]
    pub collapse_after: Option<usize>,
}

impl FieldDescriptor {
    pub fn new(label: impl Into<String>, key: impl Into<String>, format: FieldFormat) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
            fallback_keys: Vec::new(),
            format,
            collapse_after: None,
        }
    }

    pub fn with_fallbacks<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Primary key followed by fallbacks, in lookup order
    pub fn lookup_keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key.as_str()).chain(self.fallback_keys.iter().map(String::as_str))
    }

    pub fn collapse_after(&self) -> usize {
        self.collapse_after.unwrap_or(DEFAULT_COLLAPSE_AFTER)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFields {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

/// Declarative schema mapping source name to the metadata fields to surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub defaults: SourceFields,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceFields>,
}

impl ViewerConfig {
    /// Parse and validate a viewer configuration document
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        validate_fields("defaults", &self.defaults.fields)?;
        for (name, fields) in &self.sources {
            if name.trim().is_empty() {
                return Err(Error::InvalidConfig("empty source name".to_string()));
            }
            validate_fields(&format!("sources.{}", name), &fields.fields)?;
        }
        Ok(())
    }

    /// Field list for a source, falling back to the default list when the
    /// source has no (or an empty) entry.
    pub fn fields_for(&self, source: &str) -> &[FieldDescriptor] {
        match self.sources.get(source) {
            Some(entry) if !entry.fields.is_empty() => &entry.fields,
            _ => &self.defaults.fields,
        }
    }
}

fn validate_fields(scope: &str, fields: &[FieldDescriptor]) -> Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if field.label.trim().is_empty() {
            return Err(Error::InvalidConfig(format!(
                "{}.fields[{}]: label must not be empty",
                scope, i
            )));
        }
        if field.key.trim().is_empty() {
            return Err(Error::InvalidConfig(format!(
                "{}.fields[{}]: key must not be empty",
                scope, i
            )));
        }
        if field.collapse_after == Some(0) {
            return Err(Error::InvalidConfig(format!(
                "{}.fields[{}]: collapseAfter must be at least 1",
                scope, i
            )));
        }
    }
    Ok(())
}
