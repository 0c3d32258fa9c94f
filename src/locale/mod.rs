//! Message catalog lookup for player-facing text
//!
//! Catalogs are JSON objects, nested by dotted key segment:
//! `battle.reason.walls_breached` is found under
//! `{"battle": {"reason": {"walls_breached": "..."}}}`. A flat entry with the
//! full dotted key also matches. Placeholders are written `{name}`.

use std::path::Path;

use serde_json::Value;

use crate::core::error::{BattleError, Result};

pub const BUILTIN_EN_CATALOG: &str = include_str!("../../data/locales/en.json");

/// Anything that can turn a message key into display text
pub trait Translate {
    /// Look up `key` and substitute `params`. Unknown keys come back as-is.
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// JSON-backed localizer
#[derive(Debug, Clone)]
pub struct Localizer {
    lang: String,
    catalog: Value,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Localizer {
    /// The embedded English catalog
    pub fn english() -> Self {
        let catalog = serde_json::from_str(BUILTIN_EN_CATALOG).unwrap_or(Value::Null);
        Self {
            lang: "en".to_string(),
            catalog,
        }
    }

    pub fn from_json_str(lang: impl Into<String>, json: &str) -> Result<Self> {
        let catalog: Value = serde_json::from_str(json)?;
        if !catalog.is_object() {
            return Err(BattleError::Config(
                "locale catalog must be a JSON object".to_string(),
            ));
        }
        Ok(Self {
            lang: lang.into(),
            catalog,
        })
    }

    /// Load `<dir>/<lang>.json`
    pub fn load(dir: impl AsRef<Path>, lang: &str) -> Result<Self> {
        let path = dir.as_ref().join(format!("{lang}.json"));
        let contents = std::fs::read_to_string(&path)?;
        Self::from_json_str(lang, &contents)
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        if let Some(text) = self.catalog.get(key).and_then(Value::as_str) {
            return Some(text);
        }
        key.split('.')
            .try_fold(&self.catalog, |node, part| node.get(part))
            .and_then(Value::as_str)
    }
}

impl Translate for Localizer {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        let Some(template) = self.lookup(key) else {
            return key.to_string();
        };
        params
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}
