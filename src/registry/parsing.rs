//! YAML raw structures and default application.
//!
//! Raw groups may omit `prefix`/`postfix`; registry-level defaults fill the
//! gaps before the public model is built. Generation itself never reads
//! files — the loader consumes a string the caller obtained elsewhere.

use super::models::{ExtensionGroup, FunctionSpec, Registry};
use crate::error::{GenError, Result};
use serde::Deserialize;

pub(crate) const DEFAULT_PREFIX: &str = "GL";

/// Registry-level defaults applied to groups that omit the field.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct RegistryDefaults {
    #[serde(default)]
    pub(crate) prefix: Option<String>,
    #[serde(default)]
    pub(crate) postfix: Option<String>,
}

/// Raw group definition (fields can be absent to inherit defaults).
#[derive(Debug, Deserialize)]
pub(crate) struct RawExtensionGroup {
    #[serde(alias = "template")]
    pub(crate) template_name: String,
    #[serde(default)]
    pub(crate) prefix: Option<String>,
    #[serde(default)]
    pub(crate) postfix: Option<String>,
    #[serde(default)]
    pub(crate) functions: Vec<FunctionSpec>,
}

/// YAML file structure.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRegistry {
    #[serde(default)]
    pub(crate) defaults: RegistryDefaults,
    #[serde(default, alias = "extensions")]
    pub(crate) groups: Vec<RawExtensionGroup>,
}

pub(crate) fn apply_group_defaults(
    raw: RawExtensionGroup,
    defaults: &RegistryDefaults,
) -> ExtensionGroup {
    ExtensionGroup {
        template_name: raw.template_name,
        prefix: raw
            .prefix
            .or_else(|| defaults.prefix.clone())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        postfix: raw.postfix.or_else(|| defaults.postfix.clone()).unwrap_or_default(),
        functions: raw.functions,
    }
}

pub(crate) fn registry_from_yaml(source: &str) -> Result<Registry> {
    let raw: RawRegistry =
        serde_yaml::from_str(source).map_err(|e| GenError::registry_load(e.to_string()))?;
    let groups = raw
        .groups
        .into_iter()
        .map(|g| apply_group_defaults(g, &raw.defaults))
        .collect();
    Ok(Registry::new(groups))
}
