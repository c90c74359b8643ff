//! Extension groups, function specs and their derived naming.

use crate::binding::BindingConfig;
use crate::error::{GenError, Result};
use regex::Regex;
use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;
use std::sync::LazyLock;

/// Vendor prefix of a standard extension template name, e.g. `ARB` in
/// `ARB_texture_storage`.
static VENDOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-Z]+)_\w+$").expect("valid regex"));

const KHRONOS_REGISTRY: &str = "https://www.khronos.org/registry/OpenGL/extensions";

/// A dependency reference attached to a function. Either a literal extension
/// name whose presence in the supported set gates the function, or the name
/// of a pre-computed boolean predicate defined by the binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependsOn {
    Extension(String),
    Predicate(String),
}

impl<'de> Deserialize<'de> for DependsOn {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Externally tagged via a single-entry map (`extension:` / `predicate:`),
        // as mandated by the spec. serde's default externally-tagged enum
        // representation renders as a YAML `!tag` under serde_yaml, so the map
        // form is decoded through this intermediate struct.
        #[derive(Deserialize)]
        struct DependsOnRaw {
            #[serde(default)]
            extension: Option<String>,
            #[serde(default)]
            predicate: Option<String>,
        }

        let raw = DependsOnRaw::deserialize(deserializer)?;
        match (raw.extension, raw.predicate) {
            (Some(name), None) => Ok(DependsOn::Extension(name)),
            (None, Some(name)) => Ok(DependsOn::Predicate(name)),
            (Some(_), Some(_)) => Err(DeError::custom(
                "depends_on accepts exactly one of `extension` or `predicate`",
            )),
            (None, None) => Err(DeError::custom(
                "depends_on requires one of `extension` or `predicate`",
            )),
        }
    }
}

/// One callable function in an extension group.
///
/// `reuse` marks an alias of an entry point owned by another group; such
/// functions receive no ordinal and never participate in capability checks.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    /// Native symbol handed to the function provider; defaults to `name`.
    #[serde(default, alias = "native")]
    pub native_name: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub ignore_missing: bool,
    #[serde(default, alias = "depends")]
    pub depends_on: Option<DependsOn>,
    #[serde(default)]
    pub reuse: bool,
}

impl FunctionSpec {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            native_name: None,
            deprecated: false,
            ignore_missing: false,
            depends_on: None,
            reuse: false,
        }
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn ignore_missing(mut self) -> Self {
        self.ignore_missing = true;
        self
    }

    pub fn reuse(mut self) -> Self {
        self.reuse = true;
        self
    }

    pub fn depends_on_extension<S: Into<String>>(mut self, name: S) -> Self {
        self.depends_on = Some(DependsOn::Extension(name.into()));
        self
    }

    pub fn depends_on_predicate<S: Into<String>>(mut self, name: S) -> Self {
        self.depends_on = Some(DependsOn::Predicate(name.into()));
        self
    }

    /// The symbol looked up from the function provider.
    pub fn symbol(&self) -> &str {
        self.native_name.as_deref().unwrap_or(&self.name)
    }
}

/// A named, independently-optional bundle of related functions.
#[derive(Debug, Clone)]
pub struct ExtensionGroup {
    pub template_name: String,
    pub prefix: String,
    pub postfix: String,
    pub functions: Vec<FunctionSpec>,
}

impl ExtensionGroup {
    pub fn new<S: Into<String>>(template_name: S) -> Self {
        Self {
            template_name: template_name.into(),
            prefix: super::parsing::DEFAULT_PREFIX.to_string(),
            postfix: String::new(),
            functions: Vec::new(),
        }
    }

    pub fn with_functions(mut self, functions: Vec<FunctionSpec>) -> Self {
        self.functions = functions;
        self
    }

    /// True for version baseline groups; these are excluded from
    /// capability-boolean generation.
    pub fn is_core(&self, binding: &BindingConfig) -> bool {
        binding.is_core_version(&self.template_name)
    }

    /// The capability name: version templates carrying the binding prefix
    /// are renamed (`GL30` becomes `OpenGL30`), everything else gets the
    /// prefix template prepended (`ARB_imaging` becomes `GL_ARB_imaging`).
    pub fn cap_name(&self, binding: &BindingConfig) -> String {
        if self.template_name.starts_with(&binding.prefix_template) {
            if binding.prefix == "GL" {
                format!("OpenGL{}", &self.template_name[binding.prefix_template.len()..])
            } else {
                self.template_name.clone()
            }
        } else {
            format!("{}_{}", binding.prefix_template, self.template_name)
        }
    }

    /// The vendor segment of the template name, or the explicit postfix
    /// override. A template that matches neither convention is a registry
    /// configuration error and aborts generation.
    pub fn vendor(&self) -> Result<&str> {
        if !self.postfix.is_empty() {
            return Ok(&self.postfix);
        }
        VENDOR
            .captures(&self.template_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| GenError::naming_violation(&self.template_name))
    }

    /// Khronos registry URL for this extension's specification text.
    pub fn registry_link(&self) -> Result<String> {
        let vendor = self.vendor()?;
        Ok(format!("{}/{}/{}.txt", KHRONOS_REGISTRY, vendor, self.template_name))
    }

    /// Functions that own an entry point (everything not marked `reuse`).
    pub fn callable_functions(&self) -> impl Iterator<Item = &FunctionSpec> {
        self.functions.iter().filter(|f| !f.reuse)
    }

    pub fn has_callable_functions(&self) -> bool {
        self.callable_functions().next().is_some()
    }

    pub fn has_deprecated_functions(&self) -> bool {
        self.callable_functions().any(|f| f.deprecated)
    }
}

/// Ordered collection of extension groups.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub groups: Vec<ExtensionGroup>,
}

impl Registry {
    pub fn new(groups: Vec<ExtensionGroup>) -> Self {
        Self { groups }
    }

    /// Parse a registry from its YAML representation.
    pub fn from_yaml(source: &str) -> Result<Self> {
        super::parsing::registry_from_yaml(source)
    }

    pub fn group(&self, template_name: &str) -> Option<&ExtensionGroup> {
        self.groups.iter().find(|g| g.template_name == template_name)
    }
}
