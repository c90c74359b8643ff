//! Binding family configuration.
//!
//! Everything the generator needs to know about the binding it is emitting
//! for — prefixes, the capability type name, the promoted-to-core table and
//! the named auxiliary predicates — lives here and is passed explicitly to
//! the generation entry points. There is no process-global registration.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

/// Version templates like `GL15C` are the core-profile baseline classes.
/// They receive ordinals but no capability boolean.
static CORE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^GL\d\dC$").expect("valid regex"));

/// A hand-enumerated "promoted to core" convenience check: the extension is
/// considered present when either the versioned core name or the ARB-style
/// extension name is in the supported set.
#[derive(Debug, Clone)]
pub struct PromotedCheck {
    /// Two-digit core version label, e.g. `"30"`.
    pub core: String,
    /// Extension suffix without the binding prefix, e.g.
    /// `"ARB_framebuffer_object"`. Doubles as the emitted helper name.
    pub extension: String,
}

impl PromotedCheck {
    pub fn new<S1: Into<String>, S2: Into<String>>(core: S1, extension: S2) -> Self {
        Self { core: core.into(), extension: extension.into() }
    }

    /// The supported-set tokens this check accepts.
    pub fn tokens(&self) -> [String; 2] {
        [format!("OpenGL{}", self.core), format!("GL_{}", self.extension)]
    }

    pub fn evaluate(&self, ext: &FxHashSet<String>) -> bool {
        self.tokens().iter().any(|t| ext.contains(t))
    }
}

/// A named boolean helper that dependency references may point at instead of
/// a literal extension name. Evaluates true when any of its tokens is in the
/// supported set.
#[derive(Debug, Clone)]
pub struct NamedPredicate {
    pub name: String,
    pub any_of: Vec<String>,
}

impl NamedPredicate {
    pub fn new<S: Into<String>>(name: S, any_of: &[&str]) -> Self {
        Self { name: name.into(), any_of: any_of.iter().map(|s| s.to_string()).collect() }
    }

    pub fn evaluate(&self, ext: &FxHashSet<String>) -> bool {
        self.any_of.iter().any(|t| ext.contains(t))
    }
}

/// Configuration for one binding family.
#[derive(Debug, Clone)]
pub struct BindingConfig {
    /// Function prefix, e.g. `"GL"`.
    pub prefix: String,
    /// Template-name prefix used when deriving capability names.
    pub prefix_template: String,
    /// Name of the emitted capability type.
    pub capabilities_type: String,
    /// Fixed promoted-to-core helper table, emitted verbatim after the
    /// per-extension check routines.
    pub promoted_to_core: Vec<PromotedCheck>,
    /// Named predicates available to `DependsOn::Predicate` references.
    pub predicates: Vec<NamedPredicate>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self::opengl()
    }
}

impl BindingConfig {
    /// The OpenGL binding family.
    pub fn opengl() -> Self {
        let promoted = [
            ("30", "ARB_framebuffer_object"),
            ("30", "ARB_map_buffer_range"),
            ("30", "ARB_vertex_array_object"),
            ("31", "ARB_copy_buffer"),
            ("31", "ARB_texture_buffer_object"),
            ("31", "ARB_uniform_buffer_object"),
            ("33", "ARB_instanced_arrays"),
            ("33", "ARB_sampler_objects"),
            ("40", "ARB_transform_feedback2"),
            ("41", "ARB_vertex_attrib_64bit"),
            ("41", "ARB_separate_shader_objects"),
            ("42", "ARB_texture_storage"),
            ("43", "ARB_texture_storage_multisample"),
            ("43", "ARB_vertex_attrib_binding"),
            ("43", "ARB_invalidate_subdata"),
            ("43", "ARB_texture_buffer_range"),
            ("43", "ARB_clear_buffer_object"),
            ("43", "ARB_framebuffer_no_attachments"),
            ("44", "ARB_buffer_storage"),
            ("44", "ARB_clear_texture"),
            ("44", "ARB_multi_bind"),
            ("44", "ARB_query_buffer_object"),
        ];

        Self {
            prefix: "GL".to_string(),
            prefix_template: "GL".to_string(),
            capabilities_type: "GLCapabilities".to_string(),
            promoted_to_core: promoted
                .iter()
                .map(|(core, ext)| PromotedCheck::new(*core, *ext))
                .collect(),
            predicates: vec![NamedPredicate::new(
                "hasDSA",
                &["GL45", "GL_ARB_direct_state_access", "GL_EXT_direct_state_access"],
            )],
        }
    }

    /// True for version baseline templates (`GL15C` and friends).
    pub fn is_core_version(&self, template_name: &str) -> bool {
        CORE_VERSION.is_match(template_name)
    }

    /// Resolve a named predicate: the explicit predicate table first, then
    /// the promoted-to-core helpers by their extension suffix.
    pub fn predicate(&self, name: &str) -> Option<NamedPredicate> {
        if let Some(p) = self.predicates.iter().find(|p| p.name == name) {
            return Some(p.clone());
        }
        self.promoted_to_core
            .iter()
            .find(|p| p.extension == name)
            .map(|p| NamedPredicate { name: p.extension.clone(), any_of: p.tokens().to_vec() })
    }
}
