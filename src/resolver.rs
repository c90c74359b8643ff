//! Extension capability resolution.
//!
//! Turns the registry into an explicit, immutable `CapabilityPlan`: one
//! address-load rule per ordinal and one check per non-core group. The plan
//! is pure data — the emitter renders it into source text and the runtime
//! evaluator interprets it directly, so both paths share every policy
//! decision made here (deprecation, forward compatibility, dependency
//! gating, ignore-missing).

use crate::binding::BindingConfig;
use crate::error::{GenError, Result};
use crate::ordinals::OrdinalTable;
use crate::registry::{DependsOn, ExtensionGroup, FunctionSpec, Registry};

/// How an ordinal's address is obtained at context creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressResolution {
    /// Plain provider lookup.
    Standard,
    /// Deprecated function with no dependency reference: resolves to null
    /// whenever the context is forward compatible, without a provider call.
    DisabledWhenForwardCompatible,
    /// Looked up only when the gate holds; null otherwise, again without a
    /// provider call.
    Gated(DependsOn),
}

/// One slot of the descriptor's address table.
#[derive(Debug, Clone)]
pub struct AddressLoad {
    pub name: String,
    /// Symbol handed to the function provider.
    pub symbol: String,
    pub ordinal: usize,
    pub deprecated: bool,
    pub resolution: AddressResolution,
}

/// A member of a group's presence check. A gated member whose gate does not
/// hold is excluded from the check entirely — its nullity never fails the
/// group.
#[derive(Debug, Clone)]
pub struct FnRef {
    pub name: String,
    pub ordinal: usize,
    pub gate: Option<DependsOn>,
}

#[derive(Debug, Clone)]
pub enum CheckKind {
    /// No callable functions: supported-set membership is the whole check.
    PresenceOnly,
    Functions {
        /// The group has deprecated functions, so the check consumes the
        /// forward-compatible flag.
        takes_fc: bool,
        /// Deprecated functions without a dependency reference. In a
        /// forward-compatible context these are unavailable by policy and
        /// the term short-circuits true.
        deprecated_gate: Vec<FnRef>,
        /// Functions that must resolve for the capability to hold.
        required: Vec<FnRef>,
    },
}

/// The synthesized availability check for one non-core group.
#[derive(Debug, Clone)]
pub struct CapabilityCheck {
    pub template_name: String,
    pub cap_name: String,
    /// Khronos registry link for extension-style groups; `None` for version
    /// groups. A template that fits neither convention aborts generation.
    pub registry_link: Option<String>,
    pub kind: CheckKind,
}

/// Everything downstream consumers need, built once per generation.
#[derive(Debug, Clone)]
pub struct CapabilityPlan {
    pub ordinals: OrdinalTable,
    pub loads: Vec<AddressLoad>,
    pub checks: Vec<CapabilityCheck>,
}

/// Build the capability plan for a registry under a binding configuration.
///
/// The ordinal table is completed before any check is formed; no group's
/// predicate can observe another group's incomplete state.
pub fn build_plan(registry: &Registry, binding: &BindingConfig) -> Result<CapabilityPlan> {
    let ordinals = OrdinalTable::build(registry)?;
    let mut loads = Vec::with_capacity(ordinals.len());
    let mut checks = Vec::new();

    for group in &registry.groups {
        for func in group.callable_functions() {
            let ordinal = ordinals
                .ordinal(&func.name)
                .expect("callable function was assigned an ordinal");
            loads.push(AddressLoad {
                name: func.name.clone(),
                symbol: func.symbol().to_string(),
                ordinal,
                deprecated: func.deprecated,
                resolution: resolution_for(func, binding)?,
            });
        }

        if !group.is_core(binding) {
            checks.push(build_check(group, binding, &ordinals)?);
        }
    }

    Ok(CapabilityPlan { ordinals, loads, checks })
}

fn resolution_for(func: &FunctionSpec, binding: &BindingConfig) -> Result<AddressResolution> {
    if let Some(dep) = &func.depends_on {
        if let DependsOn::Predicate(name) = dep {
            if binding.predicate(name).is_none() {
                return Err(GenError::unknown_predicate(name, &func.name));
            }
        }
        return Ok(AddressResolution::Gated(dep.clone()));
    }
    if func.deprecated {
        Ok(AddressResolution::DisabledWhenForwardCompatible)
    } else {
        Ok(AddressResolution::Standard)
    }
}

fn build_check(
    group: &ExtensionGroup,
    binding: &BindingConfig,
    ordinals: &OrdinalTable,
) -> Result<CapabilityCheck> {
    let cap_name = group.cap_name(binding);

    // Version groups carry the binding prefix and have no registry page;
    // everything else must follow the vendor naming convention.
    let registry_link = if group.template_name.starts_with(&binding.prefix_template) {
        None
    } else {
        Some(group.registry_link()?)
    };

    if !group.has_callable_functions() {
        return Ok(CapabilityCheck {
            template_name: group.template_name.clone(),
            cap_name,
            registry_link,
            kind: CheckKind::PresenceOnly,
        });
    }

    let fn_ref = |f: &FunctionSpec| FnRef {
        name: f.name.clone(),
        ordinal: ordinals.ordinal(&f.name).expect("callable function was assigned an ordinal"),
        gate: f.depends_on.clone(),
    };

    let has_deprecated = group.has_deprecated_functions();

    // With deprecated functions present, the unconditionally-required set is
    // the non-deprecated functions plus any deprecated function that carries
    // a dependency reference; the remaining deprecated functions are only
    // demanded in non-forward-compatible contexts.
    let required = group
        .callable_functions()
        .filter(|f| {
            if has_deprecated {
                (!f.deprecated || f.depends_on.is_some()) && !f.ignore_missing
            } else {
                !f.ignore_missing
            }
        })
        .map(fn_ref)
        .collect();

    let deprecated_gate = if has_deprecated {
        group
            .callable_functions()
            .filter(|f| f.deprecated && f.depends_on.is_none())
            .map(fn_ref)
            .collect()
    } else {
        Vec::new()
    };

    Ok(CapabilityCheck {
        template_name: group.template_name.clone(),
        cap_name,
        registry_link,
        kind: CheckKind::Functions { takes_fc: has_deprecated, deprecated_gate, required },
    })
}
