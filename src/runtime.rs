//! Runtime construction of the capability descriptor.
//!
//! `ContextCapabilities::new` interprets a `CapabilityPlan` against a
//! function provider, the supported extension-name set and the
//! forward-compatible flag — exactly the constructor the emitter renders as
//! source text. Construction is one-shot and non-reentrant per context; the
//! resulting value is immutable and safe to share read-only across threads.
//!
//! A missing entry point in an advertised extension is a downgrade, not an
//! error: the capability flag goes false, a diagnostic is logged, and
//! construction continues.

use crate::binding::BindingConfig;
use crate::ordinals::OrdinalTable;
use crate::registry::DependsOn;
use crate::resolver::{AddressResolution, CapabilityCheck, CapabilityPlan, CheckKind, FnRef};
use rustc_hash::{FxHashMap, FxHashSet};

/// Null function address.
pub const NULL: u64 = 0;

/// Supported extension-name set. Membership checks are O(1) amortized;
/// registries run to hundreds of groups.
pub type ExtSet = FxHashSet<String>;

/// Resolves entry-point addresses by symbol name. Returns `NULL` for
/// unavailable symbols.
pub trait FunctionProvider {
    fn get_function_address(&self, name: &str) -> u64;
}

/// Symbol table form of a provider, mainly for tests and software contexts.
impl FunctionProvider for FxHashMap<String, u64> {
    fn get_function_address(&self, name: &str) -> u64 {
        self.get(name).copied().unwrap_or(NULL)
    }
}

/// The capability snapshot of one native context.
#[derive(Debug, Clone)]
pub struct ContextCapabilities {
    addresses: Vec<u64>,
    flags: FxHashMap<String, bool>,
    ordinals: OrdinalTable,
    forward_compatible: bool,
}

impl ContextCapabilities {
    /// Build the snapshot. The provider is consulted at most once per
    /// resolvable ordinal and never for a gated function whose gate does
    /// not hold.
    pub fn new(
        plan: &CapabilityPlan,
        binding: &BindingConfig,
        provider: &dyn FunctionProvider,
        ext: &ExtSet,
        forward_compatible: bool,
    ) -> Self {
        let mut addresses = vec![NULL; plan.ordinals.len()];
        for load in &plan.loads {
            addresses[load.ordinal] = match &load.resolution {
                AddressResolution::Standard => provider.get_function_address(&load.symbol),
                AddressResolution::DisabledWhenForwardCompatible => {
                    if forward_compatible {
                        NULL
                    } else {
                        provider.get_function_address(&load.symbol)
                    }
                }
                AddressResolution::Gated(dep) => {
                    if gate_holds(dep, binding, ext) {
                        provider.get_function_address(&load.symbol)
                    } else {
                        NULL
                    }
                }
            };
        }

        let mut flags = FxHashMap::default();
        for check in &plan.checks {
            let supported = evaluate_check(check, binding, ext, forward_compatible, &addresses);
            flags.insert(check.cap_name.clone(), supported);
        }

        Self { addresses, flags, ordinals: plan.ordinals.clone(), forward_compatible }
    }

    /// Capability flag for a group, by capability name.
    pub fn supports(&self, cap_name: &str) -> bool {
        self.flags.get(cap_name).copied().unwrap_or(false)
    }

    /// Resolved address for a function, by name. `NULL` when unresolved or
    /// unknown.
    pub fn address(&self, name: &str) -> u64 {
        self.ordinals.ordinal(name).map_or(NULL, |i| self.addresses[i])
    }

    pub fn address_by_ordinal(&self, ordinal: usize) -> u64 {
        self.addresses.get(ordinal).copied().unwrap_or(NULL)
    }

    /// The address table in ordinal order.
    pub fn addresses(&self) -> &[u64] {
        &self.addresses
    }

    pub fn forward_compatible(&self) -> bool {
        self.forward_compatible
    }
}

fn gate_holds(dep: &DependsOn, binding: &BindingConfig, ext: &ExtSet) -> bool {
    match dep {
        DependsOn::Extension(name) => ext.contains(name),
        DependsOn::Predicate(name) => {
            binding.predicate(name).map(|p| p.evaluate(ext)).unwrap_or(false)
        }
    }
}

fn evaluate_check(
    check: &CapabilityCheck,
    binding: &BindingConfig,
    ext: &ExtSet,
    forward_compatible: bool,
    addresses: &[u64],
) -> bool {
    if !ext.contains(&check.cap_name) {
        return false;
    }

    match &check.kind {
        CheckKind::PresenceOnly => true,
        CheckKind::Functions { takes_fc, deprecated_gate, required } => {
            let all_present = |fns: &[FnRef]| {
                fns.iter().all(|f| match &f.gate {
                    // Excluded from the check while the gate is down; its
                    // nullity never fails the group.
                    Some(dep) if !gate_holds(dep, binding, ext) => true,
                    _ => addresses[f.ordinal] != NULL,
                })
            };

            let supported = if *takes_fc {
                (forward_compatible || all_present(deprecated_gate)) && all_present(required)
            } else {
                all_present(required)
            };

            check_extension(&check.cap_name, supported)
        }
    }
}

/// Downgrade path: the environment advertised the extension but at least one
/// required entry point is missing.
fn check_extension(extension: &str, supported: bool) -> bool {
    if supported {
        return true;
    }
    tracing::debug!("[GL] {extension} was reported as available but an entry point is missing.");
    false
}
