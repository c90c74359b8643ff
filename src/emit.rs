//! Capability descriptor emission.
//!
//! Pure rendering of a `CapabilityPlan` into Rust source text: field
//! declarations (one address slot per ordinal, in ordinal order — the field
//! order is the table layout contract), a constructor, one private check
//! routine per function-bearing non-core group, a fixed support block and
//! the promoted-to-core convenience helpers. Every policy branch was
//! decided by the resolver; nothing here is more than literal text
//! assembly, and the output is byte-stable for an unchanged plan.

use crate::binding::BindingConfig;
use crate::doclink;
use crate::error::Result;
use crate::registry::DependsOn;
use crate::resolver::{AddressResolution, CapabilityPlan, CheckKind, FnRef};
use std::fmt::Write;

/// Render the generated capability module.
pub fn render(plan: &CapabilityPlan, binding: &BindingConfig) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "// Generated by glcaps. Do not edit.")?;
    writeln!(out, "#![allow(non_snake_case, dead_code)]")?;
    writeln!(out)?;
    writeln!(out, "use glcaps::{{ExtSet, FunctionProvider, NULL}};")?;
    writeln!(out)?;

    render_struct(&mut out, plan, binding)?;
    render_constructor(&mut out, plan, binding)?;
    render_support_block(&mut out, binding)?;
    render_group_checks(&mut out, plan)?;
    render_promoted_block(&mut out, binding)?;

    Ok(out)
}

fn render_struct(out: &mut String, plan: &CapabilityPlan, binding: &BindingConfig) -> Result<()> {
    writeln!(out, "/// Defines the capabilities of an OpenGL context.")?;
    writeln!(out, "pub struct {} {{", binding.capabilities_type)?;

    for load in &plan.loads {
        writeln!(out, "    /// {}", doclink::reference_line(&load.symbol, load.deprecated))?;
        writeln!(out, "    pub {}: u64,", load.name)?;
    }
    if !plan.loads.is_empty() {
        writeln!(out)?;
    }

    for check in &plan.checks {
        match &check.registry_link {
            Some(link) => writeln!(
                out,
                "    /// When true, [{}]({}) is supported.",
                check.template_name, link
            )?,
            None => writeln!(out, "    /// When true, {} is supported.", check.template_name)?,
        }
        writeln!(out, "    pub {}: bool,", check.cap_name)?;
    }

    writeln!(out)?;
    writeln!(out, "    /// When true, deprecated functions are not available.")?;
    writeln!(out, "    pub forwardCompatible: bool,")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn render_constructor(
    out: &mut String,
    plan: &CapabilityPlan,
    binding: &BindingConfig,
) -> Result<()> {
    writeln!(out, "impl {} {{", binding.capabilities_type)?;
    writeln!(
        out,
        "    pub fn new(provider: &dyn FunctionProvider, ext: &ExtSet, fc: bool) -> Self {{"
    )?;
    writeln!(out, "        let mut a = vec![NULL; {}];", plan.ordinals.len())?;

    for load in &plan.loads {
        let line = match &load.resolution {
            AddressResolution::Standard => {
                format!("a[{}] = provider.get_function_address(\"{}\");", load.ordinal, load.symbol)
            }
            AddressResolution::DisabledWhenForwardCompatible => format!(
                "a[{}] = get_function_address(fc, provider, \"{}\");",
                load.ordinal, load.symbol
            ),
            AddressResolution::Gated(dep) => format!(
                "a[{}] = if {} {{ provider.get_function_address(\"{}\") }} else {{ NULL }};",
                load.ordinal,
                gate_expr(dep),
                load.symbol
            ),
        };
        writeln!(out, "        {line}")?;
    }
    writeln!(out)?;

    for check in &plan.checks {
        match &check.kind {
            CheckKind::PresenceOnly => writeln!(
                out,
                "        let {} = ext.contains(\"{}\");",
                check.cap_name, check.cap_name
            )?,
            CheckKind::Functions { takes_fc, .. } => {
                let fc_arg = if *takes_fc { "fc, " } else { "" };
                writeln!(
                    out,
                    "        let {} = check_{}(ext, {}&a);",
                    check.cap_name, check.template_name, fc_arg
                )?;
            }
        }
    }
    writeln!(out)?;

    writeln!(out, "        {} {{", binding.capabilities_type)?;
    for load in &plan.loads {
        writeln!(out, "            {}: a[{}],", load.name, load.ordinal)?;
    }
    for check in &plan.checks {
        writeln!(out, "            {},", check.cap_name)?;
    }
    writeln!(out, "            forwardCompatible: fc,")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn render_support_block(out: &mut String, binding: &BindingConfig) -> Result<()> {
    writeln!(out, "const UNCHECKED: u64 = !0;")?;
    writeln!(out)?;
    writeln!(out, "fn check_functions(addresses: &[u64]) -> bool {{")?;
    writeln!(out, "    addresses.iter().all(|&a| a != NULL)")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "fn check_extension(extension: &str, supported: bool) -> bool {{")?;
    writeln!(out, "    if supported {{")?;
    writeln!(out, "        return true;")?;
    writeln!(out, "    }}")?;
    writeln!(
        out,
        "    tracing::debug!(\"[GL] {{extension}} was reported as available but an entry point is missing.\");"
    )?;
    writeln!(out, "    false")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(
        out,
        "fn get_function_address(fc: bool, provider: &dyn FunctionProvider, name: &str) -> u64 {{"
    )?;
    writeln!(out, "    if fc {{ NULL }} else {{ provider.get_function_address(name) }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    for predicate in &binding.predicates {
        let terms: Vec<String> =
            predicate.any_of.iter().map(|t| format!("ext.contains(\"{t}\")")).collect();
        writeln!(
            out,
            "fn {}(ext: &ExtSet) -> bool {{ {} }}",
            predicate.name,
            terms.join(" || ")
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn render_group_checks(out: &mut String, plan: &CapabilityPlan) -> Result<()> {
    for check in &plan.checks {
        let CheckKind::Functions { takes_fc, deprecated_gate, required } = &check.kind else {
            continue;
        };

        let fc_param = if *takes_fc { "fc: bool, " } else { "" };
        writeln!(
            out,
            "fn check_{}(ext: &ExtSet, {}a: &[u64]) -> bool {{",
            check.template_name, fc_param
        )?;

        let mut supported = String::new();
        if *takes_fc {
            write!(
                supported,
                "(fc || check_functions(&[{}])) && ",
                member_list(deprecated_gate)
            )?;
        }
        write!(supported, "check_functions(&[{}])", member_list(required))?;

        writeln!(
            out,
            "    ext.contains(\"{}\") && check_extension(\"{}\", {})",
            check.cap_name, check.cap_name, supported
        )?;
        writeln!(out, "}}")?;
        writeln!(out)?;
    }
    Ok(())
}

fn render_promoted_block(out: &mut String, binding: &BindingConfig) -> Result<()> {
    for promoted in &binding.promoted_to_core {
        let [core, ext] = promoted.tokens();
        writeln!(
            out,
            "pub fn {}(ext: &ExtSet) -> bool {{ ext.contains(\"{}\") || ext.contains(\"{}\") }}",
            promoted.extension, core, ext
        )?;
    }
    Ok(())
}

/// A check-member expression: the slot itself, or a gated slot that reads as
/// unchecked while the gate is down.
fn member_list(members: &[FnRef]) -> String {
    members
        .iter()
        .map(|m| match &m.gate {
            None => format!("a[{}]", m.ordinal),
            Some(dep) => {
                format!("if {} {{ a[{}] }} else {{ UNCHECKED }}", gate_expr(dep), m.ordinal)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn gate_expr(dep: &DependsOn) -> String {
    match dep {
        DependsOn::Extension(name) => format!("ext.contains(\"{name}\")"),
        DependsOn::Predicate(name) => format!("{name}(ext)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ExtensionGroup, FunctionSpec, Registry};
    use crate::resolver::build_plan;

    fn sample_registry() -> Registry {
        Registry::new(vec![
            ExtensionGroup::new("GL11").with_functions(vec![
                FunctionSpec::new("glEnable"),
                FunctionSpec::new("glAccum").deprecated(),
            ]),
            ExtensionGroup::new("ARB_texture_storage").with_functions(vec![
                FunctionSpec::new("glTexStorage2D"),
                FunctionSpec::new("glTexStorage3DMultisample")
                    .depends_on_extension("GL_ARB_texture_storage_multisample"),
            ]),
            ExtensionGroup::new("ARB_dsa_thing")
                .with_functions(vec![FunctionSpec::new("glUnitThing").depends_on_predicate("hasDSA")]),
            ExtensionGroup::new("ARB_texture_non_power_of_two"),
        ])
    }

    fn rendered() -> String {
        let binding = BindingConfig::opengl();
        let plan = build_plan(&sample_registry(), &binding).unwrap();
        render(&plan, &binding).unwrap()
    }

    #[test]
    fn test_rendering_is_deterministic() {
        assert_eq!(rendered(), rendered());
    }

    #[test]
    fn test_fields_follow_ordinal_order() {
        let out = rendered();
        let a = out.find("pub glEnable: u64,").unwrap();
        let b = out.find("pub glAccum: u64,").unwrap();
        let c = out.find("pub glTexStorage2D: u64,").unwrap();
        assert!(a < b && b < c);

        assert!(out.contains("pub GL_ARB_texture_storage: bool,"));
        assert!(out.contains("pub OpenGL11: bool,"));
        assert!(out.contains("pub forwardCompatible: bool,"));
    }

    #[test]
    fn test_constructor_load_rules() {
        let out = rendered();
        assert!(out.contains("a[0] = provider.get_function_address(\"glEnable\");"));
        // Deprecated without dependency: forward-compatible override.
        assert!(out.contains("a[1] = get_function_address(fc, provider, \"glAccum\");"));
        // Gated: no provider call while the gate is down.
        assert!(out.contains(
            "a[3] = if ext.contains(\"GL_ARB_texture_storage_multisample\") { provider.get_function_address(\"glTexStorage3DMultisample\") } else { NULL };"
        ));
        assert!(out.contains(
            "a[4] = if hasDSA(ext) { provider.get_function_address(\"glUnitThing\") } else { NULL };"
        ));
    }

    #[test]
    fn test_check_routines() {
        let out = rendered();
        // Deprecated group takes the forward-compatible flag.
        assert!(out.contains("fn check_GL11(ext: &ExtSet, fc: bool, a: &[u64]) -> bool {"));
        assert!(out.contains(
            "ext.contains(\"OpenGL11\") && check_extension(\"OpenGL11\", (fc || check_functions(&[a[1]])) && check_functions(&[a[0]]))"
        ));
        // Plain group does not.
        assert!(out.contains("fn check_ARB_texture_storage(ext: &ExtSet, a: &[u64]) -> bool {"));
        assert!(out.contains(
            "check_functions(&[a[2], if ext.contains(\"GL_ARB_texture_storage_multisample\") { a[3] } else { UNCHECKED }])"
        ));
        // Presence-only groups have no routine, just a membership test.
        assert!(!out.contains("fn check_ARB_texture_non_power_of_two"));
        assert!(out.contains(
            "let GL_ARB_texture_non_power_of_two = ext.contains(\"GL_ARB_texture_non_power_of_two\");"
        ));
    }

    #[test]
    fn test_support_and_promoted_blocks() {
        let out = rendered();
        assert!(out.contains("const UNCHECKED: u64 = !0;"));
        assert!(out.contains("fn check_functions(addresses: &[u64]) -> bool {"));
        assert!(out.contains("was reported as available but an entry point is missing."));
        assert!(out.contains(
            "fn hasDSA(ext: &ExtSet) -> bool { ext.contains(\"GL45\") || ext.contains(\"GL_ARB_direct_state_access\") || ext.contains(\"GL_EXT_direct_state_access\") }"
        ));
        assert_eq!(out.matches("pub fn ARB_").count(), 22);
        assert!(out.contains(
            "pub fn ARB_framebuffer_object(ext: &ExtSet) -> bool { ext.contains(\"OpenGL30\") || ext.contains(\"GL_ARB_framebuffer_object\") }"
        ));
    }

    #[test]
    fn test_reference_links_on_address_fields() {
        let out = rendered();
        assert!(out.contains("/// [Reference Page](http://docs.gl/gl4/glTexStorage2D)"));
        // Deprecated functions link into the compatibility profile.
        assert!(out.contains("/// [Reference Page](http://docs.gl/gl3/glAccum) - *This function is deprecated and unavailable in the Core profile*"));
    }
}
