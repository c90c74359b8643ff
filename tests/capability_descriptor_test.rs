//! End-to-end test: YAML registry -> plan -> emitted source and runtime
//! evaluation.

use anyhow::Result;
use glcaps::{
    build_plan, BindingConfig, ContextCapabilities, ExtSet, FunctionProvider, GenError, Registry,
    NULL,
};
use rustc_hash::FxHashMap;

const REGISTRY_YAML: &str = r#"
groups:
  - template_name: GL11C
    functions:
      - name: glEnable
      - name: glDisable
  - template_name: GL11
    functions:
      - name: glAccum
        deprecated: true
      - name: glClipPlane
        deprecated: true
      - name: glIsEnabled
        reuse: true
  - template_name: ARB_imaging
    functions:
      - name: glColorTable
        deprecated: true
      - name: glBlendColor
        depends_on:
          extension: GL_EXT_blend_color
        deprecated: true
      - name: glHistogram
        deprecated: true
        ignore_missing: true
  - template_name: ARB_texture_storage
    functions:
      - name: glTexStorage2D
      - name: glTexStorageMem2DEXT
        depends_on:
          predicate: hasDSA
  - template_name: ARB_texture_non_power_of_two
"#;

fn sample() -> (Registry, BindingConfig) {
    (Registry::from_yaml(REGISTRY_YAML).unwrap(), BindingConfig::opengl())
}

fn ext_set(names: &[&str]) -> ExtSet {
    names.iter().map(|s| s.to_string()).collect()
}

fn provider(entries: &[(&str, u64)]) -> FxHashMap<String, u64> {
    entries.iter().map(|(n, a)| (n.to_string(), *a)).collect()
}

#[test]
fn ordinals_are_unique_and_contiguous() -> Result<()> {
    let (registry, binding) = sample();
    let plan = build_plan(&registry, &binding)?;

    // Non-reuse functions across all groups, core included.
    assert_eq!(plan.ordinals.len(), 9);
    let mut seen = vec![false; plan.ordinals.len()];
    for (ordinal, _) in plan.ordinals.iter() {
        assert!(!seen[ordinal]);
        seen[ordinal] = true;
    }
    assert!(seen.into_iter().all(|s| s));

    // Registry order, with the reuse alias skipped.
    assert_eq!(plan.ordinals.ordinal("glEnable"), Some(0));
    assert_eq!(plan.ordinals.ordinal("glAccum"), Some(2));
    assert_eq!(plan.ordinals.ordinal("glIsEnabled"), None);
    assert_eq!(plan.ordinals.ordinal("glColorTable"), Some(4));
    assert_eq!(plan.ordinals.ordinal("glTexStorage2D"), Some(7));
    Ok(())
}

#[test]
fn capability_flags_follow_the_support_matrix() -> Result<()> {
    let (registry, binding) = sample();
    let plan = build_plan(&registry, &binding)?;

    let full = provider(&[
        ("glEnable", 0x01),
        ("glDisable", 0x02),
        ("glAccum", 0x03),
        ("glClipPlane", 0x04),
        ("glColorTable", 0x05),
        ("glBlendColor", 0x06),
        ("glHistogram", 0x09),
        ("glTexStorage2D", 0x07),
        ("glTexStorageMem2DEXT", 0x08),
    ]);

    let ext = ext_set(&[
        "OpenGL11",
        "GL_ARB_imaging",
        "GL_ARB_texture_storage",
        "GL_ARB_texture_non_power_of_two",
    ]);
    let caps = ContextCapabilities::new(&plan, &binding, &full, &ext, false);

    assert!(caps.supports("OpenGL11"));
    assert!(caps.supports("GL_ARB_imaging"));
    assert!(caps.supports("GL_ARB_texture_storage"));
    assert!(caps.supports("GL_ARB_texture_non_power_of_two"));
    assert_eq!(caps.address("glTexStorage2D"), 0x07);
    // Gated on hasDSA, which this extension set does not satisfy.
    assert_eq!(caps.address("glTexStorageMem2DEXT"), NULL);

    // Core groups never get a flag.
    assert!(!caps.supports("OpenGL11C"));
    assert!(!caps.supports("GL11C"));
    Ok(())
}

#[test]
fn advertised_extension_with_missing_entry_point_downgrades() -> Result<()> {
    let (registry, binding) = sample();
    let plan = build_plan(&registry, &binding)?;

    // glTexStorage2D is missing even though the extension is advertised.
    let partial = provider(&[("glEnable", 0x01)]);
    let ext = ext_set(&["GL_ARB_texture_storage", "GL_ARB_texture_non_power_of_two"]);
    let caps = ContextCapabilities::new(&plan, &binding, &partial, &ext, false);

    assert!(!caps.supports("GL_ARB_texture_storage"));
    // Construction continued; unrelated capabilities are unaffected.
    assert!(caps.supports("GL_ARB_texture_non_power_of_two"));
    Ok(())
}

#[test]
fn forward_compatible_context_waives_deprecated_functions() -> Result<()> {
    let (registry, binding) = sample();
    let plan = build_plan(&registry, &binding)?;

    // No deprecated entry points at all.
    let modern = provider(&[
        ("glEnable", 0x01),
        ("glDisable", 0x02),
        ("glBlendColor", 0x06),
        ("glTexStorage2D", 0x07),
    ]);
    let ext = ext_set(&["OpenGL11", "GL_ARB_imaging", "GL_EXT_blend_color"]);

    let legacy = ContextCapabilities::new(&plan, &binding, &modern, &ext, false);
    assert!(!legacy.supports("OpenGL11"));
    assert!(!legacy.supports("GL_ARB_imaging"));

    let fc = ContextCapabilities::new(&plan, &binding, &modern, &ext, true);
    assert!(fc.supports("OpenGL11"));
    // glColorTable is waived by forward compatibility and glBlendColor is
    // required through its satisfied dependency; glHistogram is
    // ignore-missing.
    assert!(fc.supports("GL_ARB_imaging"));
    assert_eq!(fc.address("glColorTable"), NULL);
    assert_eq!(fc.address("glBlendColor"), 0x06);
    Ok(())
}

#[test]
fn emitted_source_is_deterministic_and_complete() -> Result<()> {
    let (registry, binding) = sample();
    let plan = build_plan(&registry, &binding)?;

    let first = glcaps::emit::render(&plan, &binding)?;
    let second = glcaps::emit::render(&plan, &binding)?;
    assert_eq!(first, second);

    assert!(first.contains("pub struct GLCapabilities {"));
    assert!(first.contains("pub glEnable: u64,"));
    assert!(first.contains("pub OpenGL11: bool,"));
    assert!(first.contains("pub GL_ARB_imaging: bool,"));
    assert!(first.contains("pub forwardCompatible: bool,"));
    assert!(first.contains("fn check_GL11(ext: &ExtSet, fc: bool, a: &[u64]) -> bool {"));
    assert!(first.contains("fn check_ARB_texture_storage(ext: &ExtSet, a: &[u64]) -> bool {"));
    assert!(first
        .contains("let GL_ARB_texture_non_power_of_two = ext.contains(\"GL_ARB_texture_non_power_of_two\");"));
    assert!(first.contains(
        "/// When true, [ARB_imaging](https://www.khronos.org/registry/OpenGL/extensions/ARB/ARB_imaging.txt) is supported."
    ));
    assert_eq!(first.matches("pub fn ARB_").count(), 22);
    Ok(())
}

#[test]
fn emitter_and_evaluator_agree_on_the_plan() -> Result<()> {
    let (registry, binding) = sample();
    let plan = build_plan(&registry, &binding)?;
    let source = glcaps::emit::render(&plan, &binding)?;

    // Every capability the evaluator knows about has a field and a
    // constructor assignment in the emitted text.
    let nothing = provider(&[]);
    let caps = ContextCapabilities::new(&plan, &binding, &nothing, &ext_set(&[]), false);
    for check in &plan.checks {
        assert!(source.contains(&format!("pub {}: bool,", check.cap_name)));
        assert!(!caps.supports(&check.cap_name));
    }
    for load in &plan.loads {
        assert!(source.contains(&format!("pub {}: u64,", load.name)));
    }
    Ok(())
}

#[test]
fn malformed_registry_names_fail_generation() {
    let registry = Registry::from_yaml(
        r#"
groups:
  - template_name: lowercase_oddity
    functions:
      - name: glOddity
"#,
    )
    .unwrap();

    let err = build_plan(&registry, &BindingConfig::opengl()).unwrap_err();
    assert!(matches!(err, GenError::NamingViolation { .. }));
    assert!(err.is_registry_error());

    // A postfix override makes the same template acceptable.
    let mut registry = registry;
    registry.groups[0].postfix = "ODD".to_string();
    let plan = build_plan(&registry, &BindingConfig::opengl()).unwrap();
    assert_eq!(
        plan.checks[0].registry_link.as_deref(),
        Some("https://www.khronos.org/registry/OpenGL/extensions/ODD/lowercase_oddity.txt")
    );
}

#[test]
fn duplicate_function_names_abort_generation() {
    let registry = Registry::from_yaml(
        r#"
groups:
  - template_name: GL11
    functions:
      - name: glEnable
  - template_name: ARB_dup
    functions:
      - name: glEnable
"#,
    )
    .unwrap();

    match build_plan(&registry, &BindingConfig::opengl()) {
        Err(GenError::DuplicateFunction { name, first }) => {
            assert_eq!(name, "glEnable");
            assert_eq!(first, 0);
        }
        other => panic!("expected a duplicate-function error, got {other:?}"),
    }
}

#[test]
fn provider_is_never_consulted_for_unsatisfied_dependencies() -> Result<()> {
    struct PanicOnGated;
    impl FunctionProvider for PanicOnGated {
        fn get_function_address(&self, name: &str) -> u64 {
            assert_ne!(name, "glTexStorageMem2DEXT", "gated symbol was looked up");
            0x99
        }
    }

    let (registry, binding) = sample();
    let plan = build_plan(&registry, &binding)?;
    let ext = ext_set(&["GL_ARB_texture_storage"]);
    let caps = ContextCapabilities::new(&plan, &binding, &PanicOnGated, &ext, false);

    assert!(caps.supports("GL_ARB_texture_storage"));
    assert_eq!(caps.address("glTexStorageMem2DEXT"), NULL);
    Ok(())
}
