//! glcaps - build-time capability descriptor generation for OpenGL contexts.
//!
//! This library turns an ordered registry of extension groups into the
//! capability snapshot of a native context: stable function ordinals, a
//! per-extension availability check honoring deprecation and
//! forward-compatibility policy, and documentation reference links. The
//! same resolution plan drives two consumers — a source emitter that renders
//! the descriptor type as text, and a runtime evaluator that builds the
//! snapshot directly from a function provider.
//!
//! # Example
//!
//! ```
//! use glcaps::{BindingConfig, ExtensionGroup, FunctionSpec, Registry};
//!
//! let registry = Registry::new(vec![ExtensionGroup::new("ARB_texture_storage")
//!     .with_functions(vec![FunctionSpec::new("glTexStorage2D")])]);
//! let binding = BindingConfig::opengl();
//!
//! let plan = glcaps::build_plan(&registry, &binding).unwrap();
//! let source = glcaps::emit::render(&plan, &binding).unwrap();
//! assert!(source.contains("pub GL_ARB_texture_storage: bool,"));
//! ```

pub mod binding;
pub mod doclink;
pub mod emit;
mod error;
pub mod normalize;
pub mod ordinals;
pub mod registry;
pub mod resolver;
pub mod runtime;

// Re-export commonly used types at crate root
pub use binding::{BindingConfig, NamedPredicate, PromotedCheck};
pub use error::{GenError, Result};
pub use normalize::NameNormalizer;
pub use ordinals::OrdinalTable;
pub use registry::{DependsOn, ExtensionGroup, FunctionSpec, Registry};
pub use resolver::{build_plan, CapabilityCheck, CapabilityPlan, CheckKind};
pub use runtime::{ContextCapabilities, ExtSet, FunctionProvider, NULL};
