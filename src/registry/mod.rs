//! Registry view of the API surface.
//!
//! This module holds the read-only input to generation:
//!
//! - **Models**: extension groups and function specs with their attribute
//!   tags, plus the derived naming (capability names, vendor prefixes,
//!   registry links)
//! - **Parsing**: YAML raw structures and default application
//!
//! The registry is ordered; generation never sorts it. Ordinal values and
//! emitted field order both follow registry iteration order.

mod models;
mod parsing;

pub use models::{DependsOn, ExtensionGroup, FunctionSpec, Registry};
