use thiserror::Error;

/// Generation-time error types. All of these are configuration problems in
/// the registry or binding; none of them can surface from the emitted
/// descriptor at runtime.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("non-standard extension name: {name}")]
    NamingViolation { name: String },

    #[error("duplicate function name in ordinal table: {name} (first assigned ordinal {first})")]
    DuplicateFunction { name: String, first: usize },

    #[error("function {function} depends on unknown predicate {name}")]
    UnknownPredicate { name: String, function: String },

    #[error("registry loading failed: {message}")]
    RegistryLoad { message: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("emission failed: {0}")]
    Fmt(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, GenError>;

impl GenError {
    pub fn naming_violation<S: Into<String>>(name: S) -> Self {
        Self::NamingViolation { name: name.into() }
    }

    pub fn duplicate_function<S: Into<String>>(name: S, first: usize) -> Self {
        Self::DuplicateFunction { name: name.into(), first }
    }

    pub fn unknown_predicate<S1: Into<String>, S2: Into<String>>(name: S1, function: S2) -> Self {
        Self::UnknownPredicate { name: name.into(), function: function.into() }
    }

    pub fn registry_load<S: Into<String>>(message: S) -> Self {
        Self::RegistryLoad { message: message.into() }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Returns true if the error points at registry content rather than the
    /// binding configuration or the emitter itself.
    pub fn is_registry_error(&self) -> bool {
        matches!(
            self,
            Self::NamingViolation { .. }
                | Self::DuplicateFunction { .. }
                | Self::UnknownPredicate { .. }
                | Self::RegistryLoad { .. }
        )
    }
}
