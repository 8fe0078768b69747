//! Component and registry error types.

use crate::id::ComponentKind;

/// Result type alias for component operations.
pub type Result<T> = std::result::Result<T, ComponentError>;

/// Errors for component identity parsing.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// A component ID string could not be parsed.
    #[error("invalid component id '{raw}': {reason}")]
    InvalidId { raw: String, reason: String },

    /// A component kind string could not be parsed.
    #[error("unknown component kind '{0}'")]
    InvalidKind(String),

    /// A signal type string could not be parsed.
    #[error("unknown signal type '{0}'")]
    InvalidSignal(String),
}

/// One duplicate factory registration found while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate {kind} factory '{type_name}'")]
pub struct DuplicateFactory {
    pub kind: ComponentKind,
    pub type_name: String,
}

/// Aggregated registry build failure.
///
/// Carries every duplicate found in one pass, so operators see all
/// collisions at once instead of fixing one and re-running.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("factory registry build failed: {}", format_duplicates(.0))]
    Duplicates(Vec<DuplicateFactory>),
}

fn format_duplicates(duplicates: &[DuplicateFactory]) -> String {
    duplicates
        .iter()
        .map(DuplicateFactory::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
