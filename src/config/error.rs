use thiserror::Error;

/// Errors raised while turning user-facing names or edits into configuration.
///
/// Numeric inputs are clamped instead of rejected; only lookups that have no
/// sensible fallback end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown color scheme `{0}`")]
    UnknownColorScheme(String),

    #[error("unknown environment `{0}`")]
    UnknownEnvironment(String),

    #[error("unknown object shape `{0}`")]
    UnknownShape(String),

    #[error("unknown visualization type `{0}`")]
    UnknownVisualization(String),

    #[error("additional mass index {index} out of range ({count} active)")]
    MassIndexOutOfRange { index: usize, count: usize },

    #[error("at most {0} additional masses can be active")]
    TooManyMasses(usize),
}
