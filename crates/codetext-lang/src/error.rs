use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading or validating a language definition.
pub enum LangError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown indentation option '{key}' for {style} indentation")]
    /// An option name is not declared by the selected indentation style.
    UnknownOption {
        /// The rejected option name.
        key: String,
        /// The indentation style the option was applied to.
        style: &'static str,
    },

    #[error("indentation option '{key}' expects a {expected} value")]
    /// An option value has the wrong type.
    OptionType {
        /// The option name.
        key: String,
        /// The expected value kind (`"boolean"` or `"string"`).
        expected: &'static str,
    },

    #[error("{matcher} matcher has an empty delimiter")]
    /// A matcher would match the empty string at every position.
    EmptyDelimiter {
        /// The matcher kind.
        matcher: &'static str,
    },

    #[error("language definition has an empty name")]
    /// A definition without a name cannot be registered.
    MissingName,
}
