//! Configuration error types and diagnostics.

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error while deriving a build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigureError {
    #[error("missing definition for argument `{argument}`")]
    MissingDefinition { argument: String },

    #[error("unable to resolve `{placeholder}`")]
    UnresolvedMacro { placeholder: String },

    #[error("invalid variant name `{name}`")]
    InvalidVariantName { name: String },

    #[error("variants must have a value indicator (+~): `{word}`")]
    MissingVariantIndicator { word: String },

    #[error("unbalanced quoting in definition for `{argument}`")]
    InvalidQuoting { argument: String, line: String },

    #[error("unable to find `{tool}`")]
    ToolchainNotFound { tool: String },
}

impl ConfigureError {
    /// True for errors that only make a single variant unsatisfiable.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(
            self,
            ConfigureError::MissingDefinition { .. } | ConfigureError::UnresolvedMacro { .. }
        )
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigureError::MissingDefinition { argument } => {
                Diagnostic::error(format!("no definition for `{}`", argument))
                    .with_context("no loaded dependency line starts with this argument")
                    .with_suggestion(format!(
                        "Add a line starting with `{}` to a dependency file",
                        argument
                    ))
                    .with_suggestion("Check the order of `--deps` files, first match wins")
            }

            ConfigureError::UnresolvedMacro { placeholder } => {
                let mut diag = Diagnostic::error(format!("`{}` has no value", placeholder));
                match placeholder.as_str() {
                    "${CC}" => {
                        diag = diag
                            .with_context("searched for gcc, icc, cc")
                            .with_suggestion("Set the CC environment variable");
                    }
                    "${CXX}" => {
                        diag = diag
                            .with_context("searched for g++, icpc, CC, c++")
                            .with_suggestion("Set the CXX environment variable");
                    }
                    _ => {}
                }
                diag
            }

            ConfigureError::InvalidVariantName { name } => {
                Diagnostic::error(format!("unknown variant `{}`", name)).with_context(format!(
                    "valid variants: {}",
                    crate::core::variant::Feature::ALL
                        .iter()
                        .map(|f| f.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            }

            ConfigureError::MissingVariantIndicator { word } => {
                Diagnostic::error(format!("`{}` is not a variant spec", word))
                    .with_suggestion(format!("Write `+{}` or `~{}`", word, word))
            }

            ConfigureError::InvalidQuoting { argument, line } => {
                Diagnostic::error(format!("cannot split definition for `{}`", argument))
                    .with_context(format!("line: {}", line.trim_end()))
                    .with_suggestion("Close every quote opened on the line")
            }

            ConfigureError::ToolchainNotFound { tool } => {
                Diagnostic::error(format!("`{}` not found in PATH", tool))
                    .with_suggestion(format!("Install {} or add it to PATH", tool))
            }
        }
    }
}
