//! The error dispatch raises: no-match and ambiguity-at-call.
//!
//! Modeled on `types::DispatchError`, renamed to match this crate's "method
//! table" vocabulary and extended with the signature the call matched
//! against (useful once callers see the same error surface from both
//! `apply_generic` and `invoke`).

use super::julia_type::JuliaType;

/// Recoverable dispatch failures. Internal invariant violations (e.g. a
/// `LambdaInfo` observed with no code and no fallback) are bugs, not values
/// of this type, and panic instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodError {
    /// No definition in the method table matches the given argument types.
    NoMethod {
        name: String,
        arg_types: Vec<JuliaType>,
    },
    /// More than one definition matches with equal specificity and neither
    /// dominates the other.
    Ambiguous {
        name: String,
        arg_types: Vec<JuliaType>,
        candidates: Vec<Vec<JuliaType>>,
    },
}

impl std::fmt::Display for MethodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodError::NoMethod { name, arg_types } => {
                let types: Vec<_> = arg_types.iter().map(|t| format!("::{}", t)).collect();
                write!(
                    f,
                    "MethodError: no method matching {}({})",
                    name,
                    types.join(", ")
                )
            }
            MethodError::Ambiguous {
                name,
                arg_types,
                candidates,
            } => {
                let types: Vec<_> = arg_types.iter().map(|t| format!("::{}", t)).collect();
                let mut msg = format!(
                    "MethodError: {}({}) is ambiguous. Candidates:\n",
                    name,
                    types.join(", ")
                );
                for sig in candidates {
                    let sig_str: Vec<_> = sig.iter().map(|t| format!("::{}", t)).collect();
                    msg.push_str(&format!("  {}({})\n", name, sig_str.join(", ")));
                }
                write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for MethodError {}
