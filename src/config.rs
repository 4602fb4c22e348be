//! Engine-wide tunables.
//!
//! Named `const`s with the invariant they encode spelled out, in the spirit
//! of naming a tuning knob (`EXACT_PRIMITIVE_MATCH_BONUS`-style) rather than
//! leaving it as a bare literal.

/// Cap on the number of guard signatures the canonicalizer (`cache_method`)
/// will accumulate before giving up on a despecialized cache key and falling
/// back to caching the call under its original, unmodified argument tuple.
/// Past this many conflicting definitions, building and checking the guard
/// set costs more than the despecialization saves.
pub const MAX_UNSPECIALIZED_CONFLICTS: usize = 32;

/// Number of slots in the per-callsite micro-cache. Must be a power of two:
/// slot selection masks a fingerprint with `N_CALL_CACHE - 1` rather than
/// taking a remainder.
pub const N_CALL_CACHE: usize = 4;

/// Global compilation policy, mirroring the `{off, min, all}` tunable from
/// the dispatch engine's external interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompileMode {
    /// No specialization is compiled; dispatch always runs the unspecialized
    /// fallback (or fails if none exists).
    Off,
    /// Only specializations actually reached by a dispatch are compiled.
    #[default]
    Min,
    /// Precompile eagerly expands every method's concrete call sites.
    All,
}

/// Small bag of engine-wide settings. Magic numbers live as documented
/// consts rather than scattered literals.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub compile_mode: CompileMode,
    pub max_unspecialized_conflicts: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            compile_mode: CompileMode::default(),
            max_unspecialized_conflicts: MAX_UNSPECIALIZED_CONFLICTS,
        }
    }
}
