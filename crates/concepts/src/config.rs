//! Configuration for concept normalization and matching.
//!
//! [`ConceptMatchConfig`] controls the Unicode policy used when normalizing
//! both the source text and the concept list, and how many matches a single
//! call may return.
//!
//! # Versioning
//!
//! Any change to normalization behavior must come with a `version` bump so
//! that stored tags can be traced back to the rules that produced them.
//!
//! # Examples
//!
//! ```rust
//! use concepts::{ConceptMatchConfig, DEFAULT_MAX_MATCHES};
//!
//! let config = ConceptMatchConfig::default();
//! assert_eq!(config.version, 1);
//! assert_eq!(config.max_matches, DEFAULT_MAX_MATCHES);
//! assert!(config.normalize_unicode);
//! ```
//!
//! Raising the cap for a long reading passage:
//!
//! ```rust
//! use concepts::ConceptMatchConfig;
//!
//! let config = ConceptMatchConfig {
//!     max_matches: 12,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConceptError;

/// Number of concepts a match call returns when the caller does not choose.
pub const DEFAULT_MAX_MATCHES: usize = 5;

/// Configuration for concept normalization and matching.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// configuration files and request bodies.
///
/// ```json
/// {
///   "version": 1,
///   "max_matches": 5,
///   "normalize_unicode": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConceptMatchConfig {
    /// Version of the normalization rules. Must be >= 1.
    #[serde(default = "ConceptMatchConfig::default_version")]
    pub version: u32,

    /// Upper bound on the number of concepts returned by one call.
    ///
    /// Matches are emitted in concept-list order, so the cap keeps the
    /// earliest matching concepts of the list, not the earliest in the text.
    #[serde(default = "ConceptMatchConfig::default_max_matches")]
    pub max_matches: usize,

    /// If true, apply Unicode NFKC normalization before lowercasing.
    ///
    /// With normalization enabled:
    /// ```text
    /// "Café" (U+00E9)        → "café"
    /// "Cafe" + U+0301        → "café"
    /// "ﬁssion" (U+FB01 lig.) → "fission"
    /// ```
    ///
    /// Without it the decomposed form loses its accent (combining marks are
    /// dropped) and the ligature is kept as a single letter, so the same
    /// concept can fail to match depending on how the text was typed.
    #[serde(default = "ConceptMatchConfig::default_normalize_unicode")]
    pub normalize_unicode: bool,
}

impl ConceptMatchConfig {
    pub(crate) fn default_version() -> u32 {
        1
    }

    pub(crate) fn default_max_matches() -> usize {
        DEFAULT_MAX_MATCHES
    }

    pub(crate) fn default_normalize_unicode() -> bool {
        true
    }

    /// Default configuration with a different match cap.
    pub fn with_max_matches(max_matches: usize) -> Self {
        Self {
            max_matches,
            ..Self::default()
        }
    }

    /// Validate the configuration before it is used to build a matcher.
    pub fn validate(&self) -> Result<(), ConceptError> {
        if self.version == 0 {
            return Err(ConceptError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        if self.max_matches == 0 {
            return Err(ConceptError::InvalidConfig(
                "max_matches must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ConceptMatchConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            max_matches: Self::default_max_matches(),
            normalize_unicode: Self::default_normalize_unicode(),
        }
    }
}
