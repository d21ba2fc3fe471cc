//! Validation configuration for build-generated tables
//!
//! The code generator's output is an external, versioned contract; this
//! module configures which consistency checks are applied to it when a
//! [`MarshalTables`](crate::MarshalTables) is constructed. The checks cover
//! the table shape only - identifier values themselves stay opaque.

/// Configuration for validating generator output at the table boundary
///
/// Resolution never re-validates; everything here runs once, at
/// [`MarshalTables::with_validation`](crate::MarshalTables::with_validation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Require the method name table to end in the sentinel entry (id == 0)
    /// (recommended: always true - the lookup scan is bounded by it)
    pub require_terminal_sentinel: bool,

    /// Reject a sentinel entry anywhere before the final position
    /// (entries behind an interior sentinel would be silently unreachable)
    pub reject_interior_sentinel: bool,

    /// Scan the method name table for duplicate identifiers
    /// (duplicates are not harmful at runtime - the first entry wins - but
    /// always indicate a generator defect)
    pub check_duplicate_ids: bool,

    /// Upper bound on the number of classes accepted from the generator,
    /// `None` for unbounded
    pub max_classes: Option<usize>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_terminal_sentinel: true,
            reject_interior_sentinel: true,
            check_duplicate_ids: true,
            max_classes: None,
        }
    }
}

impl ValidationConfig {
    /// Creates a minimal validation configuration
    ///
    /// Only checks what the lookup scan depends on (the terminal sentinel);
    /// skips the full-table scans.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            require_terminal_sentinel: true,
            reject_interior_sentinel: false,
            check_duplicate_ids: false,
            max_classes: None,
        }
    }

    /// Creates a comprehensive validation configuration
    ///
    /// Enables every check (full-table scans included)
    #[must_use]
    pub fn comprehensive() -> Self {
        Self::default()
    }
}
