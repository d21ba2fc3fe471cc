//! The validated owner of the build-generated marshal tables.
//!
//! [`MarshalTables`] bundles the three read-only tables the code generator
//! emits - method names, class names, class tokens - behind a constructor
//! that validates their shape once, at the boundary. After construction the
//! lookups are infallible and degrade to [`UNKNOWN`](crate::metadata::names::UNKNOWN).

use std::collections::HashSet;

use crate::{
    metadata::{
        names::{class_name_at, scan_method_name, MethodNameEntry},
        token::{ClassIndex, ClassToken, ImageIndex, MethodId, MethodToken},
        validation::ValidationConfig,
    },
    Error, Result,
};

/// The build-generated lookup tables for marshal method resolution.
///
/// Holds the diagnostic name tables and the class token table. The number of
/// known classes is derived from the class tables; there is no free-standing
/// class-count constant anywhere else.
///
/// # Examples
///
/// ```rust
/// use marshalpoint::metadata::names::MethodNameEntry;
/// use marshalpoint::metadata::token::{ClassIndex, ClassToken, ImageIndex, MethodToken};
/// use marshalpoint::MarshalTables;
///
/// static METHOD_NAMES: &[MethodNameEntry] = &[
///     MethodNameEntry { id: (2u64 << 32) | 0x0600_001A, name: "OnCreate" },
///     MethodNameEntry { id: 0, name: "" },
/// ];
/// static CLASS_NAMES: &[&str] = &["MainActivity"];
/// static CLASS_TOKENS: &[ClassToken] = &[ClassToken(0x0200_0002)];
///
/// let tables = MarshalTables::new(METHOD_NAMES, CLASS_NAMES, CLASS_TOKENS)?;
/// assert_eq!(tables.class_count(), 1);
/// assert_eq!(tables.method_name(ImageIndex(2), MethodToken(0x0600_001A)), "OnCreate");
/// assert_eq!(tables.class_name(ClassIndex(7)), "Unknown");
/// # Ok::<(), marshalpoint::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MarshalTables {
    method_names: &'static [MethodNameEntry],
    class_names: &'static [&'static str],
    class_tokens: &'static [ClassToken],
}

impl MarshalTables {
    /// Creates tables from generator output, validated with
    /// [`ValidationConfig::default`].
    ///
    /// # Arguments
    /// * `method_names` - Sentinel-terminated method name table
    /// * `class_names` - Class name table, indexed by class index
    /// * `class_tokens` - Class token table, same length as `class_names`
    ///
    /// # Errors
    /// Returns [`Error::InvalidTables`] when the generator output fails a
    /// configured shape check.
    pub fn new(
        method_names: &'static [MethodNameEntry],
        class_names: &'static [&'static str],
        class_tokens: &'static [ClassToken],
    ) -> Result<Self> {
        Self::with_validation(
            method_names,
            class_names,
            class_tokens,
            ValidationConfig::default(),
        )
    }

    /// Creates tables from generator output with an explicit validation
    /// configuration.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTables`] when the generator output fails a
    /// configured shape check.
    pub fn with_validation(
        method_names: &'static [MethodNameEntry],
        class_names: &'static [&'static str],
        class_tokens: &'static [ClassToken],
        config: ValidationConfig,
    ) -> Result<Self> {
        if class_names.len() != class_tokens.len() {
            return Err(Error::InvalidTables {
                message: format!(
                    "class name and class token tables differ in length ({} vs {})",
                    class_names.len(),
                    class_tokens.len()
                ),
            });
        }

        if let Some(max) = config.max_classes {
            if class_names.len() > max {
                return Err(Error::InvalidTables {
                    message: format!(
                        "class table has {} entries, more than the configured maximum of {}",
                        class_names.len(),
                        max
                    ),
                });
            }
        }

        if config.require_terminal_sentinel
            && method_names.last().map_or(true, |entry| entry.id != 0)
        {
            return Err(Error::InvalidTables {
                message: "method name table does not end in the sentinel entry".to_string(),
            });
        }

        if config.reject_interior_sentinel {
            if let Some(position) = method_names
                .iter()
                .position(|entry| entry.id == 0)
            {
                if position + 1 != method_names.len() {
                    return Err(Error::InvalidTables {
                        message: format!(
                            "method name table has an interior sentinel at position {position}"
                        ),
                    });
                }
            }
        }

        if config.check_duplicate_ids {
            let mut seen = HashSet::with_capacity(method_names.len());
            for entry in method_names {
                if entry.id == 0 {
                    break;
                }
                if !seen.insert(entry.id) {
                    return Err(Error::InvalidTables {
                        message: format!(
                            "method name table has a duplicate identifier {:#018x}",
                            entry.id
                        ),
                    });
                }
            }
        }

        Ok(Self {
            method_names,
            class_names,
            class_tokens,
        })
    }

    /// The number of classes the generator emitted tables for.
    #[must_use]
    pub fn class_count(&self) -> u32 {
        self.class_names.len() as u32
    }

    /// Looks up the human-readable name of a method.
    ///
    /// Packs the identifiers into a [`MethodId`] and scans the generated
    /// table. Returns `"Unknown"` on miss; never fails.
    #[must_use]
    pub fn method_name(&self, image_index: ImageIndex, method_token: MethodToken) -> &'static str {
        scan_method_name(self.method_names, MethodId::new(image_index, method_token))
    }

    /// Looks up the human-readable name of a class.
    ///
    /// Returns `"Unknown"` when `class_index` is past the end of the table;
    /// never fails and never reads out of bounds.
    #[must_use]
    pub fn class_name(&self, class_index: ClassIndex) -> &'static str {
        class_name_at(self.class_names, class_index)
    }

    /// The class token table, in class-index order.
    pub(crate) fn class_tokens(&self) -> &'static [ClassToken] {
        self.class_tokens
    }
}
