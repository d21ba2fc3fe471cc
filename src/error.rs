use thiserror::Error;

use crate::metadata::token::{ClassIndex, ImageIndex, MethodToken};

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure this crate detects is deterministic - resolution misses stem from a
/// code-generation/runtime mismatch or a corrupted environment, never from a transient
/// fault - so no variant is worth retrying. The embedder decides whether a variant is
/// recoverable; the [`crate::entry`] wrappers implement the classic terminate-on-failure
/// policy on top of this taxonomy.
///
/// # Error Categories
///
/// ## Contract Violations
/// - [`Error::ClassIndexOutOfRange`] - Class index past the end of the generated class tables
/// - [`Error::InvalidTables`] - Generator output rejected at the table boundary
///
/// ## Resolution Misses
/// - [`Error::ImageNotFound`] - No module image loaded for the requested index
/// - [`Error::ClassNotFound`] - The class could not be resolved from its token
/// - [`Error::MethodNotFound`] - The method could not be resolved from its token
/// - [`Error::EntryPointUnavailable`] - The runtime produced no native-callable pointer
///
/// ## Managed Lookup Bridge
/// - [`Error::DefaultLoadContextUnset`] - Bridge used before a default load context exists
/// - [`Error::BridgeAssemblyNotFound`] - The well-known helper assembly could not be loaded
/// - [`Error::BridgeClassNotFound`] - The helper class is missing from the assembly
/// - [`Error::BridgeMethodNotFound`] - The helper method is missing from the class
/// - [`Error::BridgeEntryPoint`] - The runtime failed to produce the helper's entry point
#[derive(Error, Debug)]
pub enum Error {
    /// A caller passed a class index past the end of the build-generated class tables.
    ///
    /// This is a programming-contract violation on the code-generator side, not a
    /// recoverable runtime condition; the identifiers baked into native call sites
    /// must always be within the generated table bounds.
    #[error("Internal error: invalid index for class cache (expected at most {expected_max}, got {index})")]
    ClassIndexOutOfRange {
        /// Largest valid class index for the tables in use
        expected_max: u32,
        /// The offending index the caller supplied
        index: u32,
    },

    /// No module image is loaded for the requested image index.
    ///
    /// The image registry returned nothing, so neither the class nor the method
    /// could be resolved. Names are best-effort (`"Unknown"` when the diagnostic
    /// tables have no entry).
    #[error("Failed to obtain function pointer to method '{method}' in class '{class}': no module image at index {image_index} (class index {class_index}, method token {method_token})")]
    ImageNotFound {
        /// Best-effort method name from the diagnostic tables
        method: String,
        /// Best-effort class name from the diagnostic tables
        class: String,
        /// The image index that had no loaded module
        image_index: ImageIndex,
        /// The class index of the failed lookup
        class_index: ClassIndex,
        /// The method token of the failed lookup
        method_token: MethodToken,
    },

    /// The class handle could not be resolved from its metadata token.
    ///
    /// The module image was present but the runtime produced no class for the
    /// token stored in the class cache entry.
    #[error("Failed to obtain function pointer to method '{method}' in class '{class}': the class could not be loaded from the module image (image index {image_index}, class index {class_index}, method token {method_token})")]
    ClassNotFound {
        /// Best-effort method name from the diagnostic tables
        method: String,
        /// Best-effort class name from the diagnostic tables
        class: String,
        /// The image index of the failed lookup
        image_index: ImageIndex,
        /// The class index whose token did not resolve
        class_index: ClassIndex,
        /// The method token of the failed lookup
        method_token: MethodToken,
    },

    /// The method could not be resolved from its token inside a resolved class.
    #[error("Failed to obtain function pointer to method '{method}' in class '{class}': the method could not be loaded from the module image (image index {image_index}, class index {class_index}, method token {method_token})")]
    MethodNotFound {
        /// Best-effort method name from the diagnostic tables
        method: String,
        /// Best-effort class name from the diagnostic tables
        class: String,
        /// The image index of the failed lookup
        image_index: ImageIndex,
        /// The class index of the failed lookup
        class_index: ClassIndex,
        /// The method token that did not resolve
        method_token: MethodToken,
    },

    /// The runtime resolved the method but produced no native-callable entry point.
    ///
    /// `cause` carries the runtime's own error message when it reported one, or a
    /// generic description otherwise.
    #[error("{cause} (method '{method}' in class '{class}', image index {image_index}, class index {class_index}, method token {method_token})")]
    EntryPointUnavailable {
        /// Best-effort method name from the diagnostic tables
        method: String,
        /// Best-effort class name from the diagnostic tables
        class: String,
        /// The image index of the failed lookup
        image_index: ImageIndex,
        /// The class index of the failed lookup
        class_index: ClassIndex,
        /// The method token of the failed lookup
        method_token: MethodToken,
        /// Most specific cause available from the runtime's error reporting
        cause: String,
    },

    /// The managed lookup bridge was used before the default assembly load context was set.
    #[error("The default assembly load context is not set")]
    DefaultLoadContextUnset,

    /// The well-known assembly hosting the managed lookup helper could not be loaded.
    #[error("The {assembly} assembly could not be loaded into the default assembly load context")]
    BridgeAssemblyNotFound {
        /// Name of the assembly that failed to load
        assembly: &'static str,
    },

    /// The managed lookup helper class could not be found in its assembly.
    #[error("The {namespace}.{class} class could not be found in {assembly}")]
    BridgeClassNotFound {
        /// Namespace of the missing class
        namespace: &'static str,
        /// Name of the missing class
        class: &'static str,
        /// Assembly that was searched
        assembly: &'static str,
    },

    /// The managed lookup helper method could not be found in its class.
    #[error("The {class}.{method} method could not be found")]
    BridgeMethodNotFound {
        /// Class that was searched
        class: &'static str,
        /// Name of the missing method
        method: &'static str,
    },

    /// The runtime failed to produce a native entry point for the managed lookup helper.
    #[error("{cause}")]
    BridgeEntryPoint {
        /// Most specific cause available from the runtime's error reporting
        cause: String,
    },

    /// Build-generated tables were rejected during boundary validation.
    #[error("Invalid marshal tables - {message}")]
    InvalidTables {
        /// Description of the check that failed
        message: String,
    },
}
