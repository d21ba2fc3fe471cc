//! Build-generated metadata for marshal method resolution.
//!
//! Everything in this module is produced at build time by the external code
//! generator and treated as an opaque, versioned contract: the identifier
//! newtypes the generator emits into native call sites, and the read-only
//! name/token tables used for diagnostics and class resolution.
//!
//! # Key Components
//!
//! - [`token`] - Strongly-typed identifier newtypes validated at the boundary
//! - [`names`] - Sentinel-terminated diagnostic name tables
//! - [`tables`] - [`MarshalTables`](tables::MarshalTables), the validated owner of the generated tables
//! - [`validation`] - Configuration for the boundary checks applied to generator output
//!
//! # Examples
//!
//! ```rust
//! use marshalpoint::metadata::names::MethodNameEntry;
//! use marshalpoint::metadata::token::{ClassToken, ImageIndex, MethodToken};
//! use marshalpoint::MarshalTables;
//!
//! static METHOD_NAMES: &[MethodNameEntry] = &[
//!     MethodNameEntry { id: (1u64 << 32) | 0x0600_0001, name: "Invoke" },
//!     MethodNameEntry { id: 0, name: "" },
//! ];
//! static CLASS_NAMES: &[&str] = &["Dispatcher"];
//! static CLASS_TOKENS: &[ClassToken] = &[ClassToken(0x0200_0010)];
//!
//! let tables = MarshalTables::new(METHOD_NAMES, CLASS_NAMES, CLASS_TOKENS)?;
//! assert_eq!(tables.method_name(ImageIndex(1), MethodToken(0x0600_0001)), "Invoke");
//! # Ok::<(), marshalpoint::Error>(())
//! ```

/// Implementation of the sentinel-terminated diagnostic name tables
pub mod names;
/// Implementation of the validated owner of the build-generated tables
pub mod tables;
/// Implementation of the identifier newtypes emitted by the code generator
pub mod token;
/// Implementation of the boundary validation applied to generator output
pub mod validation;
