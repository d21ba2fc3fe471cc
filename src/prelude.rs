//! # marshalpoint Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the marshalpoint library. Import this module to get quick access to the essential
//! types for marshal method resolution.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all marshalpoint operations
pub use crate::Error;

/// The result type used throughout marshalpoint
pub use crate::Result;

/// Configuration for validating build-generated tables
pub use crate::ValidationConfig;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The resolver: tables, class handle cache and fallback bridge
pub use crate::MarshalResolver;

/// The validated owner of the build-generated tables
pub use crate::MarshalTables;

/// Terminate-on-failure wrappers preserving the classic embedder policy
pub use crate::entry::{
    resolve_at_runtime_or_abort, resolve_at_startup_or_abort, resolve_via_managed_bridge_or_abort,
};

// ================================================================================================
// Identifiers
// ================================================================================================

/// Identifier newtypes emitted by the code generator
pub use crate::metadata::token::{
    AssemblyIndex, ClassIndex, ClassToken, ImageIndex, MethodId, MethodIndex, MethodToken,
};

/// One entry of the build-generated method name table
pub use crate::metadata::names::MethodNameEntry;

// ================================================================================================
// Runtime Collaborators
// ================================================================================================

/// The traits the embedder implements against the actual hosting runtime
pub use crate::runtime::{ImageRegistry, ProcessLifecycle, RuntimeHost};

/// Proof of thread registration with the runtime
pub use crate::runtime::AttachedThread;

/// Opaque handles and the caller-owned pointer slot
pub use crate::runtime::{
    AssemblyHandle, ClassHandle, FunctionPointerSlot, ImageHandle, LoadContextHandle,
    MethodHandle, NativeEntryPoint,
};

/// Failure report from the runtime's entry-point production
pub use crate::runtime::RuntimeFailure;

// ================================================================================================
// Managed Lookup Bridge
// ================================================================================================

/// Coordinates of the well-known managed lookup helper
pub use crate::resolver::ManagedLookupTarget;

/// Native signature of the generated managed lookup helper
pub use crate::resolver::ManagedLookupFn;
