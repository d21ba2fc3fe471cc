// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]
//#![deny(unsafe_code)]
// - 'resolver/bridge.rs' transmutes a resolved entry point address into the
//   generated managed lookup helper's function pointer type and invokes it

//! # marshalpoint
//!
//! Resolution and caching of native entry points for managed marshal methods.
//!
//! `marshalpoint` sits on the boundary between a managed runtime and native
//! call sites. Build-generated native stubs hold nothing but numeric
//! identifiers (a module image index, a class index, a method token) and an
//! uninitialized pointer slot; this crate turns those identifiers into a
//! directly callable native entry point, publishes it into the caller's slot
//! exactly once per identifier triple, and caches the intermediate class
//! handles so the expensive resolution happens at most once.
//!
//! ## Features
//!
//! - **Lazy class handle cache** - one lock-free slot per known class,
//!   resolved on first use and safe under concurrent first access
//! - **Two publication disciplines** - plain stores during single-threaded
//!   startup, release stores once concurrent readers may be spinning on a slot
//! - **Typed failure taxonomy** - every resolution miss is a distinct
//!   [`Error`] variant carrying human-readable names and the raw identifiers;
//!   the embedder chooses between recovery and termination
//! - **Managed lookup fallback** - a memoized bridge to a well-known managed
//!   helper for cases the native resolution path cannot satisfy
//!
//! ## Quick Start
//!
//! The diagnostic name tables are plain build-generated data and can be used
//! standalone:
//!
//! ```rust
//! use marshalpoint::metadata::names::MethodNameEntry;
//! use marshalpoint::metadata::token::{ClassIndex, ClassToken, ImageIndex, MethodToken};
//! use marshalpoint::MarshalTables;
//!
//! static METHOD_NAMES: &[MethodNameEntry] = &[
//!     MethodNameEntry { id: (2u64 << 32) | 0x0600_001A, name: "OnCreate" },
//!     MethodNameEntry { id: 0, name: "" },
//! ];
//! static CLASS_NAMES: &[&str] = &["MainActivity"];
//! static CLASS_TOKENS: &[ClassToken] = &[ClassToken(0x0200_0002)];
//!
//! let tables = MarshalTables::new(METHOD_NAMES, CLASS_NAMES, CLASS_TOKENS)?;
//! assert_eq!(tables.method_name(ImageIndex(2), MethodToken(0x0600_001A)), "OnCreate");
//! assert_eq!(tables.class_name(ClassIndex(0)), "MainActivity");
//! # Ok::<(), marshalpoint::Error>(())
//! ```
//!
//! Resolution itself runs against the embedder's runtime collaborators; see
//! the [`resolver`] module for the full flow.
//!
//! ## Architecture
//!
//! - [`metadata`] - build-generated identifier and name tables, validated at
//!   the boundary
//! - [`runtime`] - the interfaces this crate consumes from the managed
//!   runtime host, the image registry and the process lifecycle
//! - [`resolver`] - the central resolve-and-publish algorithm, the class
//!   handle cache and the managed lookup bridge
//! - [`entry`] - terminate-on-failure wrappers preserving the classic
//!   embedder policy
//! - [`prelude`] - convenient re-exports of the common surface
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). Resolution
//! failures are deterministic - nothing in this crate retries - and the
//! variants are specific enough for an embedder to decide between logging,
//! degraded operation, or process termination via [`entry`].
//!
//! ## Threading
//!
//! Any native thread may call into the resolver; thread registration with the
//! runtime is handled internally through [`runtime::AttachedThread`] before
//! every runtime call. Slot publication pairs release stores with acquire
//! loads so a reader never observes a partially published pointer.

mod error;

/// Terminate-on-failure wrappers over the typed resolver API.
///
/// These preserve the classic embedder policy where a marshal method that
/// cannot be resolved is an unrecoverable condition: the full diagnostic is
/// logged and the process-lifecycle collaborator's abort is invoked.
pub mod entry;

/// Build-generated tables and strongly-typed identifiers.
///
/// Covers the identifier newtypes ([`metadata::token`]), the diagnostic name
/// tables ([`metadata::names`]), their owning [`MarshalTables`] and the
/// [`ValidationConfig`] applied to generator output at the boundary.
pub mod metadata;

/// The resolve-and-publish core.
///
/// Contains [`MarshalResolver`] with its startup and runtime entry-point
/// variants, the lazy class handle cache, and the managed lookup fallback
/// bridge.
pub mod resolver;

/// Interfaces of the external collaborators.
///
/// The managed runtime host, the image registry and the process lifecycle
/// are consumed through the traits in this module; the opaque handle types
/// and the caller-owned [`runtime::FunctionPointerSlot`] live here as well.
pub mod runtime;

/// Shared mock collaborators used in unit tests.
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use marshalpoint::prelude::*;
/// ```
pub mod prelude;

pub use crate::error::Error;
pub use crate::metadata::tables::MarshalTables;
pub use crate::metadata::validation::ValidationConfig;
pub use crate::resolver::MarshalResolver;

/// The result type used throughout marshalpoint.
pub type Result<T> = std::result::Result<T, Error>;
