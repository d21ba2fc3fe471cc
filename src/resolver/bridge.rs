//! The managed-lookup fallback bridge.
//!
//! A secondary resolution path that defers entirely to managed code: the
//! code generator emits a lookup helper into a well-known assembly, and this
//! bridge acquires that helper's native entry point once, memoizes it for
//! the process lifetime, and forwards lookups to it. Managed code performs
//! its own resolution and writes the caller's slot directly.

use std::ffi::c_void;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::{
    metadata::token::{AssemblyIndex, ClassIndex, MethodIndex},
    runtime::{AttachedThread, FunctionPointerSlot, RuntimeHost},
    Error, Result,
};

/// Native signature of the generated managed lookup helper.
///
/// The helper receives the three lookup-table indices and the caller's slot
/// cell, resolves the method in managed code and writes the slot itself.
pub type ManagedLookupFn = unsafe extern "C" fn(u32, u32, u32, *mut *mut c_void);

/// Parameter count of the managed lookup helper, fixed by [`ManagedLookupFn`].
const LOOKUP_PARAM_COUNT: u32 = 4;

/// Coordinates of the well-known managed lookup helper.
///
/// The original identifiers are emitted by the code generator; the embedder
/// passes them in at resolver construction so the contract stays explicit
/// and versionable.
#[derive(Debug, Clone)]
pub struct ManagedLookupTarget {
    /// Name of the assembly hosting the helper
    pub assembly: &'static str,
    /// Namespace of the helper class
    pub namespace: &'static str,
    /// Name of the helper class
    pub class: &'static str,
    /// Name of the 4-argument helper method
    pub method: &'static str,
}

/// The memoized bridge to the managed lookup helper.
///
/// State machine: unresolved → (first lookup) → resolved, cached for the
/// process lifetime. Acquisition failures propagate to the caller and leave
/// the bridge unresolved; concurrent first lookups acquire at most once.
#[derive(Debug)]
pub(crate) struct ManagedLookupBridge {
    target: ManagedLookupTarget,
    entry_point: OnceCell<ManagedLookupFn>,
}

impl ManagedLookupBridge {
    pub(crate) fn new(target: ManagedLookupTarget) -> Self {
        Self {
            target,
            entry_point: OnceCell::new(),
        }
    }

    /// Whether the helper's entry point has been acquired.
    pub(crate) fn is_resolved(&self) -> bool {
        self.entry_point.get().is_some()
    }

    /// Forwards a lookup to the managed helper, acquiring its entry point on
    /// first use.
    pub(crate) fn lookup<H: RuntimeHost>(
        &self,
        host: &H,
        assembly_index: AssemblyIndex,
        class_index: ClassIndex,
        method_index: MethodIndex,
        slot: &FunctionPointerSlot,
    ) -> Result<()> {
        let lookup = *self
            .entry_point
            .get_or_try_init(|| self.acquire(host))?;

        // SAFETY: the entry point was produced by the runtime for the
        // generated helper whose native signature is `ManagedLookupFn`, and
        // the slot cell outlives the call.
        unsafe { lookup(assembly_index.value(), class_index.value(), method_index.value(), slot.as_raw_cell()) };
        Ok(())
    }

    /// Acquires the helper's native entry point.
    ///
    /// Requires a previously established default assembly load context; each
    /// missing artifact maps to its own error variant.
    fn acquire<H: RuntimeHost>(&self, host: &H) -> Result<ManagedLookupFn> {
        debug!(
            assembly = self.target.assembly,
            class = self.target.class,
            method = self.target.method,
            "acquiring managed lookup entry point"
        );

        let context = host
            .default_load_context()
            .ok_or(Error::DefaultLoadContextUnset)?;

        let thread = AttachedThread::new(host);

        let assembly = thread
            .load_assembly(context, self.target.assembly)
            .ok_or(Error::BridgeAssemblyNotFound {
                assembly: self.target.assembly,
            })?;
        let image = thread.assembly_image(assembly);

        let class = thread
            .class_from_name(image, self.target.namespace, self.target.class)
            .ok_or(Error::BridgeClassNotFound {
                namespace: self.target.namespace,
                class: self.target.class,
                assembly: self.target.assembly,
            })?;

        let method = thread
            .method_from_name(class, self.target.method, LOOKUP_PARAM_COUNT)
            .ok_or(Error::BridgeMethodNotFound {
                class: self.target.class,
                method: self.target.method,
            })?;

        let entry_point = thread.native_entry_point(method).map_err(|failure| {
            Error::BridgeEntryPoint {
                cause: failure.message.unwrap_or_else(|| {
                    format!(
                        "Failure to obtain the {}.{} lookup method entry point",
                        self.target.class, self.target.method
                    )
                }),
            }
        })?;

        // SAFETY: the helper is generated with the exact native signature of
        // `ManagedLookupFn`; function pointers and addresses have the same
        // size and representation on all supported targets.
        Ok(unsafe { std::mem::transmute::<usize, ManagedLookupFn>(entry_point.addr().get()) })
    }
}
