//! Opaque handles and the caller-owned function pointer slot.
//!
//! Every handle the managed runtime gives out is carried as a nonzero
//! address wrapped in a dedicated newtype. The crate never dereferences a
//! handle - they only flow back into the runtime collaborator - so the
//! wrappers stay `Copy`, thread-safe and free of lifetime entanglement.

use std::ffi::c_void;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicPtr, Ordering};

macro_rules! opaque_handle {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(NonZeroUsize);

        impl $name {
            /// Wraps a raw handle pointer; `None` when the pointer is null.
            #[must_use]
            pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
                NonZeroUsize::new(ptr as usize).map(Self)
            }

            /// Wraps a raw handle address; `None` when the address is zero.
            #[must_use]
            pub fn from_addr(addr: usize) -> Option<Self> {
                NonZeroUsize::new(addr).map(Self)
            }

            /// The handle address exactly as the runtime gave it out.
            #[must_use]
            pub fn addr(self) -> NonZeroUsize {
                self.0
            }

            /// The handle as a raw pointer, for handing back to the runtime.
            #[must_use]
            pub fn as_ptr(self) -> *mut c_void {
                self.0.get() as *mut c_void
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:#x})"), self.0)
            }
        }
    };
}

opaque_handle! {
    /// Handle to a loaded module image.
    ImageHandle
}

opaque_handle! {
    /// Handle to a resolved class inside a module image.
    ClassHandle
}

opaque_handle! {
    /// Handle to a resolved method inside a class.
    MethodHandle
}

opaque_handle! {
    /// Handle to a loaded assembly.
    AssemblyHandle
}

opaque_handle! {
    /// Handle to an assembly load context.
    LoadContextHandle
}

opaque_handle! {
    /// A native-callable entry point produced by the runtime for a managed
    /// method.
    ///
    /// The address is directly callable with the method's generated native
    /// signature; this crate publishes it into caller slots and, for the
    /// managed lookup bridge, invokes it.
    NativeEntryPoint
}

/// Publication discipline for filling a [`FunctionPointerSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Publication {
    /// Single-threaded startup window - no concurrent reader can exist yet,
    /// a plain store suffices.
    Startup,
    /// Arbitrary native threads may already be reading the slot - the store
    /// must be release-ordered so an acquire reader sees a fully published
    /// pointer.
    Runtime,
}

/// A caller-owned cell a resolver publishes a native entry point into.
///
/// The cell starts null and is written at most logically once; concurrent
/// resolvers racing to fill the same slot all write the identical value, so
/// the race is benign. Once non-null the value never changes, and callers may
/// read it directly via [`FunctionPointerSlot::get`] without going through
/// the resolver again.
///
/// `#[repr(transparent)]` over an atomic pointer: the cell has the layout of
/// a plain pointer slot, which is what generated native call sites link
/// against.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct FunctionPointerSlot(AtomicPtr<c_void>);

impl FunctionPointerSlot {
    /// Creates an empty (null) slot.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicPtr::new(std::ptr::null_mut()))
    }

    /// Reads the slot with acquire ordering.
    ///
    /// Returns `None` while unpublished; once `Some`, the pointer is fully
    /// valid and callable.
    #[must_use]
    pub fn get(&self) -> Option<NativeEntryPoint> {
        NativeEntryPoint::from_ptr(self.0.load(Ordering::Acquire))
    }

    /// Publishes an entry point with the given discipline.
    pub(crate) fn publish(&self, entry_point: NativeEntryPoint, publication: Publication) {
        let ptr = entry_point.as_ptr();
        match publication {
            Publication::Startup => self.0.store(ptr, Ordering::Relaxed),
            Publication::Runtime => self.0.store(ptr, Ordering::Release),
        }
    }

    /// Raw access to the underlying cell, for handing to managed code that
    /// writes the slot itself.
    pub(crate) fn as_raw_cell(&self) -> *mut *mut c_void {
        self.0.as_ptr()
    }
}
