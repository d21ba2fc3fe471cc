//! The lazy class handle cache.
//!
//! One slot per class the code generator knows about, created unresolved and
//! filled on first use. The cache is deliberately lock-free: concurrent
//! first accesses to the same slot may each resolve the token independently
//! and store the handle redundantly, which is safe because resolution is
//! deterministic - the same class token against the same image always yields
//! the same handle - and the atomic slot rules out tearing.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    metadata::token::{ClassIndex, ClassToken},
    runtime::{AttachedThread, ClassHandle, ImageHandle, RuntimeHost},
};

/// One class slot: the metadata token to resolve and the handle, once
/// resolved. A stored value of zero means unresolved.
#[derive(Debug)]
pub(crate) struct ClassCacheEntry {
    token: ClassToken,
    handle: AtomicUsize,
}

impl ClassCacheEntry {
    fn new(token: ClassToken) -> Self {
        Self {
            token,
            handle: AtomicUsize::new(0),
        }
    }

    /// The already-resolved handle, if any.
    pub(crate) fn cached(&self) -> Option<ClassHandle> {
        ClassHandle::from_addr(self.handle.load(Ordering::Acquire))
    }

    /// Returns the cached handle or resolves it from the token.
    ///
    /// A `None` from the runtime - image absent or class genuinely missing -
    /// is not stored and not fatal here; it surfaces as a resolution failure
    /// one layer up, and a later call retries the deterministic resolution.
    pub(crate) fn get_or_resolve<H: RuntimeHost + ?Sized>(
        &self,
        thread: &AttachedThread<'_, H>,
        image: Option<ImageHandle>,
    ) -> Option<ClassHandle> {
        if let Some(handle) = self.cached() {
            return Some(handle);
        }

        let resolved = thread.class_from_token(image?, self.token)?;
        // Racing resolvers store the same deterministic value.
        self.handle.store(resolved.addr().get(), Ordering::Release);
        Some(resolved)
    }
}

/// The process-wide class handle cache, one entry per known class.
///
/// Built from the generated class token table at resolver construction and
/// never grown or destroyed afterwards.
#[derive(Debug)]
pub struct ClassHandleCache {
    entries: Box<[ClassCacheEntry]>,
}

impl ClassHandleCache {
    pub(crate) fn new(tokens: &[ClassToken]) -> Self {
        Self {
            entries: tokens.iter().map(|&token| ClassCacheEntry::new(token)).collect(),
        }
    }

    /// The number of class slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the generator emitted no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The slot for `class_index`, or `None` when the index is out of range.
    pub(crate) fn entry(&self, class_index: ClassIndex) -> Option<&ClassCacheEntry> {
        self.entries.get(class_index.value() as usize)
    }
}
