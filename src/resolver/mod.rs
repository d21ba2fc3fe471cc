//! The resolve-and-publish core.
//!
//! [`MarshalResolver`] turns the numeric identifiers baked into a native
//! call site into a directly callable entry point and publishes it into the
//! caller's slot. Resolution walks image → class → method → entry point,
//! caching the class handle along the way, and classifies any miss into the
//! most specific [`Error`](crate::Error) variant available.
//!
//! Two entry-point variants share the algorithm and differ only in slot
//! publication: [`MarshalResolver::resolve_at_startup`] runs inside the
//! single-threaded initialization window and uses a plain store, while
//! [`MarshalResolver::resolve_at_runtime`] may race against concurrent
//! readers and uses a release store.
//!
//! # Examples
//!
//! ```rust,no_run
//! use marshalpoint::metadata::token::{ClassIndex, ImageIndex, MethodToken};
//! use marshalpoint::runtime::{FunctionPointerSlot, ImageRegistry, RuntimeHost};
//! use marshalpoint::MarshalResolver;
//!
//! fn resolve_on_create<H: RuntimeHost, I: ImageRegistry>(
//!     resolver: &MarshalResolver,
//!     host: &H,
//!     images: &I,
//! ) -> marshalpoint::Result<()> {
//!     static SLOT: FunctionPointerSlot = FunctionPointerSlot::new();
//!
//!     resolver.resolve_at_runtime(
//!         host,
//!         images,
//!         ImageIndex(2),
//!         ClassIndex(0),
//!         MethodToken(0x0600_001A),
//!         &SLOT,
//!     )?;
//!
//!     // The slot is now non-null and callable; later callers can read it
//!     // directly without going through the resolver again.
//!     assert!(SLOT.get().is_some());
//!     Ok(())
//! }
//! ```

mod bridge;
mod cache;

pub use bridge::{ManagedLookupFn, ManagedLookupTarget};
pub use cache::ClassHandleCache;

use tracing::debug;

use crate::{
    metadata::{
        names::UNKNOWN,
        tables::MarshalTables,
        token::{AssemblyIndex, ClassIndex, ImageIndex, MethodIndex, MethodToken},
    },
    runtime::{
        AttachedThread, ClassHandle, FunctionPointerSlot, ImageHandle, ImageRegistry,
        NativeEntryPoint, Publication, RuntimeHost,
    },
    Error, Result,
};

use bridge::ManagedLookupBridge;

/// The marshal method resolver: tables, class cache and fallback bridge in
/// one process-scoped value.
///
/// The embedder constructs exactly one of these around the build-generated
/// tables and passes it by reference wherever resolution happens - there is
/// no implicit global state anywhere in this crate.
#[derive(Debug)]
pub struct MarshalResolver {
    tables: MarshalTables,
    class_cache: ClassHandleCache,
    bridge: ManagedLookupBridge,
}

impl MarshalResolver {
    /// Creates a resolver over validated tables.
    ///
    /// The class handle cache is sized from the tables' class token table;
    /// `lookup_target` names the managed helper the fallback bridge binds to
    /// on first use.
    #[must_use]
    pub fn new(tables: MarshalTables, lookup_target: ManagedLookupTarget) -> Self {
        let class_cache = ClassHandleCache::new(tables.class_tokens());
        Self {
            tables,
            class_cache,
            bridge: ManagedLookupBridge::new(lookup_target),
        }
    }

    /// The tables this resolver was built around.
    #[must_use]
    pub fn tables(&self) -> &MarshalTables {
        &self.tables
    }

    /// The class handle cache.
    #[must_use]
    pub fn class_cache(&self) -> &ClassHandleCache {
        &self.class_cache
    }

    /// Resolves a marshal method during single-threaded startup.
    ///
    /// Publication uses a plain store - legitimate only while no other
    /// thread can observe the slot yet.
    ///
    /// # Errors
    /// See [`MarshalResolver::resolve_at_runtime`]; the two variants share
    /// every failure mode.
    pub fn resolve_at_startup<H: RuntimeHost, I: ImageRegistry>(
        &self,
        host: &H,
        images: &I,
        image_index: ImageIndex,
        class_index: ClassIndex,
        method_token: MethodToken,
        slot: &FunctionPointerSlot,
    ) -> Result<NativeEntryPoint> {
        self.resolve(
            host,
            images,
            image_index,
            class_index,
            method_token,
            slot,
            Publication::Startup,
        )
    }

    /// Resolves a marshal method from an arbitrary native thread.
    ///
    /// Publication uses a release store so a concurrent reader doing an
    /// acquire load observes either null or the fully published pointer.
    /// Callers racing to fill the same logical slot all publish the
    /// identical value.
    ///
    /// # Errors
    /// - [`Error::ClassIndexOutOfRange`] - contract violation from the code
    ///   generator
    /// - [`Error::ImageNotFound`] - the image registry has no module for
    ///   `image_index`
    /// - [`Error::ClassNotFound`] - the class token did not resolve
    /// - [`Error::MethodNotFound`] - the method token did not resolve
    /// - [`Error::EntryPointUnavailable`] - the runtime produced no native
    ///   pointer; carries the runtime's own message when available
    pub fn resolve_at_runtime<H: RuntimeHost, I: ImageRegistry>(
        &self,
        host: &H,
        images: &I,
        image_index: ImageIndex,
        class_index: ClassIndex,
        method_token: MethodToken,
        slot: &FunctionPointerSlot,
    ) -> Result<NativeEntryPoint> {
        self.resolve(
            host,
            images,
            image_index,
            class_index,
            method_token,
            slot,
            Publication::Runtime,
        )
    }

    /// Resolves through the managed lookup helper instead of the native
    /// metadata path.
    ///
    /// The helper's entry point is acquired on first use and memoized for
    /// the process lifetime; managed code performs the resolution and writes
    /// `slot` itself.
    ///
    /// # Errors
    /// - [`Error::DefaultLoadContextUnset`] - no default assembly load
    ///   context has been established
    /// - [`Error::BridgeAssemblyNotFound`], [`Error::BridgeClassNotFound`],
    ///   [`Error::BridgeMethodNotFound`] - a helper artifact is missing
    /// - [`Error::BridgeEntryPoint`] - the runtime failed to produce the
    ///   helper's entry point
    pub fn resolve_via_managed_bridge<H: RuntimeHost>(
        &self,
        host: &H,
        assembly_index: AssemblyIndex,
        class_index: ClassIndex,
        method_index: MethodIndex,
        slot: &FunctionPointerSlot,
    ) -> Result<()> {
        self.bridge
            .lookup(host, assembly_index, class_index, method_index, slot)
    }

    fn resolve<H: RuntimeHost, I: ImageRegistry>(
        &self,
        host: &H,
        images: &I,
        image_index: ImageIndex,
        class_index: ClassIndex,
        method_token: MethodToken,
        slot: &FunctionPointerSlot,
        publication: Publication,
    ) -> Result<NativeEntryPoint> {
        debug!(
            method = self.tables.method_name(image_index, method_token),
            token = %method_token,
            class = self.tables.class_name(class_index),
            class_index = class_index.value(),
            "resolving marshal method entry point"
        );

        let Some(entry) = self.class_cache.entry(class_index) else {
            return Err(Error::ClassIndexOutOfRange {
                expected_max: self.tables.class_count().saturating_sub(1),
                index: class_index.value(),
            });
        };

        // Runtime APIs cannot be invoked from threads that are not attached
        // to the runtime.
        let thread = AttachedThread::new(host);

        let image = images.image_from_index(image_index);
        let class = entry.get_or_resolve(&thread, image);

        let method = match (image, class) {
            (Some(image), Some(class)) => thread.method_from_token(image, class, method_token),
            _ => None,
        };

        let Some(method) = method else {
            return Err(self.classify_miss(image, class, image_index, class_index, method_token));
        };

        let entry_point = thread.native_entry_point(method).map_err(|failure| {
            Error::EntryPointUnavailable {
                method: self.tables.method_name(image_index, method_token).to_string(),
                class: self.tables.class_name(class_index).to_string(),
                image_index,
                class_index,
                method_token,
                cause: failure
                    .message
                    .unwrap_or_else(|| "Failure to obtain marshal methods function pointer".to_string()),
            }
        })?;

        slot.publish(entry_point, publication);

        debug!(
            method = thread
                .method_full_name(method)
                .as_deref()
                .unwrap_or(UNKNOWN),
            entry_point = ?entry_point,
            image_index = image_index.value(),
            class_index = class_index.value(),
            token = %method_token,
            "published marshal method entry point"
        );

        Ok(entry_point)
    }

    fn classify_miss(
        &self,
        image: Option<ImageHandle>,
        class: Option<ClassHandle>,
        image_index: ImageIndex,
        class_index: ClassIndex,
        method_token: MethodToken,
    ) -> Error {
        let method = self.tables.method_name(image_index, method_token).to_string();
        let class_name = self.tables.class_name(class_index).to_string();

        if image.is_none() {
            Error::ImageNotFound {
                method,
                class: class_name,
                image_index,
                class_index,
                method_token,
            }
        } else if class.is_none() {
            Error::ClassNotFound {
                method,
                class: class_name,
                image_index,
                class_index,
                method_token,
            }
        } else {
            Error::MethodNotFound {
                method,
                class: class_name,
                image_index,
                class_index,
                method_token,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::names::MethodNameEntry;
    use crate::metadata::token::ClassToken;
    use crate::test::{MockHost, MockImages};
    use std::sync::Arc;
    use std::thread;

    const IMAGE_ADDR: usize = 0x1000;
    const CLASS_ADDR: usize = 0x2000;
    const METHOD_ADDR: usize = 0x3000;
    const ENTRY_ADDR: usize = 0x4000;

    static METHOD_NAMES: &[MethodNameEntry] = &[
        MethodNameEntry {
            id: (2u64 << 32) | 0x0600_001A,
            name: "OnCreate",
        },
        MethodNameEntry { id: 0, name: "" },
    ];
    static CLASS_NAMES: &[&str] = &["MainActivity"];
    static CLASS_TOKENS: &[ClassToken] = &[ClassToken(0x0200_0002)];

    fn resolver() -> MarshalResolver {
        let tables = MarshalTables::new(METHOD_NAMES, CLASS_NAMES, CLASS_TOKENS).unwrap();
        MarshalResolver::new(
            tables,
            ManagedLookupTarget {
                assembly: "Interop.Lookup",
                namespace: "Interop",
                class: "LookupTable",
                method: "GetFunctionPointer",
            },
        )
    }

    fn full_host() -> MockHost {
        MockHost::new()
            .with_class(IMAGE_ADDR, ClassToken(0x0200_0002), CLASS_ADDR)
            .with_method(CLASS_ADDR, MethodToken(0x0600_001A), METHOD_ADDR)
            .with_entry_point(METHOD_ADDR, ENTRY_ADDR)
    }

    fn images() -> MockImages {
        MockImages::new().with_image(ImageIndex(2), IMAGE_ADDR)
    }

    #[test]
    fn test_runtime_resolve_publishes_slot() {
        let resolver = resolver();
        let host = full_host();
        let images = images();
        let slot = FunctionPointerSlot::new();

        let entry_point = resolver
            .resolve_at_runtime(
                &host,
                &images,
                ImageIndex(2),
                ClassIndex(0),
                MethodToken(0x0600_001A),
                &slot,
            )
            .unwrap();

        assert_eq!(entry_point.addr().get(), ENTRY_ADDR);
        assert_eq!(slot.get(), Some(entry_point));
        assert_eq!(host.attach_count(), 1);
    }

    #[test]
    fn test_startup_resolve_publishes_slot() {
        let resolver = resolver();
        let host = full_host();
        let images = images();
        let slot = FunctionPointerSlot::new();

        resolver
            .resolve_at_startup(
                &host,
                &images,
                ImageIndex(2),
                ClassIndex(0),
                MethodToken(0x0600_001A),
                &slot,
            )
            .unwrap();

        assert_eq!(slot.get().unwrap().addr().get(), ENTRY_ADDR);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let resolver = resolver();
        let host = full_host();
        let images = images();
        let slot = FunctionPointerSlot::new();

        let first = resolver
            .resolve_at_runtime(
                &host,
                &images,
                ImageIndex(2),
                ClassIndex(0),
                MethodToken(0x0600_001A),
                &slot,
            )
            .unwrap();
        let second = resolver
            .resolve_at_runtime(
                &host,
                &images,
                ImageIndex(2),
                ClassIndex(0),
                MethodToken(0x0600_001A),
                &slot,
            )
            .unwrap();

        assert_eq!(first, second);
        // The class was resolved once; the cache served the second call.
        assert_eq!(host.class_from_token_count(), 1);
    }

    #[test]
    fn test_out_of_range_class_index_is_contract_violation() {
        let resolver = resolver();
        let host = full_host();
        let images = images();
        let slot = FunctionPointerSlot::new();

        let result = resolver.resolve_at_runtime(
            &host,
            &images,
            ImageIndex(2),
            ClassIndex(1),
            MethodToken(0x0600_001A),
            &slot,
        );

        match result {
            Err(Error::ClassIndexOutOfRange { expected_max, index }) => {
                assert_eq!(expected_max, 0);
                assert_eq!(index, 1);
            }
            other => panic!("expected ClassIndexOutOfRange, got {other:?}"),
        }
        assert!(slot.get().is_none());
        // The contract check precedes every runtime call.
        assert_eq!(host.attach_count(), 0);
    }

    #[test]
    fn test_missing_image_classifies_specifically() {
        let resolver = resolver();
        let host = full_host();
        let images = MockImages::new();
        let slot = FunctionPointerSlot::new();

        let result = resolver.resolve_at_runtime(
            &host,
            &images,
            ImageIndex(2),
            ClassIndex(0),
            MethodToken(0x0600_001A),
            &slot,
        );

        match result {
            Err(Error::ImageNotFound { method, class, .. }) => {
                assert_eq!(method, "OnCreate");
                assert_eq!(class, "MainActivity");
            }
            other => panic!("expected ImageNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_class_classifies_specifically() {
        let resolver = resolver();
        let host = MockHost::new();
        let images = images();
        let slot = FunctionPointerSlot::new();

        let result = resolver.resolve_at_runtime(
            &host,
            &images,
            ImageIndex(2),
            ClassIndex(0),
            MethodToken(0x0600_001A),
            &slot,
        );
        assert!(matches!(result, Err(Error::ClassNotFound { .. })));
    }

    #[test]
    fn test_missing_method_classifies_specifically() {
        let resolver = resolver();
        let host = MockHost::new().with_class(IMAGE_ADDR, ClassToken(0x0200_0002), CLASS_ADDR);
        let images = images();
        let slot = FunctionPointerSlot::new();

        let result = resolver.resolve_at_runtime(
            &host,
            &images,
            ImageIndex(2),
            ClassIndex(0),
            MethodToken(0x0600_001A),
            &slot,
        );
        assert!(matches!(result, Err(Error::MethodNotFound { .. })));
    }

    #[test]
    fn test_entry_point_failure_carries_runtime_cause() {
        let resolver = resolver();
        let host = MockHost::new()
            .with_class(IMAGE_ADDR, ClassToken(0x0200_0002), CLASS_ADDR)
            .with_method(CLASS_ADDR, MethodToken(0x0600_001A), METHOD_ADDR)
            .with_entry_point_failure(METHOD_ADDR, "method has no unmanaged-callers-only wrapper");
        let images = images();
        let slot = FunctionPointerSlot::new();

        let result = resolver.resolve_at_runtime(
            &host,
            &images,
            ImageIndex(2),
            ClassIndex(0),
            MethodToken(0x0600_001A),
            &slot,
        );

        match result {
            Err(Error::EntryPointUnavailable { cause, .. }) => {
                assert_eq!(cause, "method has no unmanaged-callers-only wrapper");
            }
            other => panic!("expected EntryPointUnavailable, got {other:?}"),
        }
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_entry_point_failure_without_message_gets_generic_cause() {
        let resolver = resolver();
        let host = MockHost::new()
            .with_class(IMAGE_ADDR, ClassToken(0x0200_0002), CLASS_ADDR)
            .with_method(CLASS_ADDR, MethodToken(0x0600_001A), METHOD_ADDR);
        let images = images();
        let slot = FunctionPointerSlot::new();

        let result = resolver.resolve_at_runtime(
            &host,
            &images,
            ImageIndex(2),
            ClassIndex(0),
            MethodToken(0x0600_001A),
            &slot,
        );

        match result {
            Err(Error::EntryPointUnavailable { cause, .. }) => {
                assert_eq!(cause, "Failure to obtain marshal methods function pointer");
            }
            other => panic!("expected EntryPointUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_concurrent_runtime_resolution_converges() {
        let resolver = Arc::new(resolver());
        let host = Arc::new(full_host());
        let images = Arc::new(images());
        let slot = Arc::new(FunctionPointerSlot::new());

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                let host = Arc::clone(&host);
                let images = Arc::clone(&images);
                let slot = Arc::clone(&slot);
                thread::spawn(move || {
                    resolver
                        .resolve_at_runtime(
                            &*host,
                            &*images,
                            ImageIndex(2),
                            ClassIndex(0),
                            MethodToken(0x0600_001A),
                            &slot,
                        )
                        .unwrap()
                })
            })
            .collect();

        for thread in threads {
            assert_eq!(thread.join().unwrap().addr().get(), ENTRY_ADDR);
        }
        assert_eq!(slot.get().unwrap().addr().get(), ENTRY_ADDR);
    }
}
