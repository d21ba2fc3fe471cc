//! Terminate-on-failure wrappers over the typed resolver API.
//!
//! The classic embedder policy treats a marshal method that cannot be
//! resolved as unrecoverable: the condition signals a code-generation or
//! environment mismatch that a retry cannot heal. These wrappers implement
//! that policy on top of the typed core - the full diagnostic is logged at
//! error level, then control is handed to the process-lifecycle
//! collaborator's abort, which does not return.
//!
//! Embedders that want a narrower recovery call the [`MarshalResolver`]
//! methods directly and handle the [`Error`](crate::Error) themselves.

use tracing::error;

use crate::{
    metadata::token::{AssemblyIndex, ClassIndex, ImageIndex, MethodIndex, MethodToken},
    resolver::MarshalResolver,
    runtime::{FunctionPointerSlot, ImageRegistry, ProcessLifecycle, RuntimeHost},
    Error,
};

/// Resolves a marshal method during single-threaded startup, aborting the
/// process on any failure.
pub fn resolve_at_startup_or_abort<H, I, L>(
    resolver: &MarshalResolver,
    host: &H,
    images: &I,
    lifecycle: &L,
    image_index: ImageIndex,
    class_index: ClassIndex,
    method_token: MethodToken,
    slot: &FunctionPointerSlot,
) where
    H: RuntimeHost,
    I: ImageRegistry,
    L: ProcessLifecycle,
{
    if let Err(err) = resolver.resolve_at_startup(
        host,
        images,
        image_index,
        class_index,
        method_token,
        slot,
    ) {
        fatal_resolution(resolver, lifecycle, image_index, class_index, method_token, &err);
    }
}

/// Resolves a marshal method from an arbitrary native thread, aborting the
/// process on any failure.
pub fn resolve_at_runtime_or_abort<H, I, L>(
    resolver: &MarshalResolver,
    host: &H,
    images: &I,
    lifecycle: &L,
    image_index: ImageIndex,
    class_index: ClassIndex,
    method_token: MethodToken,
    slot: &FunctionPointerSlot,
) where
    H: RuntimeHost,
    I: ImageRegistry,
    L: ProcessLifecycle,
{
    if let Err(err) = resolver.resolve_at_runtime(
        host,
        images,
        image_index,
        class_index,
        method_token,
        slot,
    ) {
        fatal_resolution(resolver, lifecycle, image_index, class_index, method_token, &err);
    }
}

/// Resolves through the managed lookup bridge, aborting the process on any
/// failure.
pub fn resolve_via_managed_bridge_or_abort<H, L>(
    resolver: &MarshalResolver,
    host: &H,
    lifecycle: &L,
    assembly_index: AssemblyIndex,
    class_index: ClassIndex,
    method_index: MethodIndex,
    slot: &FunctionPointerSlot,
) where
    H: RuntimeHost,
    L: ProcessLifecycle,
{
    if let Err(err) =
        resolver.resolve_via_managed_bridge(host, assembly_index, class_index, method_index, slot)
    {
        error!(
            assembly_index = assembly_index.value(),
            class_index = class_index.value(),
            method_index = method_index.value(),
            "managed lookup bridge failed"
        );
        lifecycle.abort_application(&err.to_string());
    }
}

fn fatal_resolution<L: ProcessLifecycle>(
    resolver: &MarshalResolver,
    lifecycle: &L,
    image_index: ImageIndex,
    class_index: ClassIndex,
    method_token: MethodToken,
    err: &Error,
) -> ! {
    error!(
        method = resolver.tables().method_name(image_index, method_token),
        class = resolver.tables().class_name(class_index),
        "failed to obtain marshal method function pointer"
    );
    error!(
        image_index = image_index.value(),
        class_index = class_index.value(),
        method_token = %method_token,
        "identifiers of the failed lookup"
    );
    lifecycle.abort_application(&err.to_string())
}
