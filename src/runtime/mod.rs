//! Interfaces of the external collaborators.
//!
//! This crate never talks to a managed runtime directly - everything it
//! consumes is behind the traits in this module, implemented by the
//! embedder against the actual hosting runtime:
//!
//! - [`RuntimeHost`] - thread registration, token/name resolution, native
//!   entry point production, assembly loading
//! - [`ImageRegistry`] - maps build-generated image indices to loaded module
//!   images; a miss is quiet, never an error
//! - [`ProcessLifecycle`] - process abort for the terminate-on-failure
//!   wrappers in [`crate::entry`]
//!
//! Runtime APIs must not be invoked from native threads that are not
//! registered with the runtime. The [`AttachedThread`] capability makes that
//! ordering structural: it is the only path this crate uses to reach the
//! host, and constructing it performs the (idempotent) registration first.

mod handles;

pub use handles::{
    AssemblyHandle, ClassHandle, FunctionPointerSlot, ImageHandle, LoadContextHandle,
    MethodHandle, NativeEntryPoint,
};
pub(crate) use handles::Publication;

use crate::metadata::token::{ClassToken, ImageIndex, MethodToken};

/// Failure reported by the managed runtime while producing a native entry
/// point.
///
/// Mirrors the runtime's own error-reporting mechanism: the runtime may or
/// may not attach a message to a failure, and the resolver falls back to a
/// generic description when it does not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeFailure {
    /// The runtime's own error message, when it produced one.
    pub message: Option<String>,
}

impl RuntimeFailure {
    /// A failure without a runtime-provided message.
    #[must_use]
    pub fn unspecified() -> Self {
        Self::default()
    }

    /// A failure carrying the runtime's error message.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// The managed runtime hosting the process.
///
/// All handle-returning operations model the runtime's null returns as
/// `None`; classification of a miss into a specific error is the resolver's
/// job, not the host's.
pub trait RuntimeHost {
    /// Registers the calling native thread with the runtime.
    ///
    /// Idempotent - safe to call on an already-registered thread. Invoked
    /// through [`AttachedThread::new`] before any other host operation.
    fn attach_current_thread(&self);

    /// Resolves a class from its metadata token within a module image.
    fn class_from_token(&self, image: ImageHandle, token: ClassToken) -> Option<ClassHandle>;

    /// Resolves a method from its metadata token within a resolved class.
    fn method_from_token(
        &self,
        image: ImageHandle,
        class: ClassHandle,
        token: MethodToken,
    ) -> Option<MethodHandle>;

    /// Asks the runtime for a directly callable native entry point for a
    /// resolved method.
    ///
    /// # Errors
    /// Returns the runtime's own failure report when no entry point could be
    /// produced.
    fn native_entry_point(&self, method: MethodHandle)
        -> Result<NativeEntryPoint, RuntimeFailure>;

    /// The fully qualified name of a resolved method, for diagnostics.
    fn method_full_name(&self, method: MethodHandle) -> Option<String>;

    /// The default assembly load context, once the embedder has established
    /// one.
    fn default_load_context(&self) -> Option<LoadContextHandle>;

    /// Loads an assembly by name into a load context.
    fn load_assembly(&self, context: LoadContextHandle, name: &str) -> Option<AssemblyHandle>;

    /// The module image backing a loaded assembly.
    fn assembly_image(&self, assembly: AssemblyHandle) -> ImageHandle;

    /// Locates a class by namespace and name within a module image.
    fn class_from_name(
        &self,
        image: ImageHandle,
        namespace: &str,
        name: &str,
    ) -> Option<ClassHandle>;

    /// Locates a method by name and parameter count within a class.
    fn method_from_name(
        &self,
        class: ClassHandle,
        name: &str,
        param_count: u32,
    ) -> Option<MethodHandle>;
}

/// Maps build-generated image indices to loaded module images.
///
/// A separate collaborator from [`RuntimeHost`]: image loading has its own
/// lifecycle in the embedder, and a lookup miss is an ordinary `None`, never
/// a loud failure.
pub trait ImageRegistry {
    /// Looks up the loaded module image for `index`.
    fn image_from_index(&self, index: ImageIndex) -> Option<ImageHandle>;
}

/// The process-lifecycle collaborator.
pub trait ProcessLifecycle {
    /// Terminates the process with a diagnostic message. Never returns.
    fn abort_application(&self, message: &str) -> !;
}

/// Proof that the current native thread is registered with the runtime.
///
/// Construction performs the registration (idempotent), and every runtime
/// call this crate makes goes through one of these - so no code path can
/// reach the host from an unregistered thread.
pub struct AttachedThread<'h, H: RuntimeHost + ?Sized> {
    host: &'h H,
}

impl<'h, H: RuntimeHost + ?Sized> AttachedThread<'h, H> {
    /// Registers the calling thread and returns the capability.
    pub fn new(host: &'h H) -> Self {
        host.attach_current_thread();
        Self { host }
    }

    /// See [`RuntimeHost::class_from_token`].
    pub fn class_from_token(&self, image: ImageHandle, token: ClassToken) -> Option<ClassHandle> {
        self.host.class_from_token(image, token)
    }

    /// See [`RuntimeHost::method_from_token`].
    pub fn method_from_token(
        &self,
        image: ImageHandle,
        class: ClassHandle,
        token: MethodToken,
    ) -> Option<MethodHandle> {
        self.host.method_from_token(image, class, token)
    }

    /// See [`RuntimeHost::native_entry_point`].
    pub fn native_entry_point(
        &self,
        method: MethodHandle,
    ) -> Result<NativeEntryPoint, RuntimeFailure> {
        self.host.native_entry_point(method)
    }

    /// See [`RuntimeHost::method_full_name`].
    pub fn method_full_name(&self, method: MethodHandle) -> Option<String> {
        self.host.method_full_name(method)
    }

    /// See [`RuntimeHost::load_assembly`].
    pub fn load_assembly(
        &self,
        context: LoadContextHandle,
        name: &str,
    ) -> Option<AssemblyHandle> {
        self.host.load_assembly(context, name)
    }

    /// See [`RuntimeHost::assembly_image`].
    pub fn assembly_image(&self, assembly: AssemblyHandle) -> ImageHandle {
        self.host.assembly_image(assembly)
    }

    /// See [`RuntimeHost::class_from_name`].
    pub fn class_from_name(
        &self,
        image: ImageHandle,
        namespace: &str,
        name: &str,
    ) -> Option<ClassHandle> {
        self.host.class_from_name(image, namespace, name)
    }

    /// See [`RuntimeHost::method_from_name`].
    pub fn method_from_name(
        &self,
        class: ClassHandle,
        name: &str,
        param_count: u32,
    ) -> Option<MethodHandle> {
        self.host.method_from_name(class, name, param_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::MockHost;

    #[test]
    fn test_attached_thread_registers_on_construction() {
        let host = MockHost::new();
        assert_eq!(host.attach_count(), 0);

        let _thread = AttachedThread::new(&host);
        assert_eq!(host.attach_count(), 1);

        // Idempotent from the host's perspective - a second capability just
        // re-registers.
        let _thread = AttachedThread::new(&host);
        assert_eq!(host.attach_count(), 2);
    }
}
