//! Shared mock collaborators used by unit tests.
//!
//! [`MockHost`] is a scripted [`RuntimeHost`]: tests register the handles it
//! should hand out, and it counts how often each operation was invoked so
//! tests can assert on caching behavior. All state is set up before use and
//! immutable afterwards, which keeps the mock `Sync` for the concurrency
//! tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    metadata::token::{ClassToken, ImageIndex, MethodToken},
    runtime::{
        AssemblyHandle, ClassHandle, ImageHandle, ImageRegistry, LoadContextHandle, MethodHandle,
        NativeEntryPoint, RuntimeFailure, RuntimeHost,
    },
};

/// A scripted runtime host for tests.
#[derive(Debug, Default)]
pub(crate) struct MockHost {
    classes: HashMap<(usize, u32), usize>,
    methods: HashMap<(usize, u32), usize>,
    entry_points: HashMap<usize, usize>,
    entry_point_failures: HashMap<usize, String>,
    default_load_context: Option<usize>,
    assemblies: HashMap<String, (usize, usize)>,
    named_classes: HashMap<(usize, String, String), usize>,
    named_methods: HashMap<(usize, String, u32), usize>,

    attach_count: AtomicUsize,
    class_from_token_count: AtomicUsize,
    method_from_token_count: AtomicUsize,
    native_entry_point_count: AtomicUsize,
    load_assembly_count: AtomicUsize,
}

impl MockHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a class resolvable from `(image, token)`.
    pub(crate) fn with_class(mut self, image: usize, token: ClassToken, class: usize) -> Self {
        self.classes.insert((image, token.value()), class);
        self
    }

    /// Registers a method resolvable from `(class, token)`.
    pub(crate) fn with_method(mut self, class: usize, token: MethodToken, method: usize) -> Self {
        self.methods.insert((class, token.value()), method);
        self
    }

    /// Registers a native entry point for a resolved method.
    pub(crate) fn with_entry_point(mut self, method: usize, entry_point: usize) -> Self {
        self.entry_points.insert(method, entry_point);
        self
    }

    /// Scripts an entry-point failure with a runtime-provided message.
    pub(crate) fn with_entry_point_failure(mut self, method: usize, message: &str) -> Self {
        self.entry_point_failures.insert(method, message.to_string());
        self
    }

    /// Establishes the default assembly load context.
    pub(crate) fn with_default_load_context(mut self, context: usize) -> Self {
        self.default_load_context = Some(context);
        self
    }

    /// Registers a loadable assembly and its backing image.
    pub(crate) fn with_assembly(mut self, name: &str, assembly: usize, image: usize) -> Self {
        self.assemblies.insert(name.to_string(), (assembly, image));
        self
    }

    /// Registers a class locatable by namespace and name.
    pub(crate) fn with_named_class(
        mut self,
        image: usize,
        namespace: &str,
        name: &str,
        class: usize,
    ) -> Self {
        self.named_classes
            .insert((image, namespace.to_string(), name.to_string()), class);
        self
    }

    /// Registers a method locatable by name and parameter count.
    pub(crate) fn with_named_method(
        mut self,
        class: usize,
        name: &str,
        param_count: u32,
        method: usize,
    ) -> Self {
        self.named_methods
            .insert((class, name.to_string(), param_count), method);
        self
    }

    pub(crate) fn attach_count(&self) -> usize {
        self.attach_count.load(Ordering::SeqCst)
    }

    pub(crate) fn class_from_token_count(&self) -> usize {
        self.class_from_token_count.load(Ordering::SeqCst)
    }

    pub(crate) fn native_entry_point_count(&self) -> usize {
        self.native_entry_point_count.load(Ordering::SeqCst)
    }

    pub(crate) fn load_assembly_count(&self) -> usize {
        self.load_assembly_count.load(Ordering::SeqCst)
    }
}

impl RuntimeHost for MockHost {
    fn attach_current_thread(&self) {
        self.attach_count.fetch_add(1, Ordering::SeqCst);
    }

    fn class_from_token(&self, image: ImageHandle, token: ClassToken) -> Option<ClassHandle> {
        self.class_from_token_count.fetch_add(1, Ordering::SeqCst);
        self.classes
            .get(&(image.addr().get(), token.value()))
            .and_then(|&addr| ClassHandle::from_addr(addr))
    }

    fn method_from_token(
        &self,
        _image: ImageHandle,
        class: ClassHandle,
        token: MethodToken,
    ) -> Option<MethodHandle> {
        self.method_from_token_count.fetch_add(1, Ordering::SeqCst);
        self.methods
            .get(&(class.addr().get(), token.value()))
            .and_then(|&addr| MethodHandle::from_addr(addr))
    }

    fn native_entry_point(
        &self,
        method: MethodHandle,
    ) -> Result<NativeEntryPoint, RuntimeFailure> {
        self.native_entry_point_count.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.entry_point_failures.get(&method.addr().get()) {
            return Err(RuntimeFailure::with_message(message.clone()));
        }
        self.entry_points
            .get(&method.addr().get())
            .and_then(|&addr| NativeEntryPoint::from_addr(addr))
            .ok_or_else(RuntimeFailure::unspecified)
    }

    fn method_full_name(&self, method: MethodHandle) -> Option<String> {
        Some(format!("Mock.Method@{:#x}", method.addr()))
    }

    fn default_load_context(&self) -> Option<LoadContextHandle> {
        self.default_load_context
            .and_then(LoadContextHandle::from_addr)
    }

    fn load_assembly(&self, _context: LoadContextHandle, name: &str) -> Option<AssemblyHandle> {
        self.load_assembly_count.fetch_add(1, Ordering::SeqCst);
        self.assemblies
            .get(name)
            .and_then(|&(assembly, _)| AssemblyHandle::from_addr(assembly))
    }

    fn assembly_image(&self, assembly: AssemblyHandle) -> ImageHandle {
        let image = self
            .assemblies
            .values()
            .find(|&&(addr, _)| addr == assembly.addr().get())
            .map_or(usize::MAX, |&(_, image)| image);
        ImageHandle::from_addr(image).expect("mock assembly without an image")
    }

    fn class_from_name(
        &self,
        image: ImageHandle,
        namespace: &str,
        name: &str,
    ) -> Option<ClassHandle> {
        self.named_classes
            .get(&(image.addr().get(), namespace.to_string(), name.to_string()))
            .and_then(|&addr| ClassHandle::from_addr(addr))
    }

    fn method_from_name(
        &self,
        class: ClassHandle,
        name: &str,
        param_count: u32,
    ) -> Option<MethodHandle> {
        self.named_methods
            .get(&(class.addr().get(), name.to_string(), param_count))
            .and_then(|&addr| MethodHandle::from_addr(addr))
    }
}

/// A scripted image registry for tests.
#[derive(Debug, Default)]
pub(crate) struct MockImages {
    images: HashMap<u32, usize>,
}

impl MockImages {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a loaded image for an index.
    pub(crate) fn with_image(mut self, index: ImageIndex, image: usize) -> Self {
        self.images.insert(index.value(), image);
        self
    }
}

impl ImageRegistry for MockImages {
    fn image_from_index(&self, index: ImageIndex) -> Option<ImageHandle> {
        self.images
            .get(&index.value())
            .and_then(|&addr| ImageHandle::from_addr(addr))
    }
}
