use std::fmt;

/// Index of a module image within the build-generated image table.
///
/// Assigned by the code generator at build time and resolved to a loaded
/// module through the embedder's image registry. Opaque apart from equality
/// and its role in the packed [`MethodId`] diagnostic key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageIndex(pub u32);

impl ImageIndex {
    /// Creates a new image index from a raw value
    #[must_use]
    pub fn new(value: u32) -> Self {
        ImageIndex(value)
    }

    /// Returns the raw index value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ImageIndex {
    fn from(value: u32) -> Self {
        ImageIndex(value)
    }
}

impl fmt::Display for ImageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ImageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageIndex({})", self.0)
    }
}

/// Index of a class within the build-generated class tables.
///
/// Valid values are `0..class_count`; the resolver treats anything past the
/// end of the generated tables as an unrecoverable contract violation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassIndex(pub u32);

impl ClassIndex {
    /// Creates a new class index from a raw value
    #[must_use]
    pub fn new(value: u32) -> Self {
        ClassIndex(value)
    }

    /// Returns the raw index value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ClassIndex {
    fn from(value: u32) -> Self {
        ClassIndex(value)
    }
}

impl fmt::Display for ClassIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ClassIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassIndex({})", self.0)
    }
}

/// Index of an assembly within the managed lookup table.
///
/// Only meaningful to the managed lookup helper; this crate passes it through
/// unchanged.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssemblyIndex(pub u32);

impl AssemblyIndex {
    /// Creates a new assembly index from a raw value
    #[must_use]
    pub fn new(value: u32) -> Self {
        AssemblyIndex(value)
    }

    /// Returns the raw index value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AssemblyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for AssemblyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssemblyIndex({})", self.0)
    }
}

/// Index of a method within the managed lookup table.
///
/// Only meaningful to the managed lookup helper; this crate passes it through
/// unchanged.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodIndex(pub u32);

impl MethodIndex {
    /// Creates a new method index from a raw value
    #[must_use]
    pub fn new(value: u32) -> Self {
        MethodIndex(value)
    }

    /// Returns the raw index value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MethodIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for MethodIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodIndex({})", self.0)
    }
}

/// Metadata token of a method, as emitted into native call sites by the code
/// generator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodToken(pub u32);

impl MethodToken {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        MethodToken(value)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for MethodToken {
    fn from(value: u32) -> Self {
        MethodToken(value)
    }
}

impl fmt::Display for MethodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl fmt::Debug for MethodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodToken({:#010x})", self.0)
    }
}

/// Metadata token of a class, stored alongside each class cache entry and
/// resolved against the owning module image on first use.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassToken(pub u32);

impl ClassToken {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        ClassToken(value)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ClassToken {
    fn from(value: u32) -> Self {
        ClassToken(value)
    }
}

impl fmt::Display for ClassToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl fmt::Debug for ClassToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassToken({:#010x})", self.0)
    }
}

/// The packed diagnostic identifier of a marshal method.
///
/// Identifiers in the method name table consist of a 64-bit value where:
/// - The high 32 bits (bits 32-63) carry the image index
/// - The low 32 bits (bits 0-31) carry the method token
///
/// An identifier of zero is the table's terminating sentinel.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodId(pub u64);

impl MethodId {
    /// Packs an image index and a method token into a table identifier
    #[must_use]
    pub fn new(image_index: ImageIndex, method_token: MethodToken) -> Self {
        MethodId((u64::from(image_index.value()) << 32) | u64::from(method_token.value()))
    }

    /// Returns the raw packed value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Extracts the image index from the identifier (high 32 bits)
    #[must_use]
    pub fn image_index(&self) -> ImageIndex {
        ImageIndex((self.0 >> 32) as u32)
    }

    /// Extracts the method token from the identifier (low 32 bits)
    #[must_use]
    pub fn method_token(&self) -> MethodToken {
        MethodToken(self.0 as u32)
    }

    /// Returns true if this is the terminating sentinel (value 0)
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for MethodId {
    fn from(value: u64) -> Self {
        MethodId(value)
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MethodId({:#018x}, image: {}, token: {:#010x})",
            self.0,
            self.image_index().value(),
            self.method_token().value()
        )
    }
}
