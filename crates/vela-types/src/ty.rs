//! Core type representation for the Vela type universe

use std::fmt;

/// Unique identifier for a type in a [`TypeCtx`](crate::TypeCtx)
///
/// Structural types are interned, so equal shapes share one `TypeId`.
/// Named and interface types are identity types: every declaration gets a
/// fresh `TypeId`, and that id never changes even when the underlying shape
/// is attached later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Primitive type kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimKind {
    /// The `bool` type
    Bool,
    /// The `int` type (platform word)
    Int,
    /// The `int8` type
    Int8,
    /// The `int16` type
    Int16,
    /// The `int32` type
    Int32,
    /// The `int64` type
    Int64,
    /// The `uint` type
    Uint,
    /// The `byte` type
    Byte,
    /// The `rune` type
    Rune,
    /// The `float32` type
    Float32,
    /// The `float64` type
    Float64,
    /// The `string` type
    String,
}

impl PrimKind {
    /// Source-level name of the primitive
    pub fn name(self) -> &'static str {
        match self {
            PrimKind::Bool => "bool",
            PrimKind::Int => "int",
            PrimKind::Int8 => "int8",
            PrimKind::Int16 => "int16",
            PrimKind::Int32 => "int32",
            PrimKind::Int64 => "int64",
            PrimKind::Uint => "uint",
            PrimKind::Byte => "byte",
            PrimKind::Rune => "rune",
            PrimKind::Float32 => "float32",
            PrimKind::Float64 => "float64",
            PrimKind::String => "string",
        }
    }

    /// All primitive kinds, in the order they are pre-interned
    pub const ALL: [PrimKind; 12] = [
        PrimKind::Bool,
        PrimKind::Int,
        PrimKind::Int8,
        PrimKind::Int16,
        PrimKind::Int32,
        PrimKind::Int64,
        PrimKind::Uint,
        PrimKind::Byte,
        PrimKind::Rune,
        PrimKind::Float32,
        PrimKind::Float64,
        PrimKind::String,
    ];
}

impl fmt::Display for PrimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Channel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    /// Send-only channel (`chan<- T`)
    Send,
    /// Receive-only channel (`<-chan T`)
    Recv,
    /// Bidirectional channel (`chan T`)
    Both,
}

/// A named variable slot: tuple element, parameter, result, or receiver
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Var {
    /// Variable name; empty for unnamed results
    pub name: String,
    /// Declared type
    pub ty: TypeId,
}

impl Var {
    /// Create a new variable slot
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Var { name: name.into(), ty }
    }
}

/// One field of a record type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: TypeId,
    /// Optional field tag string
    pub tag: Option<String>,
    /// Whether the field is embedded (anonymous)
    pub embedded: bool,
}

impl Field {
    /// Create a plain, non-embedded, untagged field
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Field {
            name: name.into(),
            ty,
            tag: None,
            embedded: false,
        }
    }
}

/// A declared method: name plus signature type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method {
    /// Method name
    pub name: String,
    /// Signature type (must point at a `Type::Signature`)
    pub sig: TypeId,
}

/// Record type: ordered field list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructType {
    /// Ordered fields
    pub fields: Vec<Field>,
}

/// Tuple type: ordered variable list, used for parameter and result lists
///
/// Zero elements is valid and represents "no parameters" / "no results".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleType {
    /// Tuple elements
    pub vars: Vec<Var>,
}

impl TupleType {
    /// Arity of the tuple
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the tuple is empty
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Function signature type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureType {
    /// Receiver variable for methods, `None` for plain functions
    pub recv: Option<Var>,
    /// Parameter tuple (must point at a `Type::Tuple`)
    pub params: TypeId,
    /// Result tuple (must point at a `Type::Tuple`)
    pub results: TypeId,
    /// Whether the final parameter is variadic
    pub variadic: bool,
}

/// Interface type: a capability set
///
/// Built open, then sealed with
/// [`TypeCtx::complete_interface`](crate::TypeCtx::complete_interface).
/// Method-set queries on an incomplete interface are construction defects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceType {
    /// Declared methods, in declaration order
    pub methods: Vec<Method>,
    /// Embedded interfaces (must point at `Type::Interface` or named
    /// interfaces)
    pub embeds: Vec<TypeId>,
    /// Whether the method set is sealed
    pub completed: bool,
}

/// Named type: a stable identity wrapping an underlying shape
///
/// The identity exists before the underlying type is known, which is what
/// makes self-referential and mutually recursive declarations possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    /// Display name of the type
    pub name: String,
    /// Underlying shape; `None` until finalized
    pub underlying: Option<TypeId>,
    /// Methods attached to this named type
    pub methods: Vec<Method>,
}

/// The core type representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Primitive type
    Prim(PrimKind),

    /// Pointer to an element type
    Pointer(TypeId),

    /// Fixed-length sequence
    Array {
        /// Element type
        elem: TypeId,
        /// Length
        len: u64,
    },

    /// Variable-length sequence
    Slice(TypeId),

    /// Associative map
    Map {
        /// Key type
        key: TypeId,
        /// Value type
        value: TypeId,
    },

    /// Channel
    Chan {
        /// Direction
        dir: ChanDir,
        /// Element type
        elem: TypeId,
    },

    /// Record type
    Struct(StructType),

    /// Parameter or result list
    Tuple(TupleType),

    /// Function signature
    Signature(SignatureType),

    /// Capability set
    Interface(InterfaceType),

    /// Stable identity over an underlying shape
    Named(NamedType),
}

impl Type {
    /// Whether this variant is interned (structural) rather than an
    /// identity type
    pub(crate) fn is_structural(&self) -> bool {
        !matches!(self, Type::Interface(_) | Type::Named(_))
    }

    /// Check if this type is a primitive
    pub fn is_prim(&self) -> bool {
        matches!(self, Type::Prim(_))
    }

    /// Check if this type is a signature
    pub fn is_signature(&self) -> bool {
        matches!(self, Type::Signature(_))
    }

    /// Check if this type is a named type
    pub fn is_named(&self) -> bool {
        matches!(self, Type::Named(_))
    }

    /// Check if this type is an interface
    pub fn is_interface(&self) -> bool {
        matches!(self, Type::Interface(_))
    }

    /// Get the primitive kind if this is a primitive
    pub fn as_prim(&self) -> Option<PrimKind> {
        match self {
            Type::Prim(p) => Some(*p),
            _ => None,
        }
    }

    /// Get the tuple if this is a tuple
    pub fn as_tuple(&self) -> Option<&TupleType> {
        match self {
            Type::Tuple(t) => Some(t),
            _ => None,
        }
    }

    /// Get the signature if this is a signature
    pub fn as_signature(&self) -> Option<&SignatureType> {
        match self {
            Type::Signature(s) => Some(s),
            _ => None,
        }
    }

    /// Get the interface if this is an interface
    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match self {
            Type::Interface(i) => Some(i),
            _ => None,
        }
    }

    /// Get the named type if this is a named type
    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            Type::Named(n) => Some(n),
            _ => None,
        }
    }
}
