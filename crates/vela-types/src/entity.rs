//! Declared entities: the named things a scope maps to

use crate::ty::{TypeId, Var};
use std::fmt;

/// A typed literal value carried by a constant entity
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// String literal
    Str(String),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Bool(b) => write!(f, "{b}"),
            ConstValue::Int(i) => write!(f, "{i}"),
            ConstValue::Float(x) => write!(f, "{x}"),
            ConstValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Entity kind with per-variant payload
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// Variable declaration
    Var,
    /// Constant declaration, carrying its literal value
    Const(ConstValue),
    /// Function declaration; methods carry their receiver variable, which
    /// ties the function to its owning named type
    Func {
        /// Receiver variable (`None` for plain functions)
        recv: Option<Var>,
    },
    /// Type name declaration
    TypeName,
    /// Statement label
    Label,
    /// Alias for an imported package
    PkgAlias {
        /// Import path of the aliased package
        path: String,
    },
    /// Built-in marker (predeclared function or identifier)
    Builtin,
    /// The predeclared nil marker
    Nil,
}

/// A declared entity: one named thing inside a scope
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Entity name
    pub name: String,
    /// Entity kind
    pub kind: EntityKind,
    /// Declared type
    pub ty: TypeId,
    /// Whether the entity is externally visible; derived purely from the
    /// name's first character being uppercase
    pub exported: bool,
}

impl Entity {
    /// Create an entity, deriving the exported flag from the name
    pub fn new(name: impl Into<String>, kind: EntityKind, ty: TypeId) -> Self {
        let name = name.into();
        let exported = is_exported(&name);
        Entity {
            name,
            kind,
            ty,
            exported,
        }
    }

    /// Whether this entity is a function
    pub fn is_func(&self) -> bool {
        matches!(self.kind, EntityKind::Func { .. })
    }

    /// Whether this entity is a method (a function with a receiver)
    pub fn is_method(&self) -> bool {
        matches!(self.kind, EntityKind::Func { recv: Some(_) })
    }

    /// The constant value, if this is a constant
    pub fn const_value(&self) -> Option<&ConstValue> {
        match &self.kind {
            EntityKind::Const(v) => Some(v),
            _ => None,
        }
    }
}

/// Host convention for exported identifiers: leading uppercase
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}
