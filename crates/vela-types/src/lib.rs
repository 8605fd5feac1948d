//! Vela Type Universe
//!
//! In-memory model of an external API surface's type system: packages,
//! scopes, declared entities, and types, deep enough to drive the checker
//! without parsing the library's real source. Packages are assembled
//! directly as data through [`PackageBuilder`], using a two-phase
//! forward-declare/finalize protocol for self-referential and mutually
//! recursive types.

#![warn(missing_docs)]

pub mod context;
pub mod entity;
pub mod error;
pub mod package;
pub mod scope;
pub mod ty;

pub use context::TypeCtx;
pub use entity::{ConstValue, Entity, EntityKind};
pub use error::DuplicateEntity;
pub use package::{Package, PackageBuilder};
pub use scope::{Scope, ScopeId, ScopeTree};
pub use ty::{ChanDir, Field, Method, PrimKind, Type, TypeId, Var};
