//! Packages: the top-level unit handed to the checker for one import path
//!
//! A package owns its own type context and scope tree. While a
//! [`PackageBuilder`] holds it, everything is mutable; `finish()` runs a
//! defect sweep and seals the package. Consumers only ever see a shared
//! reference to a complete package, so immutability after completion falls
//! out of ownership.

use crate::context::TypeCtx;
use crate::entity::{ConstValue, Entity, EntityKind};
use crate::scope::{Scope, ScopeId, ScopeTree};
use crate::ty::{TypeId, Var};

/// A fully built, immutable package stub
#[derive(Debug, Clone)]
pub struct Package {
    path: String,
    name: String,
    types: TypeCtx,
    scopes: ScopeTree,
    complete: bool,
}

impl Package {
    /// Unique import path identifying the package
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Short display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The package's type context
    pub fn types(&self) -> &TypeCtx {
        &self.types
    }

    /// The package's top-level scope
    pub fn scope(&self) -> &Scope {
        self.scopes.top()
    }

    /// The full scope tree
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Whether construction has finished
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Look up an entity in the top-level scope
    pub fn lookup(&self, name: &str) -> Option<&Entity> {
        self.scopes.top().lookup(name)
    }
}

/// Construction surface for one package
///
/// Declaration helpers panic on duplicate names and invariant violations:
/// those are defects in the registered builder, not runtime conditions, and
/// a malformed package would corrupt every later checking decision.
pub struct PackageBuilder {
    path: String,
    name: String,
    types: TypeCtx,
    scopes: ScopeTree,
}

impl PackageBuilder {
    /// Start building a package
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        PackageBuilder {
            path: path.into(),
            name: name.into(),
            types: TypeCtx::new(),
            scopes: ScopeTree::new(),
        }
    }

    /// Mutable access to the type context
    pub fn types(&mut self) -> &mut TypeCtx {
        &mut self.types
    }

    /// Read access to the type context
    pub fn types_ref(&self) -> &TypeCtx {
        &self.types
    }

    /// Import path of the package under construction
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Look up an entity declared so far in the top-level scope
    pub fn lookup(&self, name: &str) -> Option<&Entity> {
        self.scopes.top().lookup(name)
    }

    fn insert(&mut self, entity: Entity) {
        let path = self.path.clone();
        if let Err(err) = self.scopes.insert(ScopeId::TOP, entity) {
            panic!("package {path}: {err}");
        }
    }

    /// Forward-declare a named type and bind a type-name entity for it
    ///
    /// The returned identity is stable and may be referenced before its
    /// underlying shape is attached with
    /// [`TypeCtx::set_underlying`].
    pub fn declare_named(&mut self, name: &str) -> TypeId {
        let id = self.types.declare_named(name);
        self.insert(Entity::new(name, EntityKind::TypeName, id));
        id
    }

    /// Declare a variable in the top-level scope
    pub fn define_var(&mut self, name: &str, ty: TypeId) {
        self.insert(Entity::new(name, EntityKind::Var, ty));
    }

    /// Declare a constant with its literal value
    pub fn define_const(&mut self, name: &str, ty: TypeId, value: ConstValue) {
        self.insert(Entity::new(name, EntityKind::Const(value), ty));
    }

    /// Declare a plain function
    ///
    /// # Panics
    ///
    /// Panics if `sig` is not a signature type.
    pub fn define_func(&mut self, name: &str, sig: TypeId) {
        assert!(
            self.types.get_unchecked(sig).is_signature(),
            "package {}: function `{name}` must carry a signature type",
            self.path
        );
        self.insert(Entity::new(name, EntityKind::Func { recv: None }, sig));
    }

    /// Declare a function from parameter and result lists
    pub fn define_func_decl(
        &mut self,
        name: &str,
        params: Vec<Var>,
        results: Vec<Var>,
        variadic: bool,
    ) {
        let sig = self.types.func_sig(params, results, variadic);
        self.define_func(name, sig);
    }

    /// Attach a method to a named type
    ///
    /// The receiver variable ties the method to its owning named type; its
    /// declared type must be the named type or a pointer to it.
    pub fn define_method(
        &mut self,
        named: TypeId,
        name: &str,
        recv: Var,
        params: Vec<Var>,
        results: Vec<Var>,
        variadic: bool,
    ) {
        let recv_elem = match self.types.get_unchecked(recv.ty) {
            crate::ty::Type::Pointer(elem) => *elem,
            _ => recv.ty,
        };
        assert_eq!(
            recv_elem, named,
            "package {}: receiver of `{name}` must be the named type or a pointer to it",
            self.path
        );
        let sig = self.types.method_sig(recv, params, results, variadic);
        self.types.add_method(named, name, sig);
    }

    /// Declare an alias for another package
    pub fn define_pkg_alias(&mut self, name: &str, path: &str) {
        let any = self.types.any_type();
        self.insert(Entity::new(
            name,
            EntityKind::PkgAlias {
                path: path.to_string(),
            },
            any,
        ));
    }

    /// Seal the package
    ///
    /// Sweeps the type context for construction defects — a named type
    /// without an underlying shape, an interface never completed, an empty
    /// top-level scope — and panics on any, then marks the package complete.
    pub fn finish(self) -> Package {
        let PackageBuilder {
            path,
            name,
            types,
            scopes,
        } = self;

        for i in 0..types.len() {
            let id = TypeId(i as u32);
            match types.get_unchecked(id) {
                crate::ty::Type::Named(named) => {
                    assert!(
                        named.underlying.is_some(),
                        "package {path}: named type `{}` was never finalized",
                        named.name
                    );
                }
                crate::ty::Type::Interface(iface) => {
                    assert!(
                        iface.completed,
                        "package {path}: interface {} was never completed",
                        types.display(id)
                    );
                }
                _ => {}
            }
        }
        assert!(
            !scopes.top().is_empty(),
            "package {path}: top-level scope declares nothing"
        );

        Package {
            path,
            name,
            types,
            scopes,
            complete: true,
        }
    }
}
