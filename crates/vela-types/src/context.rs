//! Type context: arena storage, interning, and the two-phase protocol for
//! self-referential types
//!
//! Structural types (primitives, pointers, sequences, maps, channels,
//! records, tuples, signatures) are interned so identical shapes share one
//! [`TypeId`]. Named types and interfaces are identity types: each
//! declaration allocates a fresh id, and the id stays stable while the
//! underlying shape or method set is filled in afterwards. That split is
//! what lets a builder declare `Node` first and then build a record whose
//! field is `*Node`.

use crate::ty::{
    ChanDir, Field, InterfaceType, Method, NamedType, PrimKind, SignatureType, StructType,
    TupleType, Type, TypeId, Var,
};
use rustc_hash::FxHashMap;

/// Arena of types for one package under construction
///
/// Interning ensures that identical structural types have the same `TypeId`,
/// which makes type equality an id comparison.
#[derive(Debug, Clone)]
pub struct TypeCtx {
    /// Storage for all types, indexed by TypeId
    types: Vec<Type>,

    /// Reverse mapping from structural Type to TypeId for interning
    type_to_id: FxHashMap<Type, TypeId>,

    /// Pre-declared empty interface
    any_ty: TypeId,

    /// Pre-declared `error` named interface
    error_ty: TypeId,
}

impl Default for TypeCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCtx {
    /// Create a new type context
    ///
    /// Pre-interns every primitive kind and pre-declares the two universe
    /// types every stub builder leans on: `any` (the empty interface) and
    /// `error` (a named interface with one method, `Error() string`).
    pub fn new() -> Self {
        let mut ctx = TypeCtx {
            types: Vec::new(),
            type_to_id: FxHashMap::default(),
            any_ty: TypeId(0),
            error_ty: TypeId(0),
        };

        for kind in PrimKind::ALL {
            ctx.intern(Type::Prim(kind));
        }

        let any = ctx.interface(Vec::new(), Vec::new());
        ctx.complete_interface(any);
        ctx.any_ty = any;

        // type error interface { Error() string }
        let error = ctx.declare_named("error");
        let string = ctx.prim(PrimKind::String);
        let sig = ctx.func_sig(Vec::new(), vec![Var::new("", string)], false);
        let iface = ctx.interface(
            vec![Method {
                name: "Error".to_string(),
                sig,
            }],
            Vec::new(),
        );
        ctx.complete_interface(iface);
        ctx.set_underlying(error, iface);
        ctx.error_ty = error;

        ctx
    }

    /// Intern a type, returning its TypeId
    ///
    /// Structural types are deduplicated; identity types (named types and
    /// interfaces) always get a fresh id.
    fn intern(&mut self, ty: Type) -> TypeId {
        if ty.is_structural() {
            if let Some(&id) = self.type_to_id.get(&ty) {
                return id;
            }
        }

        let id = TypeId(self.types.len() as u32);
        if ty.is_structural() {
            self.type_to_id.insert(ty.clone(), id);
        }
        self.types.push(ty);
        id
    }

    /// Get a type by its TypeId
    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0 as usize)
    }

    /// Get a type by its TypeId, panicking if it doesn't exist
    ///
    /// # Panics
    ///
    /// Panics if the TypeId is invalid
    pub fn get_unchecked(&self, id: TypeId) -> &Type {
        self.get(id).expect("invalid TypeId")
    }

    /// Number of types in the context
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // Structural constructors

    /// Get a primitive type
    pub fn prim(&mut self, kind: PrimKind) -> TypeId {
        self.intern(Type::Prim(kind))
    }

    /// Create a pointer type
    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.intern(Type::Pointer(elem))
    }

    /// Create a fixed-length array type
    pub fn array(&mut self, elem: TypeId, len: u64) -> TypeId {
        self.intern(Type::Array { elem, len })
    }

    /// Create a slice type
    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.intern(Type::Slice(elem))
    }

    /// Create a map type
    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(Type::Map { key, value })
    }

    /// Create a channel type
    pub fn chan(&mut self, dir: ChanDir, elem: TypeId) -> TypeId {
        self.intern(Type::Chan { dir, elem })
    }

    /// Create a record type from an ordered field list
    pub fn struct_type(&mut self, fields: Vec<Field>) -> TypeId {
        self.intern(Type::Struct(StructType { fields }))
    }

    /// Create a tuple type; zero elements represents an empty parameter or
    /// result list
    pub fn tuple(&mut self, vars: Vec<Var>) -> TypeId {
        self.intern(Type::Tuple(TupleType { vars }))
    }

    /// Create a signature from already-built parameter and result tuples
    ///
    /// # Panics
    ///
    /// Panics if `params` or `results` does not point at a tuple.
    pub fn signature(
        &mut self,
        recv: Option<Var>,
        params: TypeId,
        results: TypeId,
        variadic: bool,
    ) -> TypeId {
        assert!(
            self.get_unchecked(params).as_tuple().is_some(),
            "signature params must be a tuple"
        );
        assert!(
            self.get_unchecked(results).as_tuple().is_some(),
            "signature results must be a tuple"
        );
        self.intern(Type::Signature(SignatureType {
            recv,
            params,
            results,
            variadic,
        }))
    }

    /// Create a plain function signature from parameter and result lists
    pub fn func_sig(&mut self, params: Vec<Var>, results: Vec<Var>, variadic: bool) -> TypeId {
        let params = self.tuple(params);
        let results = self.tuple(results);
        self.signature(None, params, results, variadic)
    }

    /// Create a method signature with a receiver
    pub fn method_sig(
        &mut self,
        recv: Var,
        params: Vec<Var>,
        results: Vec<Var>,
        variadic: bool,
    ) -> TypeId {
        let params = self.tuple(params);
        let results = self.tuple(results);
        self.signature(Some(recv), params, results, variadic)
    }

    // Identity constructors and the two-phase protocol

    /// Forward-declare a named type with no underlying shape
    ///
    /// The returned id is stable for the lifetime of the context and may be
    /// referenced by other types before the shape is attached.
    pub fn declare_named(&mut self, name: impl Into<String>) -> TypeId {
        self.intern(Type::Named(NamedType {
            name: name.into(),
            underlying: None,
            methods: Vec::new(),
        }))
    }

    /// Attach the underlying shape to a forward-declared named type
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a named type, if a shape is already attached,
    /// or if the underlying type is the named type itself.
    pub fn set_underlying(&mut self, id: TypeId, underlying: TypeId) {
        assert_ne!(id, underlying, "named type cannot be its own underlying");
        match &mut self.types[id.0 as usize] {
            Type::Named(named) => {
                assert!(
                    named.underlying.is_none(),
                    "underlying already attached to named type `{}`",
                    named.name
                );
                named.underlying = Some(underlying);
            }
            other => panic!("set_underlying on non-named type {other:?}"),
        }
    }

    /// Attach a method to a named type
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a named type or `sig` is not a signature.
    pub fn add_method(&mut self, id: TypeId, name: impl Into<String>, sig: TypeId) {
        assert!(
            self.get_unchecked(sig).is_signature(),
            "method must carry a signature type"
        );
        match &mut self.types[id.0 as usize] {
            Type::Named(named) => named.methods.push(Method {
                name: name.into(),
                sig,
            }),
            other => panic!("add_method on non-named type {other:?}"),
        }
    }

    /// Create an open interface from declared methods and embedded
    /// interfaces
    ///
    /// The interface must be sealed with [`complete_interface`] before any
    /// method-set query.
    ///
    /// [`complete_interface`]: TypeCtx::complete_interface
    pub fn interface(&mut self, methods: Vec<Method>, embeds: Vec<TypeId>) -> TypeId {
        self.intern(Type::Interface(InterfaceType {
            methods,
            embeds,
            completed: false,
        }))
    }

    /// Add a declared method to an open interface
    ///
    /// # Panics
    ///
    /// Panics if `id` is not an interface or is already completed.
    pub fn add_interface_method(&mut self, id: TypeId, name: impl Into<String>, sig: TypeId) {
        assert!(
            self.get_unchecked(sig).is_signature(),
            "interface method must carry a signature type"
        );
        match &mut self.types[id.0 as usize] {
            Type::Interface(iface) => {
                assert!(!iface.completed, "interface is already completed");
                iface.methods.push(Method {
                    name: name.into(),
                    sig,
                });
            }
            other => panic!("add_interface_method on non-interface type {other:?}"),
        }
    }

    /// Seal an interface's method set
    ///
    /// # Panics
    ///
    /// Panics if `id` is not an interface or is already completed.
    pub fn complete_interface(&mut self, id: TypeId) {
        match &mut self.types[id.0 as usize] {
            Type::Interface(iface) => {
                assert!(!iface.completed, "interface is already completed");
                iface.completed = true;
            }
            other => panic!("complete_interface on non-interface type {other:?}"),
        }
    }

    /// Declared method count of a completed interface
    ///
    /// # Panics
    ///
    /// Panics if `id` is not an interface or has not been completed;
    /// querying an open method set is a construction defect.
    pub fn num_methods(&self, id: TypeId) -> usize {
        match self.get_unchecked(id) {
            Type::Interface(iface) => {
                assert!(iface.completed, "method-set query on incomplete interface");
                iface.methods.len()
            }
            other => panic!("num_methods on non-interface type {other:?}"),
        }
    }

    /// Underlying shape of a named type, if attached
    pub fn underlying(&self, id: TypeId) -> Option<TypeId> {
        self.get_unchecked(id).as_named().and_then(|n| n.underlying)
    }

    // Universe types

    /// The empty interface
    pub fn any_type(&self) -> TypeId {
        self.any_ty
    }

    /// The built-in `error` named interface
    pub fn error_type(&self) -> TypeId {
        self.error_ty
    }

    /// Render a type as source-level notation
    ///
    /// Named types print by name only, so cyclic shapes terminate.
    pub fn display(&self, id: TypeId) -> String {
        match self.get_unchecked(id) {
            Type::Prim(p) => p.name().to_string(),
            Type::Pointer(elem) => format!("*{}", self.display(*elem)),
            Type::Array { elem, len } => format!("[{}]{}", len, self.display(*elem)),
            Type::Slice(elem) => format!("[]{}", self.display(*elem)),
            Type::Map { key, value } => {
                format!("map[{}]{}", self.display(*key), self.display(*value))
            }
            Type::Chan { dir, elem } => match dir {
                ChanDir::Send => format!("chan<- {}", self.display(*elem)),
                ChanDir::Recv => format!("<-chan {}", self.display(*elem)),
                ChanDir::Both => format!("chan {}", self.display(*elem)),
            },
            Type::Struct(st) => {
                let fields: Vec<String> = st
                    .fields
                    .iter()
                    .map(|f| {
                        if f.embedded {
                            self.display(f.ty)
                        } else {
                            format!("{} {}", f.name, self.display(f.ty))
                        }
                    })
                    .collect();
                format!("struct{{{}}}", fields.join("; "))
            }
            Type::Tuple(tuple) => {
                let vars: Vec<String> = tuple
                    .vars
                    .iter()
                    .map(|v| {
                        if v.name.is_empty() {
                            self.display(v.ty)
                        } else {
                            format!("{} {}", v.name, self.display(v.ty))
                        }
                    })
                    .collect();
                format!("({})", vars.join(", "))
            }
            Type::Signature(sig) => {
                let params = self.display(sig.params);
                let results = self.display(sig.results);
                match self.get_unchecked(sig.results).as_tuple() {
                    Some(t) if t.is_empty() => format!("func{params}"),
                    _ => format!("func{params} {results}"),
                }
            }
            Type::Interface(iface) => {
                let methods: Vec<String> = iface
                    .methods
                    .iter()
                    .map(|m| format!("{}{}", m.name, &self.display(m.sig)[4..]))
                    .collect();
                format!("interface{{{}}}", methods.join("; "))
            }
            Type::Named(named) => named.name.clone(),
        }
    }
}
