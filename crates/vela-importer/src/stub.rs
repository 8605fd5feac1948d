//! Declarative package stubs
//!
//! The bulk of a stub library is mechanical: thousands of near-identical
//! function, constant, and record declarations. Those are data, not code.
//! A [`PackageStub`] is a static table of declarations whose types are
//! written in compact source notation (`"[]byte"`, `"*Buffer"`,
//! `"map[string]int"`); [`build_stub`] processes the table with the same
//! two-phase protocol a hand-written builder uses, so table entries may
//! reference each other's named types in any order.
//!
//! Shapes the notation cannot express (interfaces, embedded fields,
//! channels of channels, cross-referencing method graphs) stay hand-written
//! against [`PackageBuilder`] directly.

use vela_types::{ConstValue, Field, Package, PackageBuilder, PrimKind, Type, TypeId, Var};

/// Constant initializer in a stub table
#[derive(Debug, Clone, Copy)]
pub enum ConstInit {
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// String literal
    Str(&'static str),
}

impl ConstInit {
    fn to_value(self) -> ConstValue {
        match self {
            ConstInit::Bool(b) => ConstValue::Bool(b),
            ConstInit::Int(i) => ConstValue::Int(i),
            ConstInit::Float(x) => ConstValue::Float(x),
            ConstInit::Str(s) => ConstValue::Str(s.to_string()),
        }
    }
}

/// Constant declaration
#[derive(Debug, Clone, Copy)]
pub struct ConstStub {
    /// Constant name
    pub name: &'static str,
    /// Type notation
    pub ty: &'static str,
    /// Literal value
    pub value: ConstInit,
}

/// Variable declaration
#[derive(Debug, Clone, Copy)]
pub struct VarStub {
    /// Variable name
    pub name: &'static str,
    /// Type notation
    pub ty: &'static str,
}

/// Record field declaration
#[derive(Debug, Clone, Copy)]
pub struct FieldStub {
    /// Field name
    pub name: &'static str,
    /// Type notation
    pub ty: &'static str,
}

/// Method declaration attached to a named type
#[derive(Debug, Clone, Copy)]
pub struct MethodStub {
    /// Method name
    pub name: &'static str,
    /// Whether the receiver is a pointer to the named type
    pub ptr_recv: bool,
    /// Parameters as (name, type notation) pairs
    pub params: &'static [(&'static str, &'static str)],
    /// Result type notations (results are unnamed)
    pub results: &'static [&'static str],
    /// Whether the final parameter is variadic
    pub variadic: bool,
}

/// Named record type declaration
#[derive(Debug, Clone, Copy)]
pub struct TypeStub {
    /// Type name
    pub name: &'static str,
    /// Record fields; field notations may reference any type declared in
    /// the same table
    pub fields: &'static [FieldStub],
    /// Attached methods
    pub methods: &'static [MethodStub],
}

/// Function declaration
#[derive(Debug, Clone, Copy)]
pub struct FuncStub {
    /// Function name
    pub name: &'static str,
    /// Parameters as (name, type notation) pairs
    pub params: &'static [(&'static str, &'static str)],
    /// Result type notations
    pub results: &'static [&'static str],
    /// Whether the final parameter is variadic
    pub variadic: bool,
}

/// One package's declaration table
#[derive(Debug, Clone, Copy)]
pub struct PackageStub {
    /// Import path
    pub path: &'static str,
    /// Short display name
    pub name: &'static str,
    /// Constants
    pub consts: &'static [ConstStub],
    /// Variables
    pub vars: &'static [VarStub],
    /// Named record types
    pub types: &'static [TypeStub],
    /// Functions
    pub funcs: &'static [FuncStub],
}

/// Build a package from its declaration table
///
/// Phase one forward-declares every named type; phase two parses the type
/// notations (which may reference any declared name), attaches record
/// shapes and methods, then declares constants, variables, and functions.
///
/// # Panics
///
/// Panics on any defect in the table: unknown type names, malformed
/// notation, duplicate declarations.
pub fn build_stub(stub: &PackageStub) -> Package {
    let mut b = PackageBuilder::new(stub.path, stub.name);

    for ty in stub.types {
        b.declare_named(ty.name);
    }

    for ty in stub.types {
        let named = named_id(&b, ty.name);
        let fields: Vec<Field> = ty
            .fields
            .iter()
            .map(|f| Field::new(f.name, parse_type(&mut b, f.ty)))
            .collect();
        let shape = b.types().struct_type(fields);
        b.types().set_underlying(named, shape);
    }

    for ty in stub.types {
        let named = named_id(&b, ty.name);
        for m in ty.methods {
            let recv_ty = if m.ptr_recv {
                b.types().pointer(named)
            } else {
                named
            };
            let recv = Var::new(receiver_name(ty.name), recv_ty);
            let params = parse_params(&mut b, m.params);
            let results = parse_results(&mut b, m.results);
            b.define_method(named, m.name, recv, params, results, m.variadic);
        }
    }

    for c in stub.consts {
        let ty = parse_type(&mut b, c.ty);
        b.define_const(c.name, ty, c.value.to_value());
    }

    for v in stub.vars {
        let ty = parse_type(&mut b, v.ty);
        b.define_var(v.name, ty);
    }

    for f in stub.funcs {
        let params = parse_params(&mut b, f.params);
        let results = parse_results(&mut b, f.results);
        b.define_func_decl(f.name, params, results, f.variadic);
    }

    b.finish()
}

fn named_id(b: &PackageBuilder, name: &str) -> TypeId {
    b.lookup(name)
        .unwrap_or_else(|| panic!("package {}: type `{name}` not declared", b.path()))
        .ty
}

fn receiver_name(type_name: &str) -> String {
    type_name
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase().to_string())
        .unwrap_or_default()
}

fn parse_params(b: &mut PackageBuilder, params: &[(&str, &str)]) -> Vec<Var> {
    params
        .iter()
        .map(|(name, ty)| {
            let ty = parse_type(b, ty);
            Var::new(*name, ty)
        })
        .collect()
}

fn parse_results(b: &mut PackageBuilder, results: &[&str]) -> Vec<Var> {
    results
        .iter()
        .map(|ty| {
            let ty = parse_type(b, ty);
            Var::new("", ty)
        })
        .collect()
}

/// Resolve compact type notation against the package under construction
///
/// Grammar: primitives by name, `error`, `any`, `*T`, `[]T`, `[N]T`,
/// `map[K]V`, `chan T`, `chan<- T`, `<-chan T`, and bare identifiers naming
/// a declared type.
pub fn parse_type(b: &mut PackageBuilder, notation: &str) -> TypeId {
    let s = notation.trim();

    if let Some(rest) = s.strip_prefix('*') {
        let elem = parse_type(b, rest);
        return b.types().pointer(elem);
    }
    if let Some(rest) = s.strip_prefix("[]") {
        let elem = parse_type(b, rest);
        return b.types().slice(elem);
    }
    if let Some(rest) = s.strip_prefix("map[") {
        let close = matching_bracket(rest).unwrap_or_else(|| {
            panic!("package {}: malformed map notation {notation:?}", b.path())
        });
        let key = parse_type(b, &rest[..close]);
        let value = parse_type(b, &rest[close + 1..]);
        return b.types().map(key, value);
    }
    if let Some(rest) = s.strip_prefix("chan<-") {
        let elem = parse_type(b, rest);
        return b.types().chan(vela_types::ChanDir::Send, elem);
    }
    if let Some(rest) = s.strip_prefix("<-chan") {
        let elem = parse_type(b, rest);
        return b.types().chan(vela_types::ChanDir::Recv, elem);
    }
    if let Some(rest) = s.strip_prefix("chan ") {
        let elem = parse_type(b, rest);
        return b.types().chan(vela_types::ChanDir::Both, elem);
    }
    if let Some(rest) = s.strip_prefix('[') {
        let close = rest.find(']').unwrap_or_else(|| {
            panic!("package {}: malformed array notation {notation:?}", b.path())
        });
        let len: u64 = rest[..close].parse().unwrap_or_else(|_| {
            panic!("package {}: bad array length in {notation:?}", b.path())
        });
        let elem = parse_type(b, &rest[close + 1..]);
        return b.types().array(elem, len);
    }

    if let Some(kind) = prim_kind(s) {
        return b.types().prim(kind);
    }
    match s {
        "error" => return b.types().error_type(),
        "any" => return b.types().any_type(),
        _ => {}
    }

    match b.lookup(s) {
        Some(entity) if entity.kind == vela_types::EntityKind::TypeName => entity.ty,
        _ => panic!("package {}: unknown type {s:?} in notation", b.path()),
    }
}

/// Index of the `]` closing the bracket already consumed, skipping nested
/// bracket pairs
fn matching_bracket(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' if depth == 0 => return Some(i),
            ']' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn prim_kind(s: &str) -> Option<PrimKind> {
    PrimKind::ALL.iter().copied().find(|k| k.name() == s)
}

/// Render a function entity's signature for diagnostics
pub fn display_func(pkg: &Package, name: &str) -> Option<String> {
    let entity = pkg.lookup(name)?;
    if !entity.is_func() {
        return None;
    }
    let sig = pkg.types().display(entity.ty);
    // display renders signatures as "func(...)"; splice the name in
    Some(format!("func {name}{}", &sig[4..]))
}

/// The underlying record of a named type declared by a stub table
pub fn struct_of<'a>(pkg: &'a Package, name: &str) -> Option<&'a vela_types::ty::StructType> {
    let entity = pkg.lookup(name)?;
    let under = pkg.types().underlying(entity.ty)?;
    match pkg.types().get_unchecked(under) {
        Type::Struct(st) => Some(st),
        _ => None,
    }
}
