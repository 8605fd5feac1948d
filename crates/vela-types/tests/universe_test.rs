//! Public-API tests for the type universe: the forward-declare/finalize
//! protocol, interface completion, and package sealing as a consumer
//! (a stub builder) exercises them.

use vela_types::{
    ConstValue, EntityKind, Field, Method, PackageBuilder, PrimKind, Type, Var,
};

#[test]
fn test_mutually_recursive_named_types() {
    // type A struct { b *B }; type B struct { a *A }
    let mut builder = PackageBuilder::new("pair", "pair");
    let a = builder.declare_named("A");
    let b = builder.declare_named("B");

    let b_ptr = builder.types().pointer(b);
    let a_shape = builder.types().struct_type(vec![Field::new("b", b_ptr)]);
    builder.types().set_underlying(a, a_shape);

    let a_ptr = builder.types().pointer(a);
    let b_shape = builder.types().struct_type(vec![Field::new("a", a_ptr)]);
    builder.types().set_underlying(b, b_shape);

    let pkg = builder.finish();
    let types = pkg.types();

    let a_under = types.underlying(a).unwrap();
    let b_under = types.underlying(b).unwrap();
    let field_of = |under| match types.get_unchecked(under) {
        Type::Struct(st) => st.fields[0].ty,
        other => panic!("expected struct, got {other:?}"),
    };
    match types.get_unchecked(field_of(a_under)) {
        Type::Pointer(elem) => assert_eq!(*elem, b),
        other => panic!("expected pointer, got {other:?}"),
    }
    match types.get_unchecked(field_of(b_under)) {
        Type::Pointer(elem) => assert_eq!(*elem, a),
        other => panic!("expected pointer, got {other:?}"),
    }
}

#[test]
fn test_named_identity_survives_finalization() {
    let mut builder = PackageBuilder::new("id", "id");
    let t = builder.declare_named("T");

    // References built against the unfinalized identity stay valid.
    let ptr_before = builder.types().pointer(t);
    let int = builder.types().prim(PrimKind::Int);
    builder.types().set_underlying(t, int);
    let ptr_after = builder.types().pointer(t);

    assert_eq!(
        ptr_before, ptr_after,
        "pointer to T interns identically before and after finalization"
    );
    let pkg = builder.finish();
    assert_eq!(pkg.lookup("T").unwrap().ty, t);
}

#[test]
fn test_interface_with_embeds_counts_declared_methods_only() {
    let mut builder = PackageBuilder::new("caps", "caps");
    let base = builder.declare_named("Base");
    let ext = builder.declare_named("Ext");

    let int = builder.types().prim(PrimKind::Int);
    let get_sig = builder.types().func_sig(Vec::new(), vec![Var::new("", int)], false);
    let base_iface = builder.types().interface(
        vec![Method {
            name: "Get".to_string(),
            sig: get_sig,
        }],
        Vec::new(),
    );
    builder.types().complete_interface(base_iface);
    builder.types().set_underlying(base, base_iface);

    let set_sig = builder.types().func_sig(vec![Var::new("v", int)], Vec::new(), false);
    let ext_iface = builder.types().interface(
        vec![Method {
            name: "Set".to_string(),
            sig: set_sig,
        }],
        vec![base],
    );
    builder.types().complete_interface(ext_iface);
    builder.types().set_underlying(ext, ext_iface);

    let pkg = builder.finish();
    let ext_under = pkg.types().underlying(ext).unwrap();
    assert_eq!(pkg.types().num_methods(ext_under), 1);
    let iface = pkg.types().get_unchecked(ext_under).as_interface().unwrap();
    assert_eq!(iface.embeds, vec![base]);
}

#[test]
fn test_scope_contents_in_declaration_order() {
    let mut builder = PackageBuilder::new("ord", "ord");
    let int = builder.types().prim(PrimKind::Int);
    builder.define_const("B", int, ConstValue::Int(2));
    builder.define_const("A", int, ConstValue::Int(1));
    builder.define_func_decl("f", Vec::new(), Vec::new(), false);
    let pkg = builder.finish();

    let names: Vec<&str> = pkg.scope().names().collect();
    assert_eq!(names, ["B", "A", "f"]);

    let exported: Vec<bool> = pkg.scope().iter().map(|e| e.exported).collect();
    assert_eq!(exported, [true, true, false]);
}

#[test]
fn test_variadic_signature() {
    // func Println(a ...any) (int, error)
    let mut builder = PackageBuilder::new("fmtish", "fmtish");
    let any = builder.types().any_type();
    let any_slice = builder.types().slice(any);
    let int = builder.types().prim(PrimKind::Int);
    let err = builder.types().error_type();
    builder.define_func_decl(
        "Println",
        vec![Var::new("a", any_slice)],
        vec![Var::new("", int), Var::new("", err)],
        true,
    );
    let pkg = builder.finish();

    let entity = pkg.lookup("Println").unwrap();
    assert_eq!(entity.kind, EntityKind::Func { recv: None });
    let sig = pkg.types().get_unchecked(entity.ty).as_signature().unwrap();
    assert!(sig.variadic);
}
