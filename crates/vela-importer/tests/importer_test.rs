//! End-to-end tests for the stub importer: registration, lazy single
//! construction, memoization, and the recursive-type protocols as seen
//! through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vela_importer::{register_stdlib, ImportError, Registry};
use vela_types::{Field, Method, Package, PackageBuilder, PrimKind, Type, Var};

fn alpha() -> Package {
    let mut b = PackageBuilder::new("alpha", "alpha");
    let int = b.types().prim(PrimKind::Int);
    b.define_func_decl("F", vec![Var::new("x", int)], vec![Var::new("", int)], false);
    b.finish()
}

#[test]
fn test_registered_path_resolves_with_declared_arity() {
    let registry = Registry::new();
    registry.register("alpha", alpha);

    let pkg = registry.lookup("alpha").unwrap();
    let f = pkg.lookup("F").expect("F is declared in alpha's scope");
    assert!(f.is_func());

    let sig = pkg.types().get_unchecked(f.ty).as_signature().unwrap();
    let params = pkg.types().get_unchecked(sig.params).as_tuple().unwrap();
    let results = pkg.types().get_unchecked(sig.results).as_tuple().unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(results.len(), 1);
    assert_eq!(
        pkg.types().get_unchecked(params.vars[0].ty).as_prim(),
        Some(PrimKind::Int)
    );
}

#[test]
fn test_self_referential_record_through_lookup() {
    let registry = Registry::new();
    registry.register("selfref", || {
        let mut b = PackageBuilder::new("selfref", "selfref");
        let node = b.declare_named("Node");
        let ptr = b.types().pointer(node);
        let shape = b.types().struct_type(vec![Field::new("Next", ptr)]);
        b.types().set_underlying(node, shape);
        b.finish()
    });

    let pkg = registry.lookup("selfref").unwrap();
    let node = pkg.lookup("Node").unwrap().ty;
    let under = pkg.types().underlying(node).unwrap();
    let field_ty = match pkg.types().get_unchecked(under) {
        Type::Struct(st) => st.fields[0].ty,
        other => panic!("expected struct, got {other:?}"),
    };
    match pkg.types().get_unchecked(field_ty) {
        Type::Pointer(elem) => {
            assert_eq!(*elem, node, "Next points at the enclosing named identity")
        }
        other => panic!("expected pointer, got {other:?}"),
    }
}

#[test]
fn test_self_referential_interface_through_lookup() {
    let registry = Registry::new();
    registry.register("iface", || {
        let mut b = PackageBuilder::new("iface", "iface");
        let visitor = b.declare_named("Visitor");
        let any = b.types().any_type();
        let sig = b.types().func_sig(
            vec![Var::new("node", any)],
            vec![Var::new("", visitor)],
            false,
        );
        let iface = b.types().interface(
            vec![Method {
                name: "Visit".to_string(),
                sig,
            }],
            Vec::new(),
        );
        b.types().complete_interface(iface);
        b.types().set_underlying(visitor, iface);
        b.finish()
    });

    let pkg = registry.lookup("iface").unwrap();
    let visitor = pkg.lookup("Visitor").unwrap().ty;
    let under = pkg.types().underlying(visitor).unwrap();
    assert_eq!(pkg.types().num_methods(under), 1);

    let iface = pkg.types().get_unchecked(under).as_interface().unwrap();
    let sig = pkg.types().get_unchecked(iface.methods[0].sig).as_signature().unwrap();
    let results = pkg.types().get_unchecked(sig.results).as_tuple().unwrap();
    assert_eq!(
        results.vars[0].ty, visitor,
        "Visit's result is identity-equal to Visitor"
    );
}

#[test]
fn test_unregistered_path_is_not_found() {
    let registry = Registry::new();
    let err = registry.lookup("missing").unwrap_err();
    assert_eq!(
        err,
        ImportError::Unsupported {
            path: "missing".to_string()
        }
    );
}

#[test]
fn test_lookup_is_memoized() {
    let registry = Registry::new();
    registry.register("alpha", alpha);
    let a = registry.lookup("alpha").unwrap();
    let b = registry.lookup("alpha").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_concurrent_lookups_build_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = Registry::new();
    {
        let calls = Arc::clone(&calls);
        registry.register("alpha", move || {
            calls.fetch_add(1, Ordering::SeqCst);
            alpha()
        });
    }

    let packages: Vec<Arc<Package>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| s.spawn(|| registry.lookup("alpha").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for pkg in &packages[1..] {
        assert!(Arc::ptr_eq(&packages[0], pkg));
    }
}

#[test]
fn test_stdlib_every_registered_path_resolves() {
    let registry = Registry::new();
    register_stdlib(&registry);
    assert!(!registry.is_empty());

    for path in registry.paths() {
        let pkg = registry.lookup(&path).unwrap();
        assert!(pkg.is_complete());
        assert!(
            !pkg.scope().is_empty(),
            "{path}'s top-level scope declares at least one entity"
        );
    }
}

#[test]
fn test_stdlib_interfaces_report_completed() {
    let registry = Registry::new();
    register_stdlib(&registry);
    let io = registry.lookup("io").unwrap();

    for entity in io.scope().iter() {
        if entity.kind != vela_types::EntityKind::TypeName {
            continue;
        }
        let Some(under) = io.types().underlying(entity.ty) else {
            continue;
        };
        if let Some(iface) = io.types().get_unchecked(under).as_interface() {
            assert!(iface.completed, "{} is completed", entity.name);
        }
    }
}

#[test]
fn test_stdlib_contents_spot_checks() {
    let registry = Registry::new();
    register_stdlib(&registry);

    let math = registry.lookup("math").unwrap();
    assert!(math.lookup("Pi").unwrap().const_value().is_some());
    assert!(math.lookup("Sqrt").unwrap().is_func());

    let list = registry.lookup("container/list").unwrap();
    assert_eq!(list.name(), "list");
    let element = list.lookup("Element").unwrap().ty;
    let methods = &list.types().get_unchecked(element).as_named().unwrap().methods;
    assert_eq!(methods.len(), 2);

    let errors = registry.lookup("errors").unwrap();
    let new_fn = errors.lookup("New").unwrap();
    let sig = errors.types().get_unchecked(new_fn.ty).as_signature().unwrap();
    let results = errors.types().get_unchecked(sig.results).as_tuple().unwrap();
    let named = errors.types().get_unchecked(results.vars[0].ty).as_named().unwrap();
    assert_eq!(named.name, "error");
}
