//! Stub packages for the supported standard library surface
//!
//! Most packages are declaration tables processed by [`build_stub`]; only
//! shapes the table notation cannot express — interface sets, mutually
//! recursive records — are hand-written builders. Contents are stubs: deep
//! enough to type-check callers, with foreign types simplified the same way
//! throughout (e.g. hash state handles collapse to `int`).

use crate::registry::Registry;
use crate::stub::{
    build_stub, ConstInit, ConstStub, FieldStub, FuncStub, MethodStub, PackageStub, TypeStub,
};
use vela_types::{Field, Method, Package, PackageBuilder, PrimKind, Var};

/// Register every supported stub package into the given registry
///
/// After calling this, `registry.lookup` resolves each supported import
/// path to its lazily built package.
pub fn register_stdlib(registry: &Registry) {
    registry.register("math", || build_stub(&MATH));
    registry.register("strconv", || build_stub(&STRCONV));
    registry.register("errors", || build_stub(&ERRORS));
    registry.register("bytes", || build_stub(&BYTES));
    registry.register("io", build_io);
    registry.register("container/list", build_list);
}

static MATH: PackageStub = PackageStub {
    path: "math",
    name: "math",
    consts: &[
        ConstStub { name: "Pi", ty: "float64", value: ConstInit::Float(std::f64::consts::PI) },
        ConstStub { name: "E", ty: "float64", value: ConstInit::Float(std::f64::consts::E) },
        ConstStub { name: "Sqrt2", ty: "float64", value: ConstInit::Float(std::f64::consts::SQRT_2) },
        ConstStub { name: "MaxFloat64", ty: "float64", value: ConstInit::Float(f64::MAX) },
        ConstStub { name: "MaxInt64", ty: "int64", value: ConstInit::Int(i64::MAX) },
        ConstStub { name: "MinInt64", ty: "int64", value: ConstInit::Int(i64::MIN) },
    ],
    vars: &[],
    types: &[],
    funcs: &[
        FuncStub { name: "Abs", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Sqrt", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Floor", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Ceil", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Round", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Trunc", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Log", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Log2", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Log10", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Exp", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Sin", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Cos", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Tan", params: &[("x", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Min", params: &[("x", "float64"), ("y", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Max", params: &[("x", "float64"), ("y", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Pow", params: &[("x", "float64"), ("y", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Mod", params: &[("x", "float64"), ("y", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Hypot", params: &[("p", "float64"), ("q", "float64")], results: &["float64"], variadic: false },
        FuncStub { name: "Inf", params: &[("sign", "int")], results: &["float64"], variadic: false },
        FuncStub { name: "IsNaN", params: &[("f", "float64")], results: &["bool"], variadic: false },
    ],
};

static STRCONV: PackageStub = PackageStub {
    path: "strconv",
    name: "strconv",
    consts: &[],
    vars: &[],
    types: &[],
    funcs: &[
        FuncStub { name: "Itoa", params: &[("i", "int")], results: &["string"], variadic: false },
        FuncStub { name: "Atoi", params: &[("s", "string")], results: &["int", "error"], variadic: false },
        FuncStub { name: "FormatInt", params: &[("i", "int64"), ("base", "int")], results: &["string"], variadic: false },
        FuncStub { name: "FormatFloat", params: &[("f", "float64"), ("fmt", "byte"), ("prec", "int"), ("bitSize", "int")], results: &["string"], variadic: false },
        FuncStub { name: "ParseFloat", params: &[("s", "string"), ("bitSize", "int")], results: &["float64", "error"], variadic: false },
        FuncStub { name: "Quote", params: &[("s", "string")], results: &["string"], variadic: false },
    ],
};

static ERRORS: PackageStub = PackageStub {
    path: "errors",
    name: "errors",
    consts: &[],
    vars: &[],
    types: &[],
    funcs: &[
        FuncStub { name: "New", params: &[("text", "string")], results: &["error"], variadic: false },
    ],
};

static BYTES: PackageStub = PackageStub {
    path: "bytes",
    name: "bytes",
    consts: &[],
    vars: &[],
    types: &[TypeStub {
        name: "Buffer",
        fields: &[
            FieldStub { name: "buf", ty: "[]byte" },
            FieldStub { name: "off", ty: "int" },
        ],
        methods: &[
            MethodStub { name: "Write", ptr_recv: true, params: &[("p", "[]byte")], results: &["int", "error"], variadic: false },
            MethodStub { name: "WriteString", ptr_recv: true, params: &[("s", "string")], results: &["int", "error"], variadic: false },
            MethodStub { name: "String", ptr_recv: true, params: &[], results: &["string"], variadic: false },
            MethodStub { name: "Bytes", ptr_recv: true, params: &[], results: &["[]byte"], variadic: false },
            MethodStub { name: "Len", ptr_recv: true, params: &[], results: &["int"], variadic: false },
            MethodStub { name: "Reset", ptr_recv: true, params: &[], results: &[], variadic: false },
            MethodStub { name: "Next", ptr_recv: true, params: &[("n", "int")], results: &["[]byte"], variadic: false },
        ],
    }],
    funcs: &[
        FuncStub { name: "NewBuffer", params: &[("buf", "[]byte")], results: &["*Buffer"], variadic: false },
        FuncStub { name: "NewBufferString", params: &[("s", "string")], results: &["*Buffer"], variadic: false },
        FuncStub { name: "Equal", params: &[("a", "[]byte"), ("b", "[]byte")], results: &["bool"], variadic: false },
        FuncStub { name: "Contains", params: &[("b", "[]byte"), ("subslice", "[]byte")], results: &["bool"], variadic: false },
        FuncStub { name: "Join", params: &[("s", "[][]byte"), ("sep", "[]byte")], results: &["[]byte"], variadic: false },
    ],
};

/// Build the `io` package: the interface tower Reader/Writer/Closer plus
/// their embedding combinations, and the EOF sentinel
fn build_io() -> Package {
    let mut b = PackageBuilder::new("io", "io");

    let reader = b.declare_named("Reader");
    let writer = b.declare_named("Writer");
    let closer = b.declare_named("Closer");
    let read_writer = b.declare_named("ReadWriter");
    let read_write_closer = b.declare_named("ReadWriteCloser");

    let byte = b.types().prim(PrimKind::Byte);
    let bytes = b.types().slice(byte);
    let int = b.types().prim(PrimKind::Int);
    let int64 = b.types().prim(PrimKind::Int64);
    let err = b.types().error_type();

    // Read(p []byte) (n int, err error)
    let read_sig = b.types().func_sig(
        vec![Var::new("p", bytes)],
        vec![Var::new("n", int), Var::new("err", err)],
        false,
    );
    let reader_iface = b.types().interface(
        vec![Method { name: "Read".to_string(), sig: read_sig }],
        Vec::new(),
    );
    b.types().complete_interface(reader_iface);
    b.types().set_underlying(reader, reader_iface);

    // Write(p []byte) (n int, err error)
    let write_sig = b.types().func_sig(
        vec![Var::new("p", bytes)],
        vec![Var::new("n", int), Var::new("err", err)],
        false,
    );
    let writer_iface = b.types().interface(
        vec![Method { name: "Write".to_string(), sig: write_sig }],
        Vec::new(),
    );
    b.types().complete_interface(writer_iface);
    b.types().set_underlying(writer, writer_iface);

    // Close() error
    let close_sig = b.types().func_sig(Vec::new(), vec![Var::new("", err)], false);
    let closer_iface = b.types().interface(
        vec![Method { name: "Close".to_string(), sig: close_sig }],
        Vec::new(),
    );
    b.types().complete_interface(closer_iface);
    b.types().set_underlying(closer, closer_iface);

    let rw_iface = b.types().interface(Vec::new(), vec![reader, writer]);
    b.types().complete_interface(rw_iface);
    b.types().set_underlying(read_writer, rw_iface);

    let rwc_iface = b.types().interface(Vec::new(), vec![reader, writer, closer]);
    b.types().complete_interface(rwc_iface);
    b.types().set_underlying(read_write_closer, rwc_iface);

    b.define_var("EOF", err);

    // func ReadAll(r Reader) ([]byte, error)
    b.define_func_decl(
        "ReadAll",
        vec![Var::new("r", reader)],
        vec![Var::new("", bytes), Var::new("", err)],
        false,
    );
    // func Copy(dst Writer, src Reader) (written int64, err error)
    b.define_func_decl(
        "Copy",
        vec![Var::new("dst", writer), Var::new("src", reader)],
        vec![Var::new("written", int64), Var::new("err", err)],
        false,
    );

    b.finish()
}

/// Build the `container/list` package: the canonical mutually recursive
/// pair, `Element` and `List`
fn build_list() -> Package {
    let mut b = PackageBuilder::new("container/list", "list");

    // Both identities exist before either shape is built; each record
    // references the other (and Element references itself).
    let element = b.declare_named("Element");
    let list = b.declare_named("List");

    let any = b.types().any_type();
    let int = b.types().prim(PrimKind::Int);
    let elem_ptr = b.types().pointer(element);
    let list_ptr = b.types().pointer(list);

    let element_shape = b.types().struct_type(vec![
        Field::new("next", elem_ptr),
        Field::new("prev", elem_ptr),
        Field::new("list", list_ptr),
        Field::new("Value", any),
    ]);
    b.types().set_underlying(element, element_shape);

    let list_shape = b.types().struct_type(vec![
        Field::new("root", element),
        Field::new("len", int),
    ]);
    b.types().set_underlying(list, list_shape);

    b.define_method(
        element,
        "Next",
        Var::new("e", elem_ptr),
        Vec::new(),
        vec![Var::new("", elem_ptr)],
        false,
    );
    b.define_method(
        element,
        "Prev",
        Var::new("e", elem_ptr),
        Vec::new(),
        vec![Var::new("", elem_ptr)],
        false,
    );

    b.define_method(list, "Init", Var::new("l", list_ptr), Vec::new(), vec![Var::new("", list_ptr)], false);
    b.define_method(list, "Len", Var::new("l", list_ptr), Vec::new(), vec![Var::new("", int)], false);
    b.define_method(list, "Front", Var::new("l", list_ptr), Vec::new(), vec![Var::new("", elem_ptr)], false);
    b.define_method(list, "Back", Var::new("l", list_ptr), Vec::new(), vec![Var::new("", elem_ptr)], false);
    b.define_method(
        list,
        "PushFront",
        Var::new("l", list_ptr),
        vec![Var::new("v", any)],
        vec![Var::new("", elem_ptr)],
        false,
    );
    b.define_method(
        list,
        "PushBack",
        Var::new("l", list_ptr),
        vec![Var::new("v", any)],
        vec![Var::new("", elem_ptr)],
        false,
    );
    b.define_method(
        list,
        "Remove",
        Var::new("l", list_ptr),
        vec![Var::new("e", elem_ptr)],
        vec![Var::new("", any)],
        false,
    );

    // func New() *List
    b.define_func_decl("New", Vec::new(), vec![Var::new("", list_ptr)], false);

    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_types::Type;

    #[test]
    fn test_math_stub() {
        let pkg = build_stub(&MATH);
        assert_eq!(pkg.path(), "math");
        assert!(pkg.is_complete());

        let pi = pkg.lookup("Pi").unwrap();
        assert!(pi.exported);
        assert_eq!(
            pkg.types().get_unchecked(pi.ty).as_prim(),
            Some(PrimKind::Float64)
        );

        let sqrt = pkg.lookup("Sqrt").unwrap();
        let sig = pkg.types().get_unchecked(sqrt.ty).as_signature().unwrap();
        let params = pkg.types().get_unchecked(sig.params).as_tuple().unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(pkg.types().display(sqrt.ty), "func(x float64) (float64)");
    }

    #[test]
    fn test_strconv_multi_result() {
        let pkg = build_stub(&STRCONV);
        let atoi = pkg.lookup("Atoi").unwrap();
        let sig = pkg.types().get_unchecked(atoi.ty).as_signature().unwrap();
        let results = pkg.types().get_unchecked(sig.results).as_tuple().unwrap();
        assert_eq!(results.len(), 2);
        let err_ty = results.vars[1].ty;
        let named = pkg.types().get_unchecked(err_ty).as_named().unwrap();
        assert_eq!(named.name, "error");
    }

    #[test]
    fn test_bytes_buffer_methods() {
        let pkg = build_stub(&BYTES);
        let buffer = pkg.lookup("Buffer").unwrap().ty;
        let named = pkg.types().get_unchecked(buffer).as_named().unwrap();
        assert_eq!(named.methods.len(), 7);

        // NewBuffer returns *Buffer, pointing back at the declared identity
        let new_buffer = pkg.lookup("NewBuffer").unwrap();
        let sig = pkg.types().get_unchecked(new_buffer.ty).as_signature().unwrap();
        let results = pkg.types().get_unchecked(sig.results).as_tuple().unwrap();
        match pkg.types().get_unchecked(results.vars[0].ty) {
            Type::Pointer(elem) => assert_eq!(*elem, buffer),
            other => panic!("expected pointer result, got {other:?}"),
        }
    }

    #[test]
    fn test_io_interfaces_completed() {
        let pkg = build_io();
        for name in ["Reader", "Writer", "Closer", "ReadWriter", "ReadWriteCloser"] {
            let ty = pkg.lookup(name).unwrap().ty;
            let under = pkg.types().underlying(ty).expect("interface attached");
            let iface = pkg.types().get_unchecked(under).as_interface().unwrap();
            assert!(iface.completed, "{name} must be completed");
        }

        let reader = pkg.lookup("Reader").unwrap().ty;
        let under = pkg.types().underlying(reader).unwrap();
        assert_eq!(pkg.types().num_methods(under), 1);

        let rwc = pkg.lookup("ReadWriteCloser").unwrap().ty;
        let under = pkg.types().underlying(rwc).unwrap();
        let iface = pkg.types().get_unchecked(under).as_interface().unwrap();
        assert_eq!(iface.embeds.len(), 3);
        assert_eq!(iface.embeds[0], reader);
    }

    #[test]
    fn test_list_mutual_recursion() {
        let pkg = build_list();
        let element = pkg.lookup("Element").unwrap().ty;
        let list = pkg.lookup("List").unwrap().ty;

        let elem_under = pkg.types().underlying(element).unwrap();
        let fields = match pkg.types().get_unchecked(elem_under) {
            Type::Struct(st) => &st.fields,
            other => panic!("expected struct, got {other:?}"),
        };
        // next *Element (self), list *List (mutual)
        match pkg.types().get_unchecked(fields[0].ty) {
            Type::Pointer(elem) => assert_eq!(*elem, element),
            other => panic!("expected pointer, got {other:?}"),
        }
        match pkg.types().get_unchecked(fields[2].ty) {
            Type::Pointer(elem) => assert_eq!(*elem, list),
            other => panic!("expected pointer, got {other:?}"),
        }

        // List.root is Element by value
        let list_under = pkg.types().underlying(list).unwrap();
        let fields = match pkg.types().get_unchecked(list_under) {
            Type::Struct(st) => &st.fields,
            other => panic!("expected struct, got {other:?}"),
        };
        assert_eq!(fields[0].ty, element);
    }

    #[test]
    fn test_register_stdlib_round_trip() {
        let registry = Registry::new();
        register_stdlib(&registry);

        for path in registry.paths() {
            let pkg = registry.lookup(&path).unwrap();
            assert!(pkg.is_complete(), "{path} is complete");
            assert!(
                !pkg.scope().is_empty(),
                "{path} declares at least one entity"
            );
            assert_eq!(pkg.path(), path);
        }
    }
}
