//! End-to-end parse, render and materialise.

use std::collections::BTreeMap;

use arbor_key::StrFamily;
use arbor_store::{DedicatedStorage, Descriptor, Storage};
use arbor_text::{materialize, parse_str, AstNode, IntegerParser, ValueParsers};
use proptest::prelude::*;

const CONFIG: &str = "\
config
    server
        port: int >> 8080
        host >> \"127.0.0.1\"
    debug >> true
";

type StrStore = DedicatedStorage<StrFamily>;

fn with_tracing<R>(f: impl FnOnce() -> R) -> R {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

// --- Parse ---

#[test]
fn indented_text_parses_to_expected_tree() {
    let ast = parse_str(CONFIG).unwrap();

    let port = ast.lookup(["config", "server", "port"]).unwrap();
    assert_eq!(port.value.as_deref(), Some("8080"));
    assert_eq!(port.explicit_type.as_deref(), Some("int"));

    let host = ast.lookup(["config", "server", "host"]).unwrap();
    assert_eq!(host.value.as_deref(), Some("127.0.0.1"));
    assert_eq!(host.explicit_type, None);

    let debug = ast.lookup(["config", "debug"]).unwrap();
    assert_eq!(debug.value.as_deref(), Some("true"));

    let server = ast.lookup(["config", "server"]).unwrap();
    assert_eq!(server.value, None);
    assert_eq!(ast.node_count(), 5);
}

#[test]
fn parse_is_deterministic_and_rendering_is_idempotent() {
    let first = parse_str(CONFIG).unwrap();
    assert_eq!(parse_str(CONFIG).unwrap(), first);

    let rendered = first.to_text();
    let reparsed = parse_str(&rendered).unwrap();
    assert_eq!(reparsed, first);
    assert_eq!(reparsed.to_text(), rendered);
}

// --- Materialise ---

#[test]
fn integer_dispatch_and_text_fallback() {
    with_tracing(|| {
        let storage = StrStore::new();
        let root = Descriptor::root(&storage);
        let ast = parse_str(CONFIG).unwrap();
        materialize(&ast, &root, &ValueParsers::with_defaults());

        assert_eq!(root.child("config").child("server").child("port").acquire::<i64>(), 8080);
        assert_eq!(root.child("config").child("debug").acquire::<String>(), "true");
        assert_eq!(
            (&root / "config" / "server" / "host").acquire::<String>(),
            "127.0.0.1"
        );
    });
}

#[test]
fn integer_only_registry_keeps_unclaimed_values_as_text() {
    with_tracing(|| {
        let storage = StrStore::new();
        let root = Descriptor::root(&storage);
        let mut parsers = ValueParsers::new();
        parsers.push(IntegerParser);

        let ast = parse_str(CONFIG).unwrap();
        let report = materialize(&ast, &root, &parsers);

        assert_eq!(report.values_written, 3);
        assert_eq!(report.values_skipped, 0);
        assert_eq!((&root / "config" / "server" / "port").acquire::<i64>(), 8080);
        assert_eq!((&root / "config" / "debug").acquire::<String>(), "true");
        assert_eq!(
            (&root / "config" / "server" / "host").acquire::<String>(),
            "127.0.0.1"
        );
        assert_eq!(storage.len(), 3);
    });
}

#[test]
fn integer_only_registry_without_fallback_leaves_other_values_absent() {
    let storage = StrStore::new();
    let root = Descriptor::root(&storage);
    let mut parsers = ValueParsers::new();
    parsers.push(IntegerParser).set_fallback_to_text(false);

    let report = materialize(&parse_str(CONFIG).unwrap(), &root, &parsers);

    assert_eq!(report.values_written, 1);
    assert_eq!(report.values_skipped, 2);
    assert!(!(&root / "config" / "debug").exists());
    assert_eq!(storage.len(), 1);
}

#[test]
fn out_of_range_integer_is_kept_as_text() {
    let storage = StrStore::new();
    let root = Descriptor::root(&storage);
    let ast = parse_str("id >> 12345678901234567890\n").unwrap();
    let report = materialize(&ast, &root, &ValueParsers::with_defaults());
    assert_eq!(report.values_written, 1);
    assert_eq!(root.child("id").acquire::<String>(), "12345678901234567890");
}

#[test]
fn materialises_under_a_subtree() {
    let storage = StrStore::new();
    let root = Descriptor::root(&storage);
    let ast = parse_str("limit: u64 >> 10\nname >> \"svc a\"\n").unwrap();
    materialize(&ast, &root.child("tenants").index(3), &ValueParsers::with_defaults());
    assert_eq!(
        root.at("tenants/3/limit").unwrap().acquire::<u64>(),
        10
    );
    assert_eq!(
        root.at("tenants/3/name").unwrap().acquire::<String>(),
        "svc a"
    );
}

// --- Properties ---

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_.]{0,6}",
        "[ -~]{0,8}",
        "[\\t\\n\\r\"\\\\é:>-]{0,4}",
    ]
}

fn node() -> impl Strategy<Value = AstNode> {
    let leaf = (
        prop::option::of(token()),
        prop::option::of(token()),
    )
        .prop_map(|(value, explicit_type)| AstNode {
            value,
            explicit_type,
            children: BTreeMap::new(),
        });
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop::option::of(token()),
            prop::option::of(token()),
            prop::collection::btree_map(token(), inner, 0..4),
        )
            .prop_map(|(value, explicit_type, children)| AstNode {
                value,
                explicit_type,
                children,
            })
    })
}

fn document() -> impl Strategy<Value = AstNode> {
    prop::collection::btree_map(token(), node(), 0..5).prop_map(|children| AstNode {
        value: None,
        explicit_type: None,
        children,
    })
}

proptest! {
    #[test]
    fn render_then_parse_is_identity(ast in document()) {
        let text = ast.to_text();
        let reparsed = parse_str(&text).unwrap();
        prop_assert_eq!(&reparsed, &ast);
        prop_assert_eq!(reparsed.to_text(), text);
    }

    #[test]
    fn tab_rendering_parses_back(ast in document()) {
        let reparsed = parse_str(&ast.render("\t")).unwrap();
        prop_assert_eq!(reparsed, ast);
    }
}
