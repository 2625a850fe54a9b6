//! Integration tests for loading type metadata from JSON

use pretty_assertions::assert_eq;
use veneer_types::{MemberDescriptor, MetadataOracle, TypeError, TypeKind, TypeOracle};

const METADATA: &str = r#"{
    "types": [
        {
            "name": "Acme.Widget",
            "kind": "class",
            "bases": ["System.Object", "System.IDisposable"],
            "members": [
                { "kind": "property", "name": "Name", "type": "string",
                  "getter": "public", "setter": "private" },
                { "kind": "property", "name": "this", "type": "int",
                  "parameters": [ { "name": "index", "type": "int" } ],
                  "getter": "public" },
                { "kind": "event", "name": "Changed", "handler_type": "System.EventHandler" },
                { "kind": "method", "name": "Dispose" }
            ]
        },
        { "name": "System.Object", "kind": "class" },
        { "name": "System.IDisposable", "kind": "interface",
          "members": [ { "kind": "method", "name": "Dispose" } ] }
    ]
}"#;

#[test]
fn test_load_metadata_json() {
    let oracle = MetadataOracle::from_json(METADATA).unwrap();
    assert_eq!(oracle.len(), 3);

    let widget = oracle.resolve_type("Acme.Widget", &[]).unwrap();
    assert_eq!(widget.kind, TypeKind::Class);

    let disposable = oracle.resolve_type("IDisposable", &["System".to_string()]).unwrap();
    assert!(disposable.is_interface());

    assert_eq!(
        oracle.get_base_types("Acme.Widget"),
        vec!["System.Object".to_string(), "System.IDisposable".to_string()]
    );
}

#[test]
fn test_members_keep_declaration_order() {
    let oracle = MetadataOracle::from_json(METADATA).unwrap();
    let names: Vec<String> = oracle
        .get_members("Acme.Widget")
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    assert_eq!(names, vec!["Name", "this", "Changed", "Dispose"]);
}

#[test]
fn test_member_shapes() {
    let oracle = MetadataOracle::from_json(METADATA).unwrap();
    let members = oracle.get_members("Acme.Widget");

    match &members[1] {
        MemberDescriptor::Property(p) => {
            assert!(p.is_indexer());
            assert!(p.has_public_getter());
            assert!(!p.has_public_setter());
        }
        other => panic!("expected indexer, got {:?}", other),
    }

    match &members[2] {
        MemberDescriptor::Event(e) => {
            assert!(e.has_add && e.has_remove);
        }
        other => panic!("expected event, got {:?}", other),
    }

    match &members[3] {
        MemberDescriptor::Method(m) => assert!(m.returns_void()),
        other => panic!("expected method, got {:?}", other),
    }
}

#[test]
fn test_malformed_json_is_parse_error() {
    let result = MetadataOracle::from_json("{ \"types\": [ { \"name\": 1 } ] }");
    assert!(matches!(result, Err(TypeError::Parse(_))));
}
