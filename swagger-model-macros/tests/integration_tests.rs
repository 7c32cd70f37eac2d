//! Integration tests for the Describe derive macro.
//!
//! These tests verify that the macro produces descriptors the builder turns
//! into the expected models.

// `swagger_model::Describe` names both the trait and the re-exported derive.
use swagger_model::{build_models, Describe, DescribeComposite, Primitive, TypeShape};

// =============================================================================
// Basic Struct Tests
// =============================================================================

#[test]
fn test_basic_struct_derive() {
    #[derive(Describe)]
    #[allow(dead_code)]
    struct User {
        name: String,
        age: u32,
    }

    let composite = User::composite();
    assert_eq!(composite.name(), Some("integration_tests.User"));
    assert!(composite.key().ends_with("User"));
    assert_eq!(composite.members().len(), 2);

    let registry = build_models::<User>();
    let model = registry.get("integration_tests.User").unwrap();
    assert_eq!(model.required, vec!["name", "age"]);
    assert_eq!(model.property("name").unwrap().type_name, "string");
    assert_eq!(model.property("age").unwrap().type_name, "integer");
}

#[test]
fn test_struct_shape_is_composite() {
    #[derive(Describe)]
    #[allow(dead_code)]
    struct Point {
        x: f64,
        y: f64,
    }

    assert!(Point::shape().is_composite());
    let registry = build_models::<Point>();
    let point = registry.get("integration_tests.Point").unwrap();
    assert_eq!(point.property("x").unwrap().type_name, "number");
}

#[test]
fn test_unit_and_tuple_structs_are_opaque() {
    #[derive(Describe)]
    struct Empty;

    #[derive(Describe)]
    #[allow(dead_code)]
    struct Pair(i32, i32);

    assert!(matches!(Empty::shape(), TypeShape::Opaque));
    assert!(matches!(Pair::shape(), TypeShape::Opaque));
    assert!(build_models::<Empty>().is_empty());
}

#[test]
fn test_newtype_is_transparent() {
    #[derive(Describe)]
    #[allow(dead_code)]
    struct UserId(u64);

    #[derive(Describe)]
    #[allow(dead_code)]
    struct Order {
        owner: UserId,
    }

    assert!(matches!(UserId::shape(), TypeShape::Primitive(Primitive::U64)));
    let registry = build_models::<Order>();
    let order = registry.get("integration_tests.Order").unwrap();
    assert_eq!(order.property("owner").unwrap().type_name, "integer");
}

// =============================================================================
// Enum Tests
// =============================================================================

#[test]
fn test_unit_enum_is_string() {
    #[derive(Describe)]
    #[allow(dead_code)]
    enum Status {
        Active,
        Inactive,
    }

    assert!(matches!(Status::shape(), TypeShape::Primitive(Primitive::String)));
}

// =============================================================================
// Container Attribute Tests
// =============================================================================

#[test]
fn test_explicit_rename() {
    #[derive(Describe)]
    #[model(rename = "shop.Item")]
    #[allow(dead_code)]
    struct Item {
        sku: String,
    }

    assert_eq!(Item::composite().name(), Some("shop.Item"));
    assert!(build_models::<Item>().contains("shop.Item"));
}

#[test]
fn test_namespace() {
    #[derive(Describe)]
    #[model(namespace = "shop")]
    #[allow(dead_code)]
    struct Cart {
        items: Vec<String>,
    }

    assert_eq!(Cart::composite().name(), Some("shop.Cart"));
}

#[test]
fn test_anonymous_container() {
    #[derive(Describe)]
    #[model(anonymous)]
    #[allow(dead_code)]
    struct Address {
        street: String,
    }

    #[derive(Describe)]
    #[allow(dead_code)]
    struct Customer {
        home: Address,
        work: Option<Address>,
    }

    assert!(Address::composite().is_anonymous());

    let registry = build_models::<Customer>();
    let customer = registry.get("integration_tests.Customer").unwrap();
    assert_eq!(customer.property("home").unwrap().type_name, "integration_tests.Customer.home");
    assert_eq!(customer.property("work").unwrap().type_name, "integration_tests.Customer.work");
    assert_eq!(customer.required, vec!["work"]);
    assert!(registry.contains("integration_tests.Customer.home"));
}

#[test]
fn test_rename_all() {
    #[derive(Describe)]
    #[model(rename_all = "PascalCase")]
    #[allow(dead_code)]
    struct Settings {
        dark_mode: bool,
        font_size: u8,
    }

    let registry = build_models::<Settings>();
    let settings = registry.get("integration_tests.Settings").unwrap();
    assert_eq!(settings.required, vec!["DarkMode", "FontSize"]);
}

// =============================================================================
// Field Attribute Tests
// =============================================================================

#[test]
fn test_field_attributes() {
    #[derive(Describe)]
    #[allow(dead_code)]
    struct Record {
        #[model(rename = "ID")]
        id: u64,
        #[model(skip)]
        secret: String,
        #[model(omit_empty)]
        note: String,
        #[model(string)]
        version: Option<i64>,
        #[model(description = "When it happened")]
        at: u64,
    }

    let registry = build_models::<Record>();
    let record = registry.get("integration_tests.Record").unwrap();
    assert_eq!(record.required, vec!["ID", "version", "at"]);
    assert!(record.property("secret").is_none());
    assert!(record.property("note").is_some());

    let version = record.property("version").unwrap();
    assert_eq!(version.type_name, "string");
    assert_eq!(version.description, "(i64 as string)");
    assert_eq!(record.property("at").unwrap().description, "When it happened");
}

#[test]
fn test_doc_comment_description() {
    #[derive(Describe)]
    #[allow(dead_code)]
    struct Doc {
        /// Display name
        /// shown in lists.
        title: String,
        untitled: String,
    }

    let registry = build_models::<Doc>();
    let doc = registry.get("integration_tests.Doc").unwrap();
    assert_eq!(doc.property("title").unwrap().description, "Display name\nshown in lists.");
    assert_eq!(doc.property("untitled").unwrap().description, "");
}

#[test]
fn test_flatten() {
    #[derive(Describe)]
    #[allow(dead_code)]
    struct Audit {
        created_by: String,
    }

    #[derive(Describe)]
    #[allow(dead_code)]
    struct Post {
        body: String,
        #[model(flatten)]
        audit: Audit,
    }

    let registry = build_models::<Post>();
    assert_eq!(registry.len(), 1);
    let post = registry.get("integration_tests.Post").unwrap();
    assert_eq!(post.required, vec!["body", "created_by"]);
}

// =============================================================================
// Recursive and Generic Types
// =============================================================================

#[test]
fn test_self_referential_struct() {
    #[derive(Describe)]
    #[allow(dead_code)]
    struct Node {
        children: Vec<Node>,
        parent: Option<Box<Node>>,
    }

    let registry = build_models::<Node>();
    assert_eq!(registry.len(), 1);
    let node = registry.get("integration_tests.Node").unwrap();
    assert_eq!(node.property("children").unwrap().reference(), Some("integration_tests.Node"));
    assert_eq!(node.property("parent").unwrap().type_name, "integration_tests.Node");
    assert!(registry.detect_cycles().is_some());
}

#[test]
fn test_generic_struct() {
    #[derive(Describe)]
    #[allow(dead_code)]
    struct Envelope<T> {
        data: T,
        meta: std::collections::HashMap<String, String>,
    }

    let registry = build_models::<Envelope<bool>>();
    let envelope = registry.get("integration_tests.Envelope[bool]").unwrap();
    assert_eq!(envelope.property("data").unwrap().type_name, "boolean");
    assert_eq!(envelope.property("meta").unwrap().type_name, "object");
}
