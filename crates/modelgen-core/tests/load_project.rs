use std::fs;
use std::path::Path;

use modelgen_core::{
    Definition, FileScope, KeyKind, KeyReference, LoadError, LoadOptions, ObjectId, Project,
    Scalar, dump_project, load_project, load_project_with_options,
};

fn parse(text: &str) -> Definition {
    serde_yaml::from_str(text).expect("parse yaml")
}

fn load(text: &str) -> Result<Project, LoadError> {
    load_project(&parse(text))
}

fn load_fixture(name: &str) -> Definition {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let contents =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture at {}", path.display()));
    serde_yaml::from_str(&contents).expect("parse fixture")
}

const FILES: &str = "files:\n  - scope: project\n    input: a.hbs\n    output: out/a.txt\n";

const USER_POST: &str = r#"
name: Blog
objects:
  - name: User
    properties:
      - name: id
        type: id
      - name: email
        type: email
        mandatory: true
    indexes:
      - name: by_email
        unique: true
        keys:
          - property: email
  - name: Post
    properties:
      - name: id
        type: id
    links:
      - name: author
        target: User
        mandatory: true
files:
  - scope: project
    input: a.tpl
    output: "out/{{project.name}}.txt"
"#;

#[test]
fn links_resolve_to_the_target_and_populate_reverse_links() {
    let project = load(USER_POST).expect("load project");

    let (user_id, user) = project.find_object("User").expect("User");
    let (post_id, post) = project.find_object("Post").expect("Post");

    assert_eq!(post.links.len(), 1);
    assert_eq!(post.links[0].target, user_id);
    assert_eq!(post.links[0].source, post_id);
    assert!(std::ptr::eq(project.object(post.links[0].target), user));

    assert_eq!(user.reverse_links.len(), 1);
    let reverse = project.link(user.reverse_links[0]);
    assert!(std::ptr::eq(reverse, &post.links[0]));
    assert!(post.reverse_links.is_empty());
}

#[test]
fn index_key_refers_to_the_owned_property() {
    let project = load(USER_POST).expect("load project");
    let (_, user) = project.find_object("User").expect("User");
    let index = user.index("by_email").expect("by_email");

    assert!(index.unique);
    assert_eq!(index.keys.len(), 1);
    let key = &index.keys[0];
    assert!(key.is_last);
    assert_eq!(key.position, 1);
    assert_eq!(key.kind(), KeyKind::Property);

    let KeyReference::Property(id) = key.reference else {
        panic!("expected a property reference");
    };
    assert!(std::ptr::eq(project.property(id), &user.properties[1]));
    assert_eq!(project.key_reference_name(key), "email");
}

#[test]
fn properties_stamp_the_last_element() {
    let project = load(USER_POST).expect("load project");
    let flags: Vec<bool> = project.objects[0]
        .properties
        .iter()
        .map(|property| property.is_last)
        .collect();
    assert_eq!(flags, vec![false, true]);
}

#[test]
fn missing_project_name_is_incomplete() {
    let text = format!("objects:\n  - name: A\n    properties:\n      - name: id\n        type: id\n{FILES}");
    let err = load(&text).expect_err("no name");
    assert!(matches!(err, LoadError::IncompleteProject { .. }));
}

#[test]
fn empty_object_list_is_incomplete() {
    let err = load(&format!("name: Empty\nobjects: []\n{FILES}")).expect_err("no objects");
    assert_eq!(err.code(), "incomplete_project");
}

#[test]
fn missing_file_list_is_incomplete() {
    let err = load("name: P\nobjects:\n  - name: A\n    properties:\n      - name: id\n        type: id\n")
        .expect_err("no files");
    assert_eq!(err.code(), "incomplete_project");
}

#[test]
fn same_property_name_twice_in_an_object_is_accepted() {
    let text = format!(
        "name: P\nobjects:\n  - name: A\n    properties:\n      - name: id\n        type: id\n      - name: id\n        type: string\n{FILES}"
    );
    let project = load(&text).expect("load project");
    assert_eq!(project.objects[0].properties.len(), 2);
}

#[test]
fn field_declared_twice_in_one_property_fails() {
    let text = format!(
        "name: P\nobjects:\n  - name: A\n    properties:\n      - name: id\n        type: id\n        type: string\n{FILES}"
    );
    let err = load(&text).expect_err("duplicate type");
    assert!(matches!(
        err,
        LoadError::DuplicateDefinition { ref field, .. } if field == "type"
    ));
}

#[test]
fn minimum_above_maximum_fails_the_load() {
    let text = format!(
        "name: P\nobjects:\n  - name: A\n    properties:\n      - name: qty\n        type: integer\n        minimum: 5\n        maximum: 1\n{FILES}"
    );
    let err = load(&text).expect_err("range");
    assert!(matches!(err, LoadError::RangeViolation { .. }));
}

#[test]
fn unknown_link_target_fails() {
    let text = format!(
        "name: P\nobjects:\n  - name: A\n    properties:\n      - name: id\n        type: id\n    links:\n      - name: owner\n        target: Ghost\n{FILES}"
    );
    let err = load(&text).expect_err("unresolved target");
    assert!(matches!(
        err,
        LoadError::UnresolvedLinkTarget { ref target, .. } if target == "Ghost"
    ));
}

#[test]
fn index_key_on_another_object_is_unresolved() {
    let text = format!(
        r#"name: P
objects:
  - name: A
    properties:
      - name: id
        type: id
    indexes:
      - name: by_email
        keys:
          - property: email
  - name: B
    properties:
      - name: email
        type: email
{FILES}"#
    );
    let err = load(&text).expect_err("unresolved key");
    assert!(matches!(
        err,
        LoadError::UnresolvedIndexKey { kind: KeyKind::Property, ref reference, .. }
            if reference == "email"
    ));
}

#[test]
fn links_may_target_later_objects_but_types_may_not_come_later() {
    let project = load_project(&load_fixture("shop.yaml")).expect("load shop");
    let (_, order) = project.find_object("Order").expect("Order");
    let (customer_id, _) = project.find_object("Customer").expect("Customer");
    assert_eq!(order.link("customer").map(|link| link.target), Some(customer_id));

    let text = format!(
        "name: P\nobjects:\n  - name: A\n    properties:\n      - name: state\n        type: status\ndatatypes:\n  - name: status\n    type: enumeration\n    values: [on, off]\n{FILES}"
    );
    let err = load(&text).expect_err("type declared later");
    assert_eq!(err.code(), "unknown_data_type");
}

#[test]
fn index_keys_can_reference_links() {
    let project = load_project(&load_fixture("shop.yaml")).expect("load shop");
    let (order_id, order) = project.find_object("Order").expect("Order");
    let index = order.index("by_customer_status").expect("index");

    assert!(!index.unique);
    assert_eq!(index.object, order_id);
    assert_eq!(index.keys[0].kind(), KeyKind::Link);
    assert_eq!(project.key_reference_name(&index.keys[0]), "customer");
    assert!(!index.keys[0].is_last);
    assert!(index.keys[1].is_last);
}

#[test]
fn shop_fixture_loads_attributes_types_and_files() {
    let project = load_project(&load_fixture("shop.yaml")).expect("load shop");

    assert_eq!(project.name, "Shop");
    assert_eq!(
        project.attributes.get("package"),
        Some(&Scalar::String("com.example.shop".to_string()))
    );
    let user_types: Vec<&str> = project
        .user_data_types()
        .map(|data_type| data_type.name.as_str())
        .collect();
    assert_eq!(user_types, vec!["order_status"]);

    let (_, order) = project.find_object("Order").expect("Order");
    let status = order.property("status").expect("status");
    assert_eq!(project.data_type(status.data_type).values.len(), 3);
    assert_eq!(status.default_value, Some(Scalar::String("pending".to_string())));
    assert_eq!(order.link("coupon").map(|link| link.mandatory), Some(false));

    let (_, customer) = project.find_object("Customer").expect("Customer");
    assert!(customer.property("password").expect("password").secret);
    assert_eq!(customer.reverse_links.len(), 1);

    let scopes: Vec<FileScope> = project.files.iter().map(|file| file.scope).collect();
    assert_eq!(scopes, vec![FileScope::Project, FileScope::Object]);
}

#[test]
fn loading_twice_yields_identical_projects() {
    let definition = load_fixture("shop.yaml");
    let first = load_project(&definition).expect("first load");
    let second = load_project(&definition).expect("second load");
    assert_eq!(first, second);
    assert_eq!(dump_project(&first), dump_project(&second));
}

#[test]
fn duplicate_object_names_are_rejected() {
    let text = format!(
        "name: P\nobjects:\n  - name: A\n    properties:\n      - name: id\n        type: id\n  - name: A\n    properties:\n      - name: id\n        type: id\n{FILES}"
    );
    let err = load(&text).expect_err("duplicate object");
    assert!(matches!(
        err,
        LoadError::DuplicateDefinition { ref field, .. } if field == "object <A>"
    ));
}

#[test]
fn duplicate_index_names_follow_the_option() {
    let text = format!(
        r#"name: P
objects:
  - name: A
    properties:
      - name: id
        type: id
    indexes:
      - name: by_id
        keys: [{{property: id}}]
      - name: by_id
        unique: false
        keys: [{{property: id}}]
{FILES}"#
    );
    let definition = parse(&text);

    let err = load_project(&definition).expect_err("enforced by default");
    assert_eq!(err.code(), "duplicate_definition");

    let options = LoadOptions {
        enforce_unique_index_names: false,
    };
    let project = load_project_with_options(&definition, &options).expect("unchecked");
    assert_eq!(project.object(ObjectId(0)).indexes.len(), 2);
}

#[test]
fn duplicate_link_names_are_rejected() {
    let text = format!(
        "name: P\nobjects:\n  - name: A\n    properties:\n      - name: id\n        type: id\n    links:\n      - name: parent\n        target: A\n      - name: parent\n        target: A\n{FILES}"
    );
    let err = load(&text).expect_err("duplicate link");
    assert!(matches!(
        err,
        LoadError::DuplicateDefinition { ref field, .. } if field == "link <parent>"
    ));
}

#[test]
fn unknown_top_level_key_is_reported() {
    let err = load(&format!("name: P\nversion: 2\n{FILES}")).expect_err("unknown key");
    assert!(matches!(
        err,
        LoadError::UnknownAttribute { ref key, .. } if key == "version"
    ));
}

#[test]
fn dump_lists_every_section() {
    let project = load_project(&load_fixture("shop.yaml")).expect("load shop");
    let dump = dump_project(&project);

    assert!(dump.starts_with("Project <Shop> :"));
    assert!(dump.contains("- Data type enumeration <order_status>"));
    assert!(dump.contains("- Link <customer> (target:Customer, mandatory:true)"));
    assert!(dump.contains("- Key n°1/2 : link <customer>"));
    assert!(dump.contains("- File n°2 (scope <object>)"));
}

#[test]
fn property_attributes_accept_mapping_and_list_forms() {
    let text = format!(
        r#"name: P
objects:
  - name: A
    properties:
      - name: code
        type: string
        attributes:
          column: a_code
          length: 12
      - name: label
        type: text
        attributes:
          - name: column
            value: a_label
          - name: searchable
            value: true
{FILES}"#
    );
    let project = load(&text).expect("load project");
    let (_, object) = project.find_object("A").expect("A");

    let code = object.property("code").expect("code");
    let keys: Vec<&str> = code.attributes.iter().map(|(name, _)| name).collect();
    assert_eq!(keys, vec!["column", "length"]);
    assert_eq!(
        code.attributes.get("column"),
        Some(&Scalar::String("a_code".to_string()))
    );
    assert_eq!(code.attributes.get("length"), Some(&Scalar::Number(12.into())));

    let label = object.property("label").expect("label");
    assert_eq!(
        label.attributes.get("column"),
        Some(&Scalar::String("a_label".to_string()))
    );
    assert_eq!(label.attributes.get("searchable"), Some(&Scalar::Bool(true)));
}

#[test]
fn attributes_declared_twice_in_one_property_fail() {
    let text = format!(
        "name: P\nobjects:\n  - name: A\n    properties:\n      - name: id\n        type: id\n        attributes:\n          column: a\n        attributes:\n          column: b\n{FILES}"
    );
    let err = load(&text).expect_err("duplicate attributes");
    assert!(matches!(
        err,
        LoadError::DuplicateDefinition { ref entity, ref field }
            if field == "attributes" && entity.contains("property <id>")
    ));
}
