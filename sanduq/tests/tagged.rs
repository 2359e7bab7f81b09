use std::sync::Arc;

use sanduq::{Container, ContainerError, Directive, Tagged, Value};

#[derive(Debug, Clone, PartialEq)]
struct UserService {
    name: String,
}

#[derive(Debug)]
struct Mailer;

#[derive(Tagged)]
struct TagDemo {
    #[tag(dep = "UserService")]
    name: Value,
    #[tag(dep = "Mailer")]
    mailer: Option<Arc<Mailer>>,
    retries: u32,
}

impl TagDemo {
    fn new() -> Self {
        Self {
            name: Value::new("test"),
            mailer: None,
            retries: 3,
        }
    }
}

#[derive(Debug, Tagged)]
struct Strict {
    #[tag(dep = "UserService")]
    service: Arc<UserService>,
}

#[derive(Tagged)]
struct Keywords {
    #[tag(dep = "type")]
    r#type: Option<Arc<String>>,
}

#[derive(Tagged)]
struct Marker;

#[derive(Tagged)]
struct Holder<T: Send + Sync + 'static> {
    #[tag(dep = "UserService")]
    service: Option<Arc<UserService>>,
    extra: T,
}

fn user(name: &str) -> UserService {
    UserService { name: name.into() }
}

fn container_with_user() -> Container {
    let container = Container::new();
    container.singleton("UserService", user("hello"));
    container
}

#[test]
fn directives_follow_field_order() {
    assert_eq!(
        TagDemo::DIRECTIVES,
        &[
            Directive { field: "name", dependency: "UserService" },
            Directive { field: "mailer", dependency: "Mailer" },
        ]
    );
    assert!(Marker::DIRECTIVES.is_empty());
}

#[test]
fn tag_resolve() {
    let container = container_with_user();
    container.tag("TagDemo", TagDemo::new()).unwrap();

    let tag_demo = container.resolve("TagDemo").expect("TagDemo registered");
    let demo = tag_demo.downcast_ref::<TagDemo>().expect("TagDemo type");
    let service = demo.name.downcast_ref::<UserService>().expect("UserService type");
    assert_eq!(service.name, "hello");
    assert!(demo.mailer.is_none());
    assert_eq!(demo.retries, 3);
}

#[test]
fn tagged_handle_is_the_registered_singleton() {
    let container = container_with_user();
    container.singleton("Mailer", Mailer);

    let handle = container.tag("TagDemo", TagDemo::new()).unwrap();
    assert!(handle.mailer.is_some());

    let again = container.resolve("TagDemo").unwrap().downcast::<TagDemo>().unwrap();
    assert!(Arc::ptr_eq(&handle, &again));
}

#[test]
fn injected_singleton_shares_identity() {
    let container = container_with_user();
    let handle = container.tag("TagDemo", TagDemo::new()).unwrap();

    let service = container.resolve("UserService").unwrap();
    assert!(handle.name.ptr_eq(&service));
}

#[test]
fn shape_mismatch_is_fatal_and_registers_nothing() {
    let container = Container::new();
    container.singleton("UserService", 42u8);

    let err = container
        .tag("Strict", Strict { service: Arc::new(user("placeholder")) })
        .unwrap_err();

    match err {
        ContainerError::Injection { field, dependency, source, .. } => {
            assert_eq!(field, "service");
            assert_eq!(dependency, "UserService");
            assert!(matches!(*source, ContainerError::ShapeMismatch { found: "u8", .. }));
        }
        other => panic!("Expected Injection, got: {other:?}"),
    }
    assert!(container.resolve("Strict").is_none());
}

#[test]
fn unknown_field_is_reported() {
    let mut demo = TagDemo::new();
    let err = demo.assign("retries", Value::new(1u32)).unwrap_err();
    assert!(matches!(err, ContainerError::UnknownField { .. }));
    assert_eq!(demo.retries, 3);
}

#[test]
fn raw_identifiers_are_unraw() {
    assert_eq!(Keywords::DIRECTIVES[0].field, "type");

    let container = Container::new();
    container.singleton("type", String::from("keyword"));
    let keywords = container.tag("Keywords", Keywords { r#type: None }).unwrap();
    assert_eq!(keywords.r#type.as_deref().map(String::as_str), Some("keyword"));
}

#[test]
fn unit_struct_registers_as_is() {
    let container = Container::new();
    container.tag("Marker", Marker).unwrap();
    assert!(container.resolve("Marker").unwrap().is::<Marker>());
}

#[test]
fn generic_struct_tags_statically() {
    let container = container_with_user();
    let holder = container
        .tag("Holder", Holder { service: None, extra: 5u8 })
        .unwrap();
    assert_eq!(holder.service.as_ref().unwrap().name, "hello");
    assert_eq!(holder.extra, 5);
}

#[test]
fn tag_any_finds_derived_tables() {
    let container = container_with_user();

    let value = container
        .tag_any("TagDemo", Box::new(TagDemo::new()))
        .unwrap()
        .expect("derived types are discoverable");
    let demo = value.downcast_ref::<TagDemo>().unwrap();
    assert_eq!(demo.name.downcast_ref::<UserService>().unwrap().name, "hello");
    assert!(container.resolve("TagDemo").unwrap().ptr_eq(&value));
}

#[test]
fn tag_any_skips_non_aggregates() {
    let container = container_with_user();

    assert!(container.tag_any("Plain", Box::new(user("plain"))).unwrap().is_none());
    assert!(container.tag_any("Number", Box::new(7i32)).unwrap().is_none());
    assert!(
        container
            .tag_any("Holder", Box::new(Holder { service: None, extra: 1u8 }))
            .unwrap()
            .is_none()
    );
    assert_eq!(container.names(), vec!["UserService"]);
}
