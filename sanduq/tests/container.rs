use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sanduq::{Arg, Args, Container, ContainerError, Function, Lifetime, Value, global};

#[derive(Debug)]
struct UserService {
    name: String,
}

fn new_user_service(name: &str) -> UserService {
    UserService { name: name.into() }
}

fn name_of(value: &Value) -> String {
    value.downcast_ref::<UserService>().expect("UserService").name.clone()
}

#[test]
fn singleton_resolve() {
    let container = Container::new();
    container.singleton("UserService", new_user_service("hello"));

    let resolved = container.resolve("UserService").expect("registered");
    assert_eq!(name_of(&resolved), "hello");
}

#[test]
fn instance_resolve() {
    let built = Arc::new(AtomicUsize::new(0));
    let container = Container::new();
    container.instance("UserService", {
        let built = built.clone();
        move || {
            built.fetch_add(1, Ordering::SeqCst);
            new_user_service("hello")
        }
    });

    for _ in 0..3 {
        assert_eq!(name_of(&container.resolve("UserService").unwrap()), "hello");
    }
    assert_eq!(built.load(Ordering::SeqCst), 3);
}

#[test]
fn alias_singleton_resolve() {
    let container = Container::new();
    container.singleton("UserService", new_user_service("hello"));
    container.alias("UserServ", "UserService");

    let resolved = container.resolve("UserServ").unwrap();
    assert_eq!(name_of(&resolved), "hello");
    assert!(resolved.ptr_eq(&container.resolve("UserService").unwrap()));
}

#[test]
fn alias_instance_resolve() {
    let container = Container::new();
    container.instance("UserService", || new_user_service("hello"));
    container.alias("UserServ", "UserService");

    assert_eq!(name_of(&container.resolve("UserServ").unwrap()), "hello");
    assert_eq!(container.lifetime("UserServ"), Some(Lifetime::Instance));
}

#[test]
fn resolve_group() {
    let container = Container::new();
    container.singleton("UserService", new_user_service("new user"));
    container.singleton("GoodsService", new_user_service("new goods"));
    container.singleton("OrderService", new_user_service("new order"));

    let services = container.resolve_group(&["UserService", "OrderService", "GoodsService"]);
    let names: Vec<String> = services.iter().map(|v| name_of(v.as_ref().unwrap())).collect();
    assert_eq!(names, vec!["new user", "new order", "new goods"]);
}

#[test]
fn call_mixes_injection_and_overrides() {
    let container = Container::new();
    container.singleton("UserService", new_user_service("hello"));

    let describe = |svc: Arc<UserService>, suffix: Arc<String>| format!("{}{}", svc.name, suffix);
    let results = container
        .call(
            &describe,
            &["UserService", "suffix"],
            vec![Arg::Inject, Arg::given(String::from("!"))],
        )
        .unwrap();
    assert_eq!(results[0].downcast_ref::<String>().unwrap(), "hello!");
}

#[test]
fn call_spec_packs_slots() {
    let container = Container::new();
    container.singleton("UserService", new_user_service("hello"));

    let value = container
        .invoke_spec(
            |args: Vec<Value>| args.iter().filter(|v| !v.is_nil()).count(),
            Args::new().inject("UserService").inject("Missing").with("extra", 1u8),
        )
        .unwrap();
    assert_eq!(value.downcast_ref::<usize>(), Some(&2));
}

#[test]
fn registered_functions_are_callable_by_name() {
    let container = Container::new();
    container.singleton("UserService", new_user_service("hello"));
    container.singleton("name_len", Function::new(|svc: Arc<UserService>| svc.name.len()));

    let function = container.require("name_len").unwrap();
    let results = container
        .call_value(&function, &["UserService"], vec![Arg::Inject])
        .unwrap();
    assert_eq!(results[0].downcast_ref::<usize>(), Some(&5));

    let plain = container.require("UserService").unwrap();
    assert!(container.call_value(&plain, &[], vec![]).unwrap().is_empty());
}

#[test]
fn require_explains_misses() {
    let container = Container::new();
    container.singleton("UserService", new_user_service("hello"));

    let err = container.require("UserServce").unwrap_err();
    assert!(matches!(err, ContainerError::NotRegistered { .. }));
    assert_eq!(
        err.to_string(),
        "Resource not registered: `UserServce` (did you mean `UserService`?)"
    );
}

#[test]
fn reset_then_reuse() {
    let container = Container::new();
    container.singleton("UserService", new_user_service("first"));
    container.reset();
    assert!(container.resolve("UserService").is_none());

    container.singleton("UserService", new_user_service("second"));
    assert_eq!(name_of(&container.resolve("UserService").unwrap()), "second");
}

#[test]
fn global_container_is_shared() {
    global().singleton("tests.container.global", new_user_service("global"));
    let resolved = global().resolve("tests.container.global").unwrap();
    assert_eq!(name_of(&resolved), "global");
}

#[test]
fn resolved_values_reregister_unchanged() {
    let container = Container::new();
    container.singleton("UserService", new_user_service("hello"));
    container.singleton("Nothing", Value::nil());

    let service = container.resolve("UserService").unwrap();
    container.singleton("Copied", service.clone());
    container.singleton_arc("Shared", service.downcast::<UserService>().unwrap());

    assert!(container.resolve("Nothing").unwrap().is_nil());
    assert_eq!(name_of(&container.resolve("Copied").unwrap()), "hello");
    assert!(container.resolve("Shared").unwrap().ptr_eq(&service));
}
