//! Basic example of the Sanduq container.
//!
//! Run with `RUST_LOG=sanduq_container=debug` to see registrations.

use std::sync::Arc;

use sanduq::{Arg, Args, Container, ContainerError, Function, Provider, ProviderRegistry, Tagged, Value};

// === Define your resources ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

struct Config {
    database_url: String,
    debug: bool,
}

struct Database {
    url: String,
    logger: Arc<dyn Logger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

#[derive(Tagged)]
struct UserRepository {
    #[tag(dep = "db")]
    db: Option<Arc<Database>>,
    table: &'static str,
}

impl UserRepository {
    fn find_user(&self, id: u64) -> String {
        match &self.db {
            Some(db) => db.query(&format!("SELECT * FROM {} WHERE id = {id}", self.table)),
            None => "no database".to_string(),
        }
    }
}

// === Group related registrations ===

struct InfraProvider;

impl Provider for InfraProvider {
    fn register(&self, registry: &mut dyn ProviderRegistry) {
        registry.register_value(
            "config",
            Value::new(Config {
                database_url: "postgres://localhost/myapp".to_string(),
                debug: true,
            }),
        );
        let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger);
        registry.register_value("logger", Value::new(logger));
    }
}

fn main() -> Result<(), ContainerError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let container = Arc::new(Container::builder().add_provider(&InfraProvider).build());

    // Database: built on first resolve, from other resources.
    container.singleton_with("db", {
        let weak = Arc::downgrade(&container);
        move || {
            let container = weak.upgrade().expect("container outlives its resources");
            let config = container.resolve("config").expect("config registered");
            let logger = container.resolve("logger").expect("logger registered");
            Database {
                url: config.downcast_ref::<Config>().map(|c| c.database_url.clone()).unwrap_or_default(),
                logger: logger.downcast_ref::<Arc<dyn Logger>>().cloned().expect("logger shape"),
            }
        }
    });
    container.alias("database", "db");

    // Request counter: a fresh value on every resolve.
    container.instance("request.started", std::time::Instant::now);

    // Repository: fields filled from the container, then registered.
    let repo = container.tag("users", UserRepository { db: None, table: "users" })?;
    println!("👤 {}", repo.find_user(42));

    let config: Arc<Config> = container.require("config")?.downcast()?;
    println!("📋 Config: database_url={}, debug={}", config.database_url, config.debug);

    // Call a closure with one injected and one explicit argument.
    let lookup = |repo: Arc<UserRepository>, id: Arc<u64>| repo.find_user(*id);
    let results = container.invoke(&lookup, Args::new().inject("users").with("id", 7u64))?;
    println!("🔎 {:?}", results[0].downcast_ref::<String>());

    // Register a callable and invoke it by name.
    container.singleton("count", Function::new(|names: Arc<Vec<String>>| names.len()));
    container.singleton("names", container.names());
    let count = container.resolve("count").expect("count registered");
    let results = container.call_value(&count, &["names"], vec![Arg::Inject])?;
    println!("📦 {:?} registered", results[0].downcast_ref::<usize>());

    println!("{container:?}");
    Ok(())
}
