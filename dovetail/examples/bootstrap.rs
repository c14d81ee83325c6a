//! Bootstrapping an application with Dovetail.
//!
//! Run with `RUST_LOG=dovetail_container=trace` to watch resolution.

use std::sync::Arc;

use dovetail::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

// === Configuration and services ===

#[derive(Debug, Clone)]
struct DbConfig {
    url: String,
    pool_size: u32,
}

trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("[LOG] {message}");
    }
}

#[derive(Injectable)]
struct Database {
    config: DbConfig,
    #[inject(id = "Logger")]
    logger: Arc<dyn Logger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("rows from {} (pool of {})", self.config.url, self.config.pool_size)
    }
}

#[derive(Injectable)]
struct UserRepository {
    database: Database,
}

#[derive(Injectable)]
#[injectable(id = "users")]
struct UserService {
    repository: UserRepository,
}

impl UserService {
    fn find(&self, id: u64) -> String {
        self.repository
            .database
            .query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

// === Provider ===

struct InfrastructureProvider {
    config: DbConfig,
}

impl Provider for InfrastructureProvider {
    fn register(&self, registry: &dyn ProviderRegistry) -> Result<()> {
        let config = self.config.clone();
        registry.register_factory("DbConfig".into(), factory(move |_| Ok(config.clone())))?;
        registry.register_descriptor(TypeDescriptor::interface("Logger"));
        registry.register_factory(
            "Logger".into(),
            factory(|_| Ok(Arc::new(ConsoleLogger) as Arc<dyn Logger>)),
        )
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings: ContainerSettings = serde_json::from_str(r#"{ "allow_override": false }"#)?;

    let container = Container::builder()
        .settings(settings)
        .add_provider(InfrastructureProvider {
            config: DbConfig {
                url: "postgres://localhost/app".to_owned(),
                pool_size: 8,
            },
        })
        .build()?;

    container.validate("users")?;

    let service: UserService = container.resolve()?;
    info!(result = %service.find(42), "Resolved user service");

    // Interfaces need a binding; asking for a misspelled one shows suggestions.
    if let Err(err) = container.get("Loger") {
        println!("{err}");
    }

    Ok(())
}
