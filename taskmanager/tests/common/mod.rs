use sea_orm::DatabaseConnection;
use taskmanager::config::Config;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};

/// Every connection to `sqlite::memory:` opens its own database, so the pool
/// is pinned to a single connection for the lifetime of the test.
#[allow(dead_code)]
pub fn memory_config() -> Config {
    Config {
        db_url: "sqlite::memory:".to_string(),
        pool_size: 1,
        ..Config::default()
    }
}

fn init_tracing() {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[allow(dead_code)]
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    init_tracing();
    let db = taskmanager::db::connect(&memory_config()).await?;
    Ok(db)
}

#[allow(dead_code)]
pub async fn setup_container() -> anyhow::Result<testcontainers::ContainerAsync<postgres::Postgres>>
{
    let container = postgres::Postgres::default().start().await?;
    Ok(container)
}

#[allow(dead_code)]
pub async fn setup_postgres_db(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<DatabaseConnection> {
    init_tracing();
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let config = Config {
        db_url: format!("postgres://postgres:postgres@{}:{}/postgres", host, port),
        pool_size: 2,
        ..Config::default()
    };
    let db = taskmanager::db::connect(&config).await?;
    Ok(db)
}
