use crate::config::Config;
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Opens the connection pool described by `config`.
///
/// Pending migrations are applied before the pool is handed out unless
/// `run_migrations` is turned off.
#[tracing::instrument(skip(config))]
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.db_url.clone());
    options
        .max_connections(config.pool_size)
        .connect_timeout(config.connect_timeout())
        .acquire_timeout(config.connect_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime());

    let db = Database::connect(options).await?;
    tracing::info!("Connected to database (pool size {})", config.pool_size);

    if config.run_migrations {
        migration::Migrator::up(&db, None).await?;
        tracing::info!("Database migrations applied");
    }
    Ok(db)
}
