use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, SqlxSqliteConnector, Statement};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Current time as stored in every timestamp column. Fixed width so that
/// text ordering matches time ordering.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    // Cascading deletes rely on SQLite foreign key enforcement, which is a
    // per-connection setting
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| DbErr::Custom(format!("Invalid database URL: {}", e)))?
        .foreign_keys(true);

    // A single long-lived connection: an in-memory database lives only as
    // long as its connection
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|e| DbErr::Custom(format!("Failed to open database: {}", e)))?;
    let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    tracing::debug!("Database ready at {}", database_url);
    Ok(db)
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        sql.to_owned(),
    ))
    .await?;
    Ok(())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Users: credentials are argon2 hashes, which one is set depends on auth_method
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT,
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            auth_method TEXT NOT NULL DEFAULT 'password',
            password_hash TEXT,
            pin_hash TEXT,
            phone_number TEXT,
            notification_enabled BOOLEAN NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            token_id TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS sensors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            sensor_type TEXT NOT NULL,
            location TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'ACTIVE',
            handler_class TEXT,
            connection_config TEXT NOT NULL DEFAULT '{}',
            metadata TEXT NOT NULL DEFAULT '{}',
            owner_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (owner_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS sensor_readings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sensor_id INTEGER NOT NULL,
            timestamp TEXT NOT NULL,
            value TEXT NOT NULL,
            reading_type TEXT,
            processed BOOLEAN NOT NULL DEFAULT 0,
            FOREIGN KEY (sensor_id) REFERENCES sensors(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS alerts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            alert_type TEXT NOT NULL,
            severity TEXT NOT NULL,
            sensor_id INTEGER,
            user_id INTEGER NOT NULL,
            timestamp TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            acknowledged BOOLEAN NOT NULL DEFAULT 0,
            acknowledged_at TEXT,
            acknowledged_by INTEGER,
            metadata TEXT NOT NULL DEFAULT '{}',
            FOREIGN KEY (sensor_id) REFERENCES sensors(id) ON DELETE CASCADE,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (acknowledged_by) REFERENCES users(id) ON DELETE SET NULL
        )
        "#,
    )
    .await?;

    // Indexes for the common listing orders
    for sql in [
        "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_sensors_owner ON sensors(owner_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_readings_sensor_time ON sensor_readings(sensor_id, timestamp)",
        "CREATE INDEX IF NOT EXISTS idx_readings_processed ON sensor_readings(processed)",
        "CREATE INDEX IF NOT EXISTS idx_alerts_user_time ON alerts(user_id, timestamp)",
        "CREATE INDEX IF NOT EXISTS idx_alerts_severity_time ON alerts(severity, timestamp)",
        "CREATE INDEX IF NOT EXISTS idx_alerts_acknowledged ON alerts(acknowledged)",
    ] {
        execute(db, sql).await?;
    }

    Ok(())
}
