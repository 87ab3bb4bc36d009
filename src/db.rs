use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations};

use crate::error::StoreError;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// SQLite leaves foreign key enforcement off per connection; every pooled
/// connection gets it switched on before use.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSetup;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionSetup {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn build_pool(database_url: &str, max_size: u32) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionSetup))
        .build(manager)
}

/// Helper function to get a pooled DB connection
pub fn get_conn(pool: &DbPool) -> Result<DbConn, StoreError> {
    pool.get().map_err(|_| StoreError::Pool)
}

#[cfg(test)]
pub(crate) fn test_conn() -> SqliteConnection {
    use diesel::Connection;
    use diesel_migrations::MigrationHarness;

    let mut conn = SqliteConnection::establish(":memory:").expect("in-memory database");
    conn.batch_execute("PRAGMA foreign_keys = ON;")
        .expect("foreign keys pragma");
    conn.run_pending_migrations(MIGRATIONS).expect("migrations");
    conn
}
