pub mod bookings;
pub mod events;
pub mod tickets;
pub mod users;

use async_trait::async_trait;

use crate::db::{self, Db};
use crate::store::{Store, StoreError};

/// Postgres-backed [`Store`]. The entity-specific trait impls live in the
/// sibling modules; this type just owns the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: Db,
}

impl PgStore {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &Db {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        db::ping(&self.pool).await?;
        Ok(())
    }
}
