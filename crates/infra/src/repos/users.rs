use async_trait::async_trait;
use uuid::Uuid;

use crate::models::UserRow;
use crate::pagination::LimitOffset;
use crate::repos::PgStore;
use crate::store::{NewUser, StoreError, UserStore};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, new: NewUser) -> Result<UserRow, StoreError> {
        let result = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new.name)
        .bind(new.email.clone())
        .bind(new.password_hash)
        .bind(new.role)
        .fetch_one(self.pool())
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                StoreError::Conflict(format!("email {} already registered", new.email)),
            ),
            Err(err) => Err(err.into()),
        }
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn list_users(&self, page: LimitOffset) -> Result<Vec<UserRow>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
