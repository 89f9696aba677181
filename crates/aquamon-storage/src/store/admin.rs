use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use serde::Serialize;

use crate::entities::admin::{self, Column, Entity};
use crate::error::{Result, StorageError};
use crate::store::Store;

/// An admin account row. `password_hash` is opaque and must never be
/// serialized into API responses; the HTTP layer maps this into a public
/// shape before returning it.
#[derive(Debug, Clone, Serialize)]
pub struct AdminRow {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn to_admin(m: admin::Model) -> AdminRow {
    AdminRow {
        id: m.id,
        email: m.email,
        password_hash: m.password_hash,
        role: m.role,
        active: m.active,
        created_at: m.created_at.with_timezone(&Utc),
    }
}

impl Store {
    /// Looks up an active admin by email. Deactivated accounts are invisible
    /// here, which is what locks them out of login.
    pub async fn get_active_admin_by_email(&self, email: &str) -> Result<Option<AdminRow>> {
        let model = Entity::find()
            .filter(Column::Email.eq(email))
            .filter(Column::Active.eq(true))
            .one(self.db())
            .await?;
        Ok(model.map(to_admin))
    }

    /// Lists all admin accounts, newest first.
    pub async fn list_admins(&self) -> Result<Vec<AdminRow>> {
        let models = Entity::find()
            .order_by_desc(Column::CreatedAt)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(to_admin).collect())
    }

    /// Inserts a new admin. A duplicate email surfaces as
    /// [`StorageError::Conflict`] via the table's unique constraint; there is
    /// no pre-check.
    pub async fn create_admin(
        &self,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<AdminRow> {
        let now = Utc::now().fixed_offset();
        let am = admin::ActiveModel {
            email: Set(email.to_owned()),
            password_hash: Set(password_hash.to_owned()),
            role: Set(role.to_owned()),
            active: Set(true),
            created_at: Set(now),
            ..Default::default()
        };
        let model = am
            .insert(self.db())
            .await
            .map_err(|e| StorageError::from_insert(e, "admin", email))?;
        Ok(to_admin(model))
    }

    /// Sets `active = false` for the given id, unconditionally. A nonexistent
    /// id updates zero rows and is not an error; deactivation is idempotent.
    pub async fn deactivate_admin(&self, id: i32) -> Result<()> {
        Entity::update_many()
            .col_expr(Column::Active, Expr::value(false))
            .filter(Column::Id.eq(id))
            .exec(self.db())
            .await?;
        Ok(())
    }

    pub async fn count_admins(&self) -> Result<u64> {
        let count = Entity::find().count(self.db()).await?;
        Ok(count)
    }
}
