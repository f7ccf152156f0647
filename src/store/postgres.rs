use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::RbacStore;
use crate::db;
use crate::errors::{AppError, conflict_on_unique};
use crate::models::{NewRole, Permission, PermissionKey, Role, RolePermission, RoleUpdate};

pub struct PgRbacStore {
    pool: PgPool,
}

impl PgRbacStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = db::init_pool(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Grants for the given roles, keyed by role id, ordered by subject then action.
    async fn grants_for(&self, role_ids: &[i64]) -> Result<HashMap<i64, Vec<RolePermission>>, AppError> {
        #[derive(sqlx::FromRow)]
        struct GrantRow {
            role_id: i64,
            id: i64,
            action: String,
            subject: String,
            description: String,
        }

        let rows = sqlx::query_as::<_, GrantRow>(
            "SELECT rp.role_id, p.id, p.action, p.subject, p.description
             FROM role_permissions rp
             JOIN permissions p ON p.id = rp.permission_id
             WHERE rp.role_id = ANY($1)
             ORDER BY rp.role_id, p.subject, p.action, p.id",
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grants: HashMap<i64, Vec<RolePermission>> = HashMap::new();
        for row in rows {
            grants.entry(row.role_id).or_default().push(RolePermission::from(Permission {
                id: row.id,
                action: row.action,
                subject: row.subject,
                description: row.description,
            }));
        }
        Ok(grants)
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    description: String,
    is_system: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoleRow {
    fn into_role(self, permissions: Vec<RolePermission>) -> Role {
        Role {
            id: self.id,
            name: self.name,
            description: self.description,
            is_system: self.is_system,
            permissions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const ROLE_COLUMNS: &str = "id, name, description, is_system, created_at, updated_at";

#[async_trait]
impl RbacStore for PgRbacStore {
    async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        let permissions = sqlx::query_as::<_, Permission>(
            "SELECT id, action, subject, description FROM permissions ORDER BY subject, action, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(permissions)
    }

    async fn upsert_permission(
        &self,
        key: &PermissionKey,
        description: &str,
    ) -> Result<(Permission, bool), AppError> {
        let inserted = sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (action, subject, description) VALUES ($1, $2, $3)
             ON CONFLICT (action, subject) DO NOTHING
             RETURNING id, action, subject, description",
        )
        .bind(&key.action)
        .bind(&key.subject)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(permission) = inserted {
            return Ok((permission, true));
        }

        let existing = sqlx::query_as::<_, Permission>(
            "SELECT id, action, subject, description FROM permissions WHERE action = $1 AND subject = $2",
        )
        .bind(&key.action)
        .bind(&key.subject)
        .fetch_one(&self.pool)
        .await?;
        Ok((existing, false))
    }

    async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles ORDER BY is_system DESC, name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut grants = self.grants_for(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let permissions = grants.remove(&row.id).unwrap_or_default();
                row.into_role(permissions)
            })
            .collect())
    }

    async fn get_role(&self, id: i64) -> Result<Role, AppError> {
        let row = sqlx::query_as::<_, RoleRow>(&format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)?;
        let permissions = self.grants_for(&[id]).await?.remove(&id).unwrap_or_default();
        Ok(row.into_role(permissions))
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        let id = sqlx::query_as::<_, (i64,)>("SELECT id FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        match id {
            Some((id,)) => self.get_role(id).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create_role(&self, new_role: &NewRole, is_system: bool) -> Result<Role, AppError> {
        let mut tx = self.pool.begin().await?;

        let (role_id,) = sqlx::query_as::<_, (i64,)>(
            "INSERT INTO roles (name, description, is_system) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_role.name.trim())
        .bind(new_role.description.trim())
        .bind(is_system)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Role name"))?;

        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id)
             SELECT $1, unnest($2::BIGINT[]) ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(&new_role.permission_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.get_role(role_id).await
    }

    async fn update_role(&self, id: i64, update: &RoleUpdate) -> Result<Role, AppError> {
        let result = sqlx::query(
            "UPDATE roles SET name = $1, description = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(update.name.trim())
        .bind(update.description.trim())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Role name"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        self.get_role(id).await
    }

    async fn delete_role(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn set_role_permissions(&self, id: i64, permission_ids: &[i64]) -> Result<Role, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the role row so concurrent replacements apply one after the other.
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM roles WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound);
        }

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id)
             SELECT $1, unnest($2::BIGINT[]) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(permission_ids)
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE roles SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.get_role(id).await
    }

    async fn migrate(&self) -> Result<(), AppError> {
        db::run_migrations(&self.pool).await?;
        Ok(())
    }
}
