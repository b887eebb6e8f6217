//! Group repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::store::GroupStore;
use crate::models::group::{CreateGroupRequest, Group, GroupMember, GroupMemberDetails, GroupRole};
use crate::utils::errors::{is_unique_violation, CourtsideError, Result};

const GROUP_COLUMNS: &str = "id, name, description, owner_id, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupStore for GroupRepository {
    async fn create(&self, owner_id: i64, request: CreateGroupRequest) -> Result<Group> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, Group>(&format!(
            r#"
            INSERT INTO groups (name, description, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {}
            "#,
            GROUP_COLUMNS
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(owner_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO group_members (group_id, user_id, role, joined_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(group.id)
        .bind(owner_id)
        .bind(GroupRole::Owner.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(group)
    }

    async fn find(&self, id: i64) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(&format!(
            "SELECT {} FROM groups WHERE id = $1",
            GROUP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT g.id, g.name, g.description, g.owner_id, g.created_at, g.updated_at
            FROM groups g
            INNER JOIN group_members gm ON gm.group_id = g.id
            WHERE gm.user_id = $1
            ORDER BY g.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    async fn membership(&self, group_id: i64, user_id: i64) -> Result<Option<GroupMember>> {
        let member = sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT id, group_id, user_id, role, joined_at
            FROM group_members
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    async fn members(&self, group_id: i64) -> Result<Vec<GroupMemberDetails>> {
        let members = sqlx::query_as::<_, GroupMemberDetails>(
            r#"
            SELECT u.id AS user_id, u.name, u.email, u.avatar_url, gm.role, gm.joined_at
            FROM group_members gm
            INNER JOIN users u ON u.id = gm.user_id
            WHERE gm.group_id = $1
            ORDER BY gm.joined_at ASC, gm.id ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn add_member(&self, group_id: i64, user_id: i64, role: GroupRole) -> Result<GroupMember> {
        let member = sqlx::query_as::<_, GroupMember>(
            r#"
            INSERT INTO group_members (group_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, group_id, user_id, role, joined_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                CourtsideError::Conflict(format!("User {} is already a member of this group", user_id))
            } else {
                e.into()
            }
        })?;

        Ok(member)
    }

    async fn remove_member(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        // group_members rows go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
