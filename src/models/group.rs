//! Group model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role of a user inside one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupRole {
    Owner,
    Admin,
    Member,
}

#[derive(Debug, Error)]
#[error("unknown group role: {0}")]
pub struct ParseGroupRoleError(String);

impl GroupRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRole::Owner => "Owner",
            GroupRole::Admin => "Admin",
            GroupRole::Member => "Member",
        }
    }

    /// Owners and admins manage the member list
    pub fn can_manage_members(&self) -> bool {
        matches!(self, GroupRole::Owner | GroupRole::Admin)
    }
}

impl std::str::FromStr for GroupRole {
    type Err = ParseGroupRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Owner" => Ok(GroupRole::Owner),
            "Admin" => Ok(GroupRole::Admin),
            "Member" => Ok(GroupRole::Member),
            other => Err(ParseGroupRoleError(other.to_string())),
        }
    }
}

impl TryFrom<String> for GroupRole {
    type Error = ParseGroupRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    #[sqlx(try_from = "String")]
    pub role: GroupRole,
    pub joined_at: DateTime<Utc>,
}

/// Membership row joined with the member's public profile
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberDetails {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: GroupRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    /// Member to add, by email
    pub email: String,
    pub role: Option<GroupRole>,
}
