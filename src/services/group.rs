//! Group service
//!
//! Groups are owned by the user who created them. Owners and group admins
//! manage the member list; only the owner may delete the group.

use tracing::debug;

use crate::database::DatabaseService;
use crate::models::group::{
    AddMemberRequest, CreateGroupRequest, Group, GroupMember, GroupMemberDetails, GroupRole,
};
use crate::utils::errors::{CourtsideError, Result};
use crate::utils::helpers::normalize_email;
use crate::utils::logging::log_group_event;

#[derive(Clone)]
pub struct GroupService {
    db: DatabaseService,
}

impl GroupService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    pub async fn create_group(&self, owner_id: i64, request: CreateGroupRequest) -> Result<Group> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(CourtsideError::InvalidInput("Group name is required".to_string()));
        }

        let request = CreateGroupRequest {
            name,
            description: request.description.filter(|d| !d.trim().is_empty()),
        };
        let group = self.db.groups.create(owner_id, request).await?;
        log_group_event(group.id, "created", Some(owner_id), Some(&group.name));

        Ok(group)
    }

    /// Groups the user belongs to
    pub async fn groups_for_user(&self, user_id: i64) -> Result<Vec<Group>> {
        self.db.groups.list_for_user(user_id).await
    }

    /// Member list, visible to members of the group
    pub async fn members(&self, user_id: i64, group_id: i64) -> Result<Vec<GroupMemberDetails>> {
        self.group(group_id).await?;
        if self.db.groups.membership(group_id, user_id).await?.is_none() {
            return Err(CourtsideError::PermissionDenied(
                "You are not a member of this group".to_string(),
            ));
        }

        self.db.groups.members(group_id).await
    }

    /// Add the user registered under the request's email
    pub async fn add_member(&self, user_id: i64, group_id: i64, request: AddMemberRequest) -> Result<GroupMember> {
        self.group(group_id).await?;
        self.require_manager(group_id, user_id).await?;

        let role = request.role.unwrap_or(GroupRole::Member);
        if role == GroupRole::Owner {
            return Err(CourtsideError::InvalidInput(
                "A group has exactly one owner".to_string(),
            ));
        }

        let email = normalize_email(&request.email);
        let member = self
            .db
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| CourtsideError::not_found("User", &email))?;

        debug!(group_id = group_id, member_id = member.id, role = role.as_str(), "Adding group member");
        let membership = self.db.groups.add_member(group_id, member.id, role).await?;
        log_group_event(group_id, "member_added", Some(member.id), Some(role.as_str()));

        Ok(membership)
    }

    pub async fn remove_member(&self, user_id: i64, group_id: i64, member_id: i64) -> Result<()> {
        let group = self.group(group_id).await?;
        self.require_manager(group_id, user_id).await?;

        if member_id == group.owner_id {
            return Err(CourtsideError::InvalidInput(
                "The group owner cannot be removed".to_string(),
            ));
        }
        if !self.db.groups.remove_member(group_id, member_id).await? {
            return Err(CourtsideError::not_found("GroupMember", member_id));
        }

        log_group_event(group_id, "member_removed", Some(member_id), None);
        Ok(())
    }

    /// Delete the group and all memberships; owner only
    pub async fn delete_group(&self, user_id: i64, group_id: i64) -> Result<()> {
        let group = self.group(group_id).await?;
        if group.owner_id != user_id {
            return Err(CourtsideError::PermissionDenied(
                "Only the owner can delete this group".to_string(),
            ));
        }

        self.db.groups.delete(group_id).await?;
        log_group_event(group_id, "deleted", Some(user_id), None);
        Ok(())
    }

    async fn group(&self, group_id: i64) -> Result<Group> {
        self.db
            .groups
            .find(group_id)
            .await?
            .ok_or_else(|| CourtsideError::not_found("Group", group_id))
    }

    async fn require_manager(&self, group_id: i64, user_id: i64) -> Result<()> {
        match self.db.groups.membership(group_id, user_id).await? {
            Some(member) if member.role.can_manage_members() => Ok(()),
            _ => Err(CourtsideError::PermissionDenied(
                "Only group owners and admins can manage members".to_string(),
            )),
        }
    }
}
