//! Friends and groups: who a user's schedule is compared against.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::interval::{GroupId, UserId};
use crate::notify::{emit, Notification, NotificationKind, SharedSink};

/// Which set of users the grid compares the owner against.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum ComparisonContext {
    /// All confirmed friends.
    #[default]
    Friends,
    /// All members of one group.
    Group(GroupId),
}

/// Resolves a [`ComparisonContext`] into concrete member ids.
pub trait ComparisonSetResolver {
    /// Member ids for `user` in `context`. Never includes `user` itself.
    fn resolve_comparison_set(
        &self,
        user: &UserId,
        context: &ComparisonContext,
    ) -> Result<Vec<UserId>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Pending,
    Confirmed,
}

/// A directed friend request; confirmed friendships count both ways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friendship {
    pub from: UserId,
    pub to: UserId,
    pub status: FriendStatus,
}

impl Friendship {
    fn involves(&self, a: &UserId, b: &UserId) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }

    fn other(&self, user: &UserId) -> Option<&UserId> {
        if &self.from == user {
            Some(&self.to)
        } else if &self.to == user {
            Some(&self.from)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: UserId,
    pub role: MemberRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub members: Vec<GroupMember>,
}

/// Users, friendships, and groups.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub friendships: Vec<Friendship>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(skip)]
    sink: SharedSink,
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field("users", &self.users)
            .field("friendships", &self.friendships)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notifications(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn set_notifications(&mut self, sink: SharedSink) {
        self.sink = sink;
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }

    fn require_user(&self, id: &UserId) -> Result<()> {
        match self.user(id) {
            Some(_) => Ok(()),
            None => Err(GridError::UnknownUser(id.clone())),
        }
    }

    /// Register a user, replacing any existing record with the same id.
    pub fn add_user(&mut self, user: User) {
        self.users.retain(|u| u.id != user.id);
        self.users.push(user);
    }

    /// Case-insensitive search by name or email, excluding `requester`.
    pub fn search_users(&self, requester: &UserId, query: &str) -> Vec<&User> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.users
            .iter()
            .filter(|u| &u.id != requester)
            .filter(|u| {
                u.name.to_lowercase().contains(&query) || u.email.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Ask `to` to become `from`'s friend.
    ///
    /// A request to someone already linked (pending or confirmed) is a no-op.
    pub fn send_friend_request(&mut self, from: &UserId, to: &UserId) -> Result<()> {
        self.require_user(from)?;
        self.require_user(to)?;
        if from == to || self.friendships.iter().any(|f| f.involves(from, to)) {
            return Ok(());
        }
        self.friendships.push(Friendship {
            from: from.clone(),
            to: to.clone(),
            status: FriendStatus::Pending,
        });
        tracing::info!(%from, %to, "friend request sent");
        let name = self.user(from).map(|u| u.name.clone()).unwrap_or_default();
        emit(
            &self.sink,
            Notification::new(
                NotificationKind::FriendRequest,
                format!("{} sent you a friend request", name),
            ),
        );
        Ok(())
    }

    /// Confirm a pending request that `requester` sent to `user`.
    pub fn accept_friend_request(&mut self, user: &UserId, requester: &UserId) -> Result<()> {
        let request = self
            .friendships
            .iter_mut()
            .find(|f| &f.from == requester && &f.to == user && f.status == FriendStatus::Pending)
            .ok_or_else(|| GridError::NoPendingRequest {
                from: requester.clone(),
                to: user.clone(),
            })?;
        request.status = FriendStatus::Confirmed;
        tracing::info!(%user, %requester, "friend request accepted");
        Ok(())
    }

    /// Remove a friendship or pending request in either direction.
    pub fn remove_friend(&mut self, user: &UserId, friend: &UserId) -> bool {
        let before = self.friendships.len();
        self.friendships.retain(|f| !f.involves(user, friend));
        before != self.friendships.len()
    }

    /// Confirmed friends of `user`.
    pub fn friends(&self, user: &UserId) -> Vec<&UserId> {
        self.friendships
            .iter()
            .filter(|f| f.status == FriendStatus::Confirmed)
            .filter_map(|f| f.other(user))
            .collect()
    }

    /// Requests waiting for `user` to accept.
    pub fn pending_requests(&self, user: &UserId) -> Vec<&UserId> {
        self.friendships
            .iter()
            .filter(|f| f.status == FriendStatus::Pending && &f.to == user)
            .map(|f| &f.from)
            .collect()
    }

    /// Create a group with `creator` as admin and `members` as regular members.
    pub fn create_group(
        &mut self,
        id: GroupId,
        name: impl Into<String>,
        creator: &UserId,
        members: &[UserId],
    ) -> Result<&Group> {
        self.require_user(creator)?;
        for member in members {
            self.require_user(member)?;
        }
        let mut group = Group {
            id: id.clone(),
            name: name.into(),
            members: vec![GroupMember {
                id: creator.clone(),
                role: MemberRole::Admin,
            }],
        };
        push_members(&mut group, members);

        tracing::info!(group = %id, members = group.members.len(), "group created");
        emit(
            &self.sink,
            Notification::new(
                NotificationKind::GroupUpdate,
                format!("You were added to group \"{}\"", group.name),
            ),
        );

        self.groups.retain(|g| g.id != id);
        self.groups.push(group);
        self.group(&id).ok_or(GridError::UnknownGroup(id))
    }

    /// Replace a group's regular members. Admins are kept.
    pub fn set_group_members(&mut self, id: &GroupId, members: &[UserId]) -> Result<()> {
        for member in members {
            self.require_user(member)?;
        }
        let group = self
            .groups
            .iter_mut()
            .find(|g| &g.id == id)
            .ok_or_else(|| GridError::UnknownGroup(id.clone()))?;
        group.members.retain(|m| m.role == MemberRole::Admin);
        push_members(group, members);

        tracing::info!(group = %id, members = group.members.len(), "group members updated");
        emit(
            &self.sink,
            Notification::new(
                NotificationKind::GroupUpdate,
                format!("Group \"{}\" has been updated", group.name),
            ),
        );
        Ok(())
    }

    pub fn delete_group(&mut self, id: &GroupId) -> Result<()> {
        let before = self.groups.len();
        self.groups.retain(|g| &g.id != id);
        if before == self.groups.len() {
            return Err(GridError::UnknownGroup(id.clone()));
        }
        tracing::info!(group = %id, "group deleted");
        Ok(())
    }
}

fn push_members(group: &mut Group, members: &[UserId]) {
    for member in members {
        if !group.members.iter().any(|m| &m.id == member) {
            group.members.push(GroupMember {
                id: member.clone(),
                role: MemberRole::Member,
            });
        }
    }
}

impl ComparisonSetResolver for Directory {
    fn resolve_comparison_set(
        &self,
        user: &UserId,
        context: &ComparisonContext,
    ) -> Result<Vec<UserId>> {
        let candidates: Vec<&UserId> = match context {
            ComparisonContext::Friends => self.friends(user),
            ComparisonContext::Group(id) => self
                .group(id)
                .ok_or_else(|| GridError::UnknownGroup(id.clone()))?
                .members
                .iter()
                .map(|m| &m.id)
                .collect(),
        };

        let mut seen = BTreeSet::new();
        Ok(candidates
            .into_iter()
            .filter(|id| *id != user && seen.insert(*id))
            .cloned()
            .collect())
    }
}
