use core::fmt;
use std::{collections::BTreeSet, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::bot::{commands::CommandDescriptor, invocation::invocation::Invocation};

pub const PERMISSION_PLACEHOLDER: &str = "$PERMISSION$";

#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// No restriction.
    #[default]
    None,
    Administrator,
    ManageServer,
    ManageRoles,
    ManageChannels,
    ManageMessages,
    ManageNicknames,
    KickMembers,
    BanMembers,
    ModerateMembers,
    MentionEveryone,
    ViewAuditLog,
    SendMessages,
    ViewChannel,
}

impl Permission {
    pub const ALL: [Permission; 13] = [
        Permission::Administrator,
        Permission::ManageServer,
        Permission::ManageRoles,
        Permission::ManageChannels,
        Permission::ManageMessages,
        Permission::ManageNicknames,
        Permission::KickMembers,
        Permission::BanMembers,
        Permission::ModerateMembers,
        Permission::MentionEveryone,
        Permission::ViewAuditLog,
        Permission::SendMessages,
        Permission::ViewChannel,
    ];

    pub fn is_unrestricted(self) -> bool {
        self == Permission::None
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Permission::None => "None",
            Permission::Administrator => "Administrator",
            Permission::ManageServer => "Manage Server",
            Permission::ManageRoles => "Manage Roles",
            Permission::ManageChannels => "Manage Channels",
            Permission::ManageMessages => "Manage Messages",
            Permission::ManageNicknames => "Manage Nicknames",
            Permission::KickMembers => "Kick Members",
            Permission::BanMembers => "Ban Members",
            Permission::ModerateMembers => "Timeout Members",
            Permission::MentionEveryone => "Mention Everyone",
            Permission::ViewAuditLog => "View Audit Log",
            Permission::SendMessages => "Send Messages",
            Permission::ViewChannel => "View Channel",
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Permissions held by a member inside a scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, permission: Permission) {
        if !permission.is_unrestricted() {
            self.0.insert(permission);
        }
    }

    pub fn with(mut self, permission: Permission) -> Self {
        self.insert(permission);
        self
    }

    /// Administrator implies every other permission.
    pub fn contains(&self, permission: Permission) -> bool {
        permission.is_unrestricted()
            || self.0.contains(&permission)
            || self.0.contains(&Permission::Administrator)
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = PermissionSet::new();
        for permission in iter {
            set.insert(permission);
        }
        set
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    /// The principal lacks the permission; carries the rendered denial message.
    Denied(String),
    /// The context cannot be evaluated at all.
    Malformed(String),
}

impl Authorization {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Authorization::Allowed)
    }
}

pub fn render_denial(template: &str, permission: Permission) -> String {
    template.replace(PERMISSION_PLACEHOLDER, &format!("`{}`", permission.display_name()))
}

pub fn authorize(invocation: &Invocation, descriptor: &CommandDescriptor) -> Authorization {
    let required = descriptor.permission;

    if !invocation.is_scoped() && required.is_unrestricted() {
        return Authorization::Allowed;
    }

    if invocation.is_scoped() && invocation.member.is_none() {
        return Authorization::Malformed(format!(
            "scoped invocation of /{} carries no member",
            invocation.command
        ));
    }

    // Outside a scope nobody holds permissions, so only unrestricted commands pass.
    let granted = required.is_unrestricted()
        || invocation
            .member
            .as_ref()
            .is_some_and(|member| member.permissions.contains(required));

    if granted {
        Authorization::Allowed
    } else {
        Authorization::Denied(render_denial(&descriptor.permission_message, required))
    }
}
