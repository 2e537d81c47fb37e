// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles carried in session tokens.
///
/// ## Role Hierarchy
///
/// - `Admin` - Full access, including deleting accounts
/// - `Moderator` - Can browse the user grid
/// - `User` - Regular account, owns its chats
///
/// The derived ordering (`Admin < Moderator < User`) only fixes the order of
/// role sets in claims; it is not the privilege order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Read access to the user grid
    Moderator,
    /// Regular account
    User,
}

impl Role {
    /// Privilege rank, higher is stronger.
    fn rank(self) -> u8 {
        match self {
            Role::Admin => 2,
            Role::Moderator => 1,
            Role::User => 0,
        }
    }

    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Parse role from string (case-insensitive).
    /// Used when extracting roles from a decoded token payload.
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "moderator" => Some(Role::Moderator),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }
}

impl Default for Role {
    /// Default role is User (least privilege for registered accounts).
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all_privileges() {
        assert!(Role::Admin.has_privilege(Role::Admin));
        assert!(Role::Admin.has_privilege(Role::Moderator));
        assert!(Role::Admin.has_privilege(Role::User));
    }

    #[test]
    fn moderator_sits_between_admin_and_user() {
        assert!(!Role::Moderator.has_privilege(Role::Admin));
        assert!(Role::Moderator.has_privilege(Role::Moderator));
        assert!(Role::Moderator.has_privilege(Role::User));
    }

    #[test]
    fn user_only_has_user_privilege() {
        assert!(!Role::User.has_privilege(Role::Admin));
        assert!(!Role::User.has_privilege(Role::Moderator));
        assert!(Role::User.has_privilege(Role::User));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("Moderator"), Some(Role::Moderator));
        assert_eq!(Role::parse(" user "), Some(Role::User));
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(Role::Moderator.to_string(), "moderator");
        assert_eq!(
            serde_json::to_string(&Role::Admin).unwrap(),
            r#""admin""#
        );
    }

    #[test]
    fn default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }
}
