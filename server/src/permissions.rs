//! Role-based permission table and the checks the route guards run.

use crate::models::user::Role;

/// Permission requirement attached to a route.
#[derive(Debug, Clone, Copy)]
pub enum Require {
    /// The role must hold this one permission.
    Single(&'static str),
    /// The role must hold every listed permission.
    All(&'static [&'static str]),
    /// The role must hold at least one listed permission.
    Any(&'static [&'static str]),
}

const GUEST_PERMISSIONS: &[&str] = &[
    "games:list",
    "games:read",
    "games:keys:release",
    "games:keys:reserve",
    "events:list",
    "events:read",
    "users:read:by-client-id",
    "users:update:by-client-id",
    "users:create",
    "users:update",
    "users:read",
    "game-sessions:start",
    "game-sessions:stop",
    "game-sessions:read",
    "game-sessions:create",
    "game-sessions:update",
    "game-sessions:delete",
];

const USER_PERMISSIONS: &[&str] = &[
    "games:list",
    "games:read",
    "games:keys:release",
    "games:keys:reserve",
    "events:list",
    "events:read",
    "users:read:by-client-id",
    "users:update:by-client-id",
    "users:create",
    "users:authenticate",
    "game-sessions:start",
    "game-sessions:stop",
    "game-sessions:read",
    "game-sessions:create",
    "game-sessions:update",
    "game-sessions:delete",
];

const ADMIN_PERMISSIONS: &[&str] = &[
    "games:list",
    "games:create",
    "games:read",
    "games:update",
    "games:delete",
    "steam:list",
    "steam:read",
    "steam:create",
    "games:keys:list",
    "games:keys:create",
    "games:keys:delete",
    "games:keys:release",
    "games:keys:reserve",
    "events:list",
    "events:read",
    "events:create",
    "events:update",
    "events:delete",
    "users:list",
    "users:read",
    "users:delete",
    "users:create",
    "users:update",
    "users:read:by-client-id",
    "users:update:by-client-id",
    "users:authenticate",
    "game-sessions:start",
    "game-sessions:stop",
    "game-sessions:read",
    "game-sessions:create",
    "game-sessions:update",
    "game-sessions:delete",
    "settings:read",
    "settings:update",
    "settings:delete",
    "updates:sync",
];

/// Returns the permission strings granted to a role.
pub fn role_permissions(role: Role) -> &'static [&'static str] {
    match role {
        Role::Guest => GUEST_PERMISSIONS,
        Role::User => USER_PERMISSIONS,
        Role::Admin => ADMIN_PERMISSIONS,
    }
}

pub fn role_has(role: Role, permission: &str) -> bool {
    role_permissions(role).contains(&permission)
}

/// Evaluates a route requirement against a role.
pub fn check(role: Role, require: &Require) -> bool {
    match require {
        Require::Single(permission) => role_has(role, permission),
        Require::All(permissions) => permissions.iter().all(|p| role_has(role, p)),
        Require::Any(permissions) => permissions.iter().any(|p| role_has(role, p)),
    }
}

/// Names the permission to report when a requirement fails.
pub fn describe(require: &Require) -> String {
    match require {
        Require::Single(permission) => (*permission).to_string(),
        Require::All(permissions) => permissions.join(" + "),
        Require::Any(permissions) => permissions.join(" | "),
    }
}
