//! # Roles and Capabilities
//!
//! Every account carries one of three fixed roles. Views that expose shop
//! data ask for a [`Capability`]; [`require`] checks the acting user's role
//! against it. The calculators are open to everyone and never consult this
//! module.

use serde::{Deserialize, Serialize};

use crate::accounts::User;
use crate::errors::{BillError, BillResult};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::Manager, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Parse from "customer", "manager" or "admin" (any case)
    pub fn parse(s: &str) -> BillResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            _ => Err(BillError::invalid_input(
                "user_level",
                s,
                "Role must be one of customer, manager, admin",
            )),
        }
    }

    /// Whether this role grants the capability.
    pub fn allows(&self, capability: Capability) -> bool {
        match (self, capability) {
            (Role::Admin, _) => true,
            (Role::Manager | Role::Customer, _) => false,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gated operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    ViewHistory,
    ExportCsv,
    ManageUsers,
    ChangeSettings,
    ViewAuditLog,
    ViewSystemHealth,
}

impl Capability {
    pub fn describe(&self) -> &'static str {
        match self {
            Capability::ViewHistory => "view transaction history",
            Capability::ExportCsv => "export transactions",
            Capability::ManageUsers => "manage users",
            Capability::ChangeSettings => "change settings",
            Capability::ViewAuditLog => "view the audit log",
            Capability::ViewSystemHealth => "view system health",
        }
    }
}

/// Fail with `PermissionDenied` unless `user`'s role grants `capability`.
pub fn require(user: &User, capability: Capability) -> BillResult<()> {
    if user.role.allows(capability) {
        Ok(())
    } else {
        tracing::warn!(
            user = %user.username,
            role = %user.role,
            capability = capability.describe(),
            "permission denied"
        );
        Err(BillError::PermissionDenied {
            username: user.username.clone(),
            role: user.role.to_string(),
            capability: capability.describe().to_string(),
        })
    }
}
