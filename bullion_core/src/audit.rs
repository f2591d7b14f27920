//! # Audit Log
//!
//! Append-only record of who did what: logins, role changes, settings
//! changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::access::{require, Capability};
use crate::accounts::User;
use crate::errors::BillResult;
use crate::ledger::Ledger;

/// One audited action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: u64,
    pub user_id: u64,
    pub username: String,
    /// Short action name (e.g., "Login", "System Settings Change")
    pub action: String,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Ledger {
    /// Append an audit entry.
    pub fn log_action(
        &mut self,
        user_id: u64,
        username: &str,
        action: impl Into<String>,
        details: Option<String>,
    ) -> &AuditEntry {
        let entry = AuditEntry {
            id: self.counters.next_audit(),
            user_id,
            username: username.to_string(),
            action: action.into(),
            details,
            timestamp: Utc::now(),
        };
        debug!(id = entry.id, user = %entry.username, action = %entry.action, "audit entry");
        self.audit.push(entry);
        self.touch();
        &self.audit[self.audit.len() - 1]
    }

    /// Audit entries, newest first. Admin only.
    pub fn audit_log(&self, actor: &User) -> BillResult<Vec<&AuditEntry>> {
        require(actor, Capability::ViewAuditLog)?;
        let mut entries: Vec<&AuditEntry> = self.audit.iter().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(entries)
    }
}
