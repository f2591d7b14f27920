//! # Dashboards
//!
//! What a logged-in user sees first depends on their role: admins get shop
//! and host figures, managers get sales counts, customers get their own
//! account summary.

use serde::Serialize;

use crate::access::{require, Capability, Role};
use crate::accounts::User;
use crate::calculations::Metal;
use crate::errors::BillResult;
use crate::health::SystemHealth;
use crate::ledger::Ledger;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Admin {
        total_users: usize,
        system: SystemHealth,
    },
    Manager {
        gold_transactions: usize,
        silver_transactions: usize,
    },
    Customer {
        full_name: String,
        username: String,
        email: String,
    },
}

/// Build the dashboard for `user`. `sample_system` is only called once the
/// user is cleared to see host figures, so callers can pass
/// [`SystemHealth::sample`] without paying for it on other roles.
pub fn dashboard_for<F>(ledger: &Ledger, user: &User, sample_system: F) -> BillResult<Dashboard>
where
    F: FnOnce() -> SystemHealth,
{
    let dashboard = match user.role {
        Role::Admin => {
            require(user, Capability::ViewSystemHealth)?;
            Dashboard::Admin {
                total_users: ledger.user_count(),
                system: sample_system(),
            }
        }
        Role::Manager => Dashboard::Manager {
            gold_transactions: ledger.transaction_count(Metal::Gold),
            silver_transactions: ledger.transaction_count(Metal::Silver),
        },
        Role::Customer => Dashboard::Customer {
            full_name: user.full_name(),
            username: user.username.clone(),
            email: user.email.clone(),
        },
    };
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::Registration;

    fn registration(username: &str) -> Registration {
        Registration {
            first_name: "Dash".to_string(),
            last_name: "Board".to_string(),
            username: username.to_string(),
            email: format!("{username}@shop.test"),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn test_admin_dashboard() {
        let mut ledger = Ledger::new("Shop");
        let admin = ledger.register(&registration("owner")).unwrap();
        ledger.register(&registration("buyer")).unwrap();

        match dashboard_for(&ledger, &admin, || SystemHealth::from_readings(4, 12.0)).unwrap() {
            Dashboard::Admin { total_users, system } => {
                assert_eq!(total_users, 2);
                assert_eq!(system.cpu_cores, 4);
            }
            other => panic!("unexpected dashboard: {other:?}"),
        }
    }

    #[test]
    fn test_customer_dashboard_skips_sampling() {
        let mut ledger = Ledger::new("Shop");
        ledger.register(&registration("owner")).unwrap();
        let buyer = ledger.register(&registration("buyer")).unwrap();

        let dash = dashboard_for(&ledger, &buyer, || panic!("customers must not sample the host")).unwrap();
        match dash {
            Dashboard::Customer { full_name, .. } => assert_eq!(full_name, "Dash Board"),
            other => panic!("unexpected dashboard: {other:?}"),
        }
    }

    #[test]
    fn test_manager_dashboard_json() {
        let mut ledger = Ledger::new("Shop");
        let admin = ledger.register(&registration("owner")).unwrap();
        let buyer = ledger.register(&registration("buyer")).unwrap();
        let manager = ledger.set_role(&admin, buyer.id, Role::Manager).unwrap();

        let json = serde_json::to_string(&dashboard_for(&ledger, &manager, || {
            SystemHealth::from_readings(1, 0.0)
        })
        .unwrap())
        .unwrap();
        assert!(json.contains("\"role\":\"manager\""));
        assert!(json.contains("\"gold_transactions\":0"));
    }
}
