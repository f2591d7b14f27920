//! # Accounts
//!
//! Registration, login and role changes for shop users. Passwords are only
//! ever stored as Argon2 hashes (see [`crate::password`]).
//!
//! The first account registered while the ledger has no admin becomes the
//! admin; every later registration starts as a customer.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::access::{require, Capability, Role};
use crate::errors::{BillError, BillResult};
use crate::ledger::Ledger;
use crate::password::{hash_password, verify_password};

const NAME_MAX_LEN: usize = 20;
const USERNAME_MAX_LEN: usize = 20;
const EMAIL_MAX_LEN: usize = 120;

/// A shop account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields submitted on the registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Validate input parameters.
    pub fn validate(&self) -> BillResult<()> {
        required_text("first_name", &self.first_name, NAME_MAX_LEN)?;
        required_text("last_name", &self.last_name, NAME_MAX_LEN)?;
        required_text("username", &self.username, USERNAME_MAX_LEN)?;
        required_text("email", &self.email, EMAIL_MAX_LEN)?;
        if !self.email.contains('@') {
            return Err(BillError::invalid_input("email", &self.email, "Email address must contain '@'"));
        }
        if self.password.is_empty() {
            return Err(BillError::missing_field("password"));
        }
        Ok(())
    }
}

fn required_text(field: &str, value: &str, max_len: usize) -> BillResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BillError::missing_field(field));
    }
    if trimmed.chars().count() > max_len {
        return Err(BillError::invalid_input(
            field,
            value,
            format!("Must be at most {} characters", max_len),
        ));
    }
    Ok(())
}

impl Ledger {
    /// Create an account.
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The stored account
    /// * `Err(BillError::MissingField | InvalidInput)` - Bad form data
    /// * `Err(BillError::Duplicate)` - Username or email already registered
    pub fn register(&mut self, form: &Registration) -> BillResult<User> {
        form.validate()?;

        let username = form.username.trim().to_string();
        let email = form.email.trim().to_string();

        if self.find_user_by_username(&username).is_some() {
            return Err(BillError::duplicate("username", username));
        }
        if self.find_user_by_email(&email).is_some() {
            return Err(BillError::duplicate("email", email));
        }

        let role = if self.users.iter().any(|u| u.role == Role::Admin) {
            Role::Customer
        } else {
            Role::Admin
        };

        let user = User {
            id: self.counters.next_user(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            username,
            email,
            password_hash: hash_password(&form.password)?,
            role,
        };

        info!(id = user.id, username = %user.username, role = %user.role, "registered user");
        self.users.push(user.clone());
        self.touch();
        Ok(user)
    }

    /// Check an email/password pair and record the login.
    ///
    /// Unknown email and wrong password fail identically.
    pub fn authenticate(&mut self, email: &str, password: &str) -> BillResult<User> {
        let user = self.check_credentials(email, password)?;
        self.log_action(
            user.id,
            &user.username,
            "Login",
            Some(format!("User {} logged in.", user.username)),
        );
        Ok(user)
    }

    /// Check an email/password pair without recording a login.
    pub fn check_credentials(&self, email: &str, password: &str) -> BillResult<User> {
        match self.find_user_by_email(email) {
            Some(user) if verify_password(password, &user.password_hash)? => Ok(user.clone()),
            _ => {
                warn!(email = %email.trim(), "failed login");
                Err(BillError::AuthenticationFailed)
            }
        }
    }

    /// Change a user's role. Admin only, and the last admin cannot be
    /// demoted.
    pub fn set_role(&mut self, actor: &User, user_id: u64, role: Role) -> BillResult<User> {
        require(actor, Capability::ManageUsers)?;

        let index = self
            .users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or_else(|| BillError::not_found("User", user_id.to_string()))?;

        // Registration hands out admin whenever none exists, so the last one
        // must stay.
        let other_admins = self
            .users
            .iter()
            .filter(|u| u.role == Role::Admin && u.id != user_id)
            .count();
        if self.users[index].role == Role::Admin && role != Role::Admin && other_admins == 0 {
            warn!(id = user_id, "refused to demote the last admin");
            return Err(BillError::invalid_input(
                "user_level",
                role.as_str(),
                "The ledger must keep at least one admin",
            ));
        }

        let user = &mut self.users[index];
        let previous = user.role;
        user.role = role;
        let updated = user.clone();

        info!(id = updated.id, username = %updated.username, from = %previous, to = %role, "role changed");
        self.log_action(
            actor.id,
            &actor.username,
            "Role Change",
            Some(format!("User {}'s level updated from {} to {}.", updated.username, previous, role)),
        );
        Ok(updated)
    }

    /// All accounts, in registration order. Admin only.
    pub fn users(&self, actor: &User) -> BillResult<Vec<&User>> {
        require(actor, Capability::ManageUsers)?;
        Ok(self.users.iter().collect())
    }

    pub fn user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Email match is case-insensitive and ignores surrounding whitespace.
    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        let wanted = email.trim().to_lowercase();
        self.users.iter().find(|u| u.email.to_lowercase() == wanted)
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<&User> {
        let wanted = username.trim().to_lowercase();
        self.users.iter().find(|u| u.username.to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(username: &str, email: &str) -> Registration {
        Registration {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[test]
    fn test_first_user_bootstraps_admin() {
        let mut ledger = Ledger::new("Shop");
        let first = ledger.register(&registration("owner", "owner@shop.test")).unwrap();
        let second = ledger.register(&registration("buyer", "buyer@shop.test")).unwrap();
        assert_eq!(first.role, Role::Admin);
        assert_eq!(second.role, Role::Customer);
        assert_eq!((first.id, second.id), (1, 2));
        assert_ne!(second.password_hash, "s3cret");
    }

    #[test]
    fn test_duplicate_email_and_username() {
        let mut ledger = Ledger::new("Shop");
        ledger.register(&registration("owner", "owner@shop.test")).unwrap();

        let err = ledger.register(&registration("other", "OWNER@shop.test")).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE");

        let err = ledger.register(&registration("Owner", "new@shop.test")).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE");
        assert_eq!(ledger.user_count(), 1);
    }

    #[test]
    fn test_registration_validation() {
        let mut ledger = Ledger::new("Shop");
        let mut form = registration("x", "x@shop.test");
        form.first_name = " ".to_string();
        assert_eq!(ledger.register(&form).unwrap_err().error_code(), "MISSING_FIELD");

        let form = registration("a_very_long_username_indeed", "x@shop.test");
        assert_eq!(ledger.register(&form).unwrap_err().error_code(), "INVALID_INPUT");

        let form = registration("x", "not-an-email");
        assert_eq!(ledger.register(&form).unwrap_err().error_code(), "INVALID_INPUT");
        assert_eq!(ledger.user_count(), 0);
    }

    #[test]
    fn test_authenticate() {
        let mut ledger = Ledger::new("Shop");
        ledger.register(&registration("owner", "owner@shop.test")).unwrap();

        let user = ledger.authenticate(" Owner@Shop.test ", "s3cret").unwrap();
        assert_eq!(user.username, "owner");

        assert_eq!(
            ledger.authenticate("owner@shop.test", "wrong").unwrap_err(),
            BillError::AuthenticationFailed
        );
        assert_eq!(
            ledger.authenticate("nobody@shop.test", "s3cret").unwrap_err(),
            BillError::AuthenticationFailed
        );
    }

    #[test]
    fn test_login_is_audited() {
        let mut ledger = Ledger::new("Shop");
        let admin = ledger.register(&registration("owner", "owner@shop.test")).unwrap();
        ledger.authenticate("owner@shop.test", "s3cret").unwrap();

        let log = ledger.audit_log(&admin).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, "Login");
        assert_eq!(log[0].details.as_deref(), Some("User owner logged in."));
    }

    #[test]
    fn test_check_credentials_is_not_audited() {
        let mut ledger = Ledger::new("Shop");
        let admin = ledger.register(&registration("owner", "owner@shop.test")).unwrap();
        assert_eq!(ledger.check_credentials("owner@shop.test", "s3cret").unwrap(), admin);
        assert!(ledger.check_credentials("owner@shop.test", "nope").is_err());
        assert!(ledger.audit_log(&admin).unwrap().is_empty());
    }

    #[test]
    fn test_set_role() {
        let mut ledger = Ledger::new("Shop");
        let admin = ledger.register(&registration("owner", "owner@shop.test")).unwrap();
        let buyer = ledger.register(&registration("buyer", "buyer@shop.test")).unwrap();

        let updated = ledger.set_role(&admin, buyer.id, Role::Manager).unwrap();
        assert_eq!(updated.role, Role::Manager);
        assert_eq!(ledger.user(buyer.id).map(|u| u.role), Some(Role::Manager));

        let err = ledger.set_role(&updated, admin.id, Role::Customer).unwrap_err();
        assert_eq!(err.error_code(), "PERMISSION_DENIED");

        let err = ledger.set_role(&admin, 99, Role::Admin).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_last_admin_cannot_be_demoted() {
        let mut ledger = Ledger::new("Shop");
        let admin = ledger.register(&registration("owner", "owner@shop.test")).unwrap();

        let err = ledger.set_role(&admin, admin.id, Role::Customer).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(ledger.user(admin.id).map(|u| u.role), Some(Role::Admin));

        let stranger = ledger.register(&registration("stranger", "stranger@shop.test")).unwrap();
        assert_eq!(stranger.role, Role::Customer);
    }

    #[test]
    fn test_admin_can_step_down_once_replaced() {
        let mut ledger = Ledger::new("Shop");
        let admin = ledger.register(&registration("owner", "owner@shop.test")).unwrap();
        let heir = ledger.register(&registration("heir", "heir@shop.test")).unwrap();

        ledger.set_role(&admin, heir.id, Role::Admin).unwrap();
        let stepped_down = ledger.set_role(&admin, admin.id, Role::Manager).unwrap();
        assert_eq!(stepped_down.role, Role::Manager);

        let heir = ledger.user(heir.id).cloned().unwrap();
        assert!(ledger.set_role(&heir, heir.id, Role::Customer).is_err());
    }

    #[test]
    fn test_users_listing_requires_admin() {
        let mut ledger = Ledger::new("Shop");
        let admin = ledger.register(&registration("owner", "owner@shop.test")).unwrap();
        let buyer = ledger.register(&registration("buyer", "buyer@shop.test")).unwrap();
        assert_eq!(ledger.users(&admin).unwrap().len(), 2);
        assert!(ledger.users(&buyer).is_err());
    }
}
