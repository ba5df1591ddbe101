//! Authentication Module
//!
//! Form validation and credential checks over the flat-file user table.
//! Passwords are compared in plaintext; validation failures are returned as
//! human-readable messages and never logged.

use crate::error::{ChatError, Result};
use crate::store::{LoginLog, UserStore};

/// An authenticated session
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub session_id: String,
}

/// Validate login form input.
pub fn validate_login_form(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(ChatError::Validation("Username cannot be empty".to_string()));
    }
    if password.trim().is_empty() {
        return Err(ChatError::Validation("Password cannot be empty".to_string()));
    }
    if username.trim().chars().count() < 2 {
        return Err(ChatError::Validation(
            "Username must be at least 2 characters long".to_string(),
        ));
    }
    if password.trim().chars().count() < 3 {
        return Err(ChatError::Validation(
            "Password must be at least 3 characters long".to_string(),
        ));
    }
    Ok(())
}

/// Validate registration form input.
pub fn validate_registration_form(username: &str, password: &str, email: &str) -> Result<()> {
    let username = username.trim();
    let password = password.trim();

    if username.is_empty() {
        return Err(ChatError::Validation("Username cannot be empty".to_string()));
    }
    if password.is_empty() {
        return Err(ChatError::Validation("Password cannot be empty".to_string()));
    }
    if username.chars().count() < 3 {
        return Err(ChatError::Validation(
            "Username must be at least 3 characters long".to_string(),
        ));
    }
    if password.chars().count() < 6 {
        return Err(ChatError::Validation(
            "Password must be at least 6 characters long".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ChatError::Validation(
            "Username can only contain letters, numbers, hyphens, and underscores".to_string(),
        ));
    }
    if !email.is_empty() && !email.contains('@') {
        return Err(ChatError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    Ok(())
}

/// Login and registration over the user table and activity log
pub struct Authenticator {
    users: UserStore,
    log: LoginLog,
}

impl Authenticator {
    pub fn new(users: UserStore, log: LoginLog) -> Self {
        Self { users, log }
    }

    /// Check credentials against the merged user table.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        if username.is_empty() || password.is_empty() {
            return false;
        }
        self.users.load().get(username).map(String::as_str) == Some(password)
    }

    /// Validate credentials and open a session, appending one row to the
    /// login activity log.
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        if !self.authenticate(username, password) {
            return Err(ChatError::Auth(
                "Invalid username or password. Please try again.".to_string(),
            ));
        }

        let entry = self.log.record(username)?;
        Ok(Session {
            username: entry.username,
            session_id: entry.session_id,
        })
    }

    /// Register a new user and return the welcome message.
    pub fn register(&self, username: &str, password: &str, email: &str) -> Result<String> {
        validate_registration_form(username, password, email)?;

        if self.users.exists(username) {
            return Err(ChatError::Validation(
                "Username already exists. Please choose a different username.".to_string(),
            ));
        }

        self.users.append(username, password, email)?;
        Ok(format!(
            "Registration successful! Welcome, {}! You can now log in.",
            username
        ))
    }

    /// Total number of known users.
    pub fn user_count(&self) -> usize {
        self.users.count()
    }
}
