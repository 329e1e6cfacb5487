//! In-memory user registry exercised by the integration suite

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use verdict_runtime::Value;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("Name and email are required")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("User not found")]
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl From<&User> for Value {
    fn from(user: &User) -> Self {
        Value::object([
            ("id", Value::from(user.id)),
            ("name", Value::from(&user.name)),
            ("email", Value::from(&user.email)),
        ])
    }
}

impl From<User> for Value {
    fn from(user: User) -> Self {
        Value::from(&user)
    }
}

/// Fields to change in [`UserManager::update_user`]
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct UserManager {
    users: Vec<User>,
    next_id: u64,
}

impl Default for UserManager {
    fn default() -> Self {
        Self::new()
    }
}

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

fn is_valid_email(email: &str) -> bool {
    email_pattern().is_some_and(|re| re.is_match(email))
}

impl UserManager {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            next_id: 1,
        }
    }

    pub fn add_user(&mut self, name: &str, email: &str) -> Result<User, UserError> {
        if name.is_empty() || email.is_empty() {
            return Err(UserError::MissingFields);
        }
        if !is_valid_email(email) {
            return Err(UserError::InvalidEmail);
        }
        if self.users.iter().any(|u| u.email == email) {
            return Err(UserError::DuplicateEmail);
        }

        let user = User {
            id: self.next_id,
            name: name.to_string(),
            email: email.to_string(),
        };
        self.next_id += 1;
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn remove_user(&mut self, id: u64) -> Result<User, UserError> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(UserError::NotFound)?;
        Ok(self.users.remove(index))
    }

    pub fn get_user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn all_users(&self) -> Vec<User> {
        self.users.clone()
    }

    pub fn update_user(&mut self, id: u64, update: UserUpdate) -> Result<User, UserError> {
        let current_email = self.get_user(id).ok_or(UserError::NotFound)?.email.clone();

        if let Some(email) = &update.email {
            if !is_valid_email(email) {
                return Err(UserError::InvalidEmail);
            }
            if *email != current_email && self.users.iter().any(|u| &u.email == email) {
                return Err(UserError::DuplicateEmail);
            }
        }

        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(UserError::NotFound)?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        Ok(user.clone())
    }
}
