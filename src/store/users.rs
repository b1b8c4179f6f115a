//! User Store Module
//!
//! Minimal identity storage: unique usernames mapped to argon2 password
//! hashes. Password verification lives in the auth layer; this store only
//! holds rows.

use std::collections::HashMap;

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
}

// == User Store ==
/// In-memory user storage with a username uniqueness constraint.
#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<u64, User>,
    /// Username -> id index for uniqueness checks and login lookups
    by_username: HashMap<String, u64>,
    next_id: u64,
}

impl UserStore {
    /// Creates an empty UserStore.
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            by_username: HashMap::new(),
            next_id: 1,
        }
    }

    // == Create ==
    /// Registers a new user. Returns None if the username is taken.
    pub fn create(&mut self, username: String, password_hash: String) -> Option<User> {
        if self.by_username.contains_key(&username) {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;

        let user = User {
            id,
            username: username.clone(),
            password_hash,
        };
        self.users.insert(id, user.clone());
        self.by_username.insert(username, id);
        Some(user)
    }

    // == Lookups ==
    /// Fetches a user by id.
    pub fn get(&self, id: u64) -> Option<User> {
        self.users.get(&id).cloned()
    }

    /// Fetches a user by username.
    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.by_username
            .get(username)
            .and_then(|id| self.users.get(id))
            .cloned()
    }

    // == Set Password ==
    /// Replaces the stored password hash for a user.
    pub fn set_password(&mut self, id: u64, password_hash: String) -> bool {
        match self.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash;
                true
            }
            None => false,
        }
    }

    /// Returns the number of registered users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if no users are registered.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
