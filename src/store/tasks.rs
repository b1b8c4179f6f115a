//! Task Store Module
//!
//! Owner-scoped task storage. Every user-facing read and write goes through
//! a method that filters on the owner first; only the notification worker
//! and the maintenance jobs use the unscoped surface.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// A single task row.
///
/// `user` is set once at creation and never reassigned through any scoped
/// operation. `created_date` is immutable; `updated_date` is re-stamped on
/// every persisted mutation.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: u64,
    pub user: u64,
    pub title: String,
    pub completed: bool,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

// == Task Store ==
/// In-memory task storage with an owner-scoped query surface.
#[derive(Debug, Default)]
pub struct TaskStore {
    /// Row storage keyed by id
    tasks: HashMap<u64, Task>,
    /// Next id to hand out
    next_id: u64,
}

impl TaskStore {
    // == Constructor ==
    /// Creates an empty TaskStore.
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            next_id: 1,
        }
    }

    // == Insert ==
    /// Persists a new task for `owner` and returns the stored row.
    ///
    /// The owner always comes from the authenticated caller, never from a
    /// request payload. Both timestamps are set to the same instant.
    pub fn insert(&mut self, owner: u64, title: String, completed: bool) -> Task {
        let id = self.next_id;
        self.next_id += 1;

        let now = Utc::now();
        let task = Task {
            id,
            user: owner,
            title,
            completed,
            created_date: now,
            updated_date: now,
        };
        self.tasks.insert(id, task.clone());
        task
    }

    // == List ==
    /// Returns all tasks owned by `owner`, in insertion (id) order.
    pub fn list_for_owner(&self, owner: u64) -> Vec<Task> {
        let mut rows: Vec<Task> = self
            .tasks
            .values()
            .filter(|t| t.user == owner)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.id);
        rows
    }

    // == Get (scoped) ==
    /// Returns the task only if it exists and is owned by `owner`.
    ///
    /// Absence and cross-owner access are indistinguishable: both are `None`.
    pub fn get_owned(&self, id: u64, owner: u64) -> Option<Task> {
        self.tasks.get(&id).filter(|t| t.user == owner).cloned()
    }

    // == Replace (scoped) ==
    /// Full update of an owned task.
    ///
    /// `id`, `user` and `created_date` are preserved regardless of what the
    /// request carried; `updated_date` is recomputed.
    pub fn replace_owned(
        &mut self,
        id: u64,
        owner: u64,
        title: String,
        completed: bool,
    ) -> Option<Task> {
        let task = self.tasks.get_mut(&id).filter(|t| t.user == owner)?;
        task.title = title;
        task.completed = completed;
        task.user = owner;
        task.updated_date = Utc::now();
        Some(task.clone())
    }

    // == Patch (scoped) ==
    /// Partial update of an owned task; absent fields are left untouched.
    pub fn patch_owned(
        &mut self,
        id: u64,
        owner: u64,
        title: Option<String>,
        completed: Option<bool>,
    ) -> Option<Task> {
        let task = self.tasks.get_mut(&id).filter(|t| t.user == owner)?;
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(completed) = completed {
            task.completed = completed;
        }
        task.user = owner;
        task.updated_date = Utc::now();
        Some(task.clone())
    }

    // == Delete (scoped) ==
    /// Removes an owned task. Returns false for absent or cross-owner ids.
    pub fn delete_owned(&mut self, id: u64, owner: u64) -> bool {
        match self.tasks.get(&id) {
            Some(t) if t.user == owner => {
                self.tasks.remove(&id);
                true
            }
            _ => false,
        }
    }

    // == Get (unscoped) ==
    /// Fetches a task by id without owner scoping.
    ///
    /// Only the notification worker uses this: it re-reads the row fresh
    /// after dequeueing the id.
    pub fn get(&self, id: u64) -> Option<Task> {
        self.tasks.get(&id).cloned()
    }

    // == Count Incomplete (unscoped) ==
    /// System-wide count of tasks with `completed == false`.
    pub fn count_incomplete(&self) -> usize {
        self.tasks.values().filter(|t| !t.completed).count()
    }

    // == Delete Completed (unscoped) ==
    /// System-wide bulk delete of tasks with `completed == true`.
    ///
    /// Returns the number of rows removed. Idempotent: an immediate re-run
    /// removes zero rows.
    pub fn delete_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, t| !t.completed);
        before - self.tasks.len()
    }

    // == Length ==
    /// Returns the total number of rows across all owners.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
