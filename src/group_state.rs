//! Remote participants known to one client.
//!
//! Users are keyed by id and never removed. The sorted id order handed to
//! listeners is cached and rebuilt only after a new member was inserted.

use std::collections::HashMap;

use crate::protocol_objects::{RoomState, ServerLine, UserState, UserUpdate};

#[derive(Debug, Default)]
pub struct GroupState {
    users: HashMap<String, UserState>,
    room: Option<RoomState>,
    sorted_ids: Vec<String>,
    membership_dirty: bool,
}

impl GroupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies every user segment of `line`, then its room field.
    pub fn apply_line(&mut self, line: &ServerLine) {
        for update in &line.users {
            self.apply_user(update);
        }
        if let Some(room) = line.room {
            self.room = Some(room);
        }
    }

    /// Returns `true` when the user was not known before.
    pub fn apply_user(&mut self, update: &UserUpdate) -> bool {
        let mut inserted = false;
        let state = self
            .users
            .entry(update.user_id.clone())
            .or_insert_with(|| {
                inserted = true;
                UserState::new(&update.user_id)
            });
        state.apply(update);

        if inserted {
            self.membership_dirty = true;
        }
        inserted
    }

    /// Every known user, ascending by user id.
    pub fn snapshot(&mut self) -> Vec<UserState> {
        if self.membership_dirty {
            self.sorted_ids = self.users.keys().cloned().collect();
            self.sorted_ids.sort_unstable();
            self.membership_dirty = false;
        }

        self.sorted_ids
            .iter()
            .filter_map(|user_id| self.users.get(user_id))
            .cloned()
            .collect()
    }

    pub fn get(&self, user_id: &str) -> Option<&UserState> {
        self.users.get(user_id)
    }

    pub fn room(&self) -> Option<RoomState> {
        self.room
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    #[cfg(test)]
    fn needs_sort(&self) -> bool {
        self.membership_dirty
    }
}

#[cfg(test)]
#[path = "group_state_test.rs"]
mod tests;
