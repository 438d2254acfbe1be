use serde::{Deserialize, Serialize};

use super::{Role, UserUpdate};

/// Last known state of one remote participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    user_id: String,
    pub activity: Option<String>,
    pub update_age_ms: u64,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserState {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: String::from(user_id),
            activity: None,
            update_age_ms: 0,
            role: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Overwrites everything the update carries. A missing role leaves the
    /// previous one in place.
    pub(crate) fn apply(&mut self, update: &UserUpdate) {
        self.update_age_ms = update.update_age_ms;
        self.activity.clone_from(&update.activity);
        if update.role.is_some() {
            self.role = update.role;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::protocol_objects::RoomState;

    #[test]
    fn serializes_with_lowercase_role() {
        let mut state = UserState::new("alice");
        state.apply(&UserUpdate {
            update_age_ms: 1500,
            user_id: String::from("alice"),
            activity: Some(String::from("walking")),
            role: Some(Role::Moderator),
        });

        let value = serde_json::to_value(&state).expect("serialize");
        assert_eq!(
            value,
            json!({
                "user_id": "alice",
                "activity": "walking",
                "update_age_ms": 1500,
                "role": "moderator"
            })
        );
    }

    #[test]
    fn omits_missing_role_and_reads_it_back() {
        let state = UserState::new("bob");
        let text = serde_json::to_string(&state).expect("serialize");
        assert!(!text.contains("role"));

        let back: UserState = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, state);
    }

    #[test]
    fn room_state_uses_wire_names() {
        assert_eq!(
            serde_json::to_value(RoomState::Quiet).expect("serialize"),
            json!("quiet")
        );
    }
}
