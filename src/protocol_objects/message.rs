use std::fmt::Display;

use crate::{
    error::GroupError,
    types::{ROOM_UPDATE_PREFIX, Result, USER_UPDATE_PREFIX},
};

use super::{Role, RoomState};

/// One line the client sends after the handshake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientMessage {
    /// Local activity label; `None` is sent as an empty line.
    Activity(Option<String>),
    Room(RoomState),
    Role { user_id: String, role: Role },
}

impl ClientMessage {
    /// Renders the wire line, rejecting text that would split into several lines.
    pub fn into_line(self) -> Result<String> {
        let line = self.to_string();
        if line.contains(['\n', '\r']) {
            return Err(GroupError::InvalidWireText { text: line });
        }
        Ok(line)
    }
}

impl Display for ClientMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientMessage::Activity(Some(label)) => f.write_str(label),
            ClientMessage::Activity(None) => Ok(()),
            ClientMessage::Room(room) => write!(f, "{ROOM_UPDATE_PREFIX}:{room}"),
            ClientMessage::Role { user_id, role } => {
                write!(f, "{USER_UPDATE_PREFIX}:{}:{role}", quote_field(user_id))
            }
        }
    }
}

/// Wraps `field` in double quotes, escaping `"` and `\`, when it would not
/// survive a `:` split as a single field.
fn quote_field(field: &str) -> String {
    let needs_quotes = field.contains([':', '"', '\\'])
        || field.starts_with(char::is_whitespace)
        || field.ends_with(char::is_whitespace);
    if !needs_quotes {
        return String::from(field);
    }

    let mut quoted = String::with_capacity(field.len() + 2);
    quoted.push('"');
    for c in field.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
