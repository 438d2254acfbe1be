use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::MalformedInput;

/// Conversational role the server assigns to a participant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    None,
    Speaker,
    Listener,
    Moderator,
}

impl Role {
    pub fn as_wire(self) -> &'static str {
        match self {
            Role::None => "",
            Role::Speaker => "speaker",
            Role::Listener => "listener",
            Role::Moderator => "moderator",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for Role {
    type Err = MalformedInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(Role::None),
            "speaker" => Ok(Role::Speaker),
            "listener" => Ok(Role::Listener),
            "moderator" => Ok(Role::Moderator),
            other => Err(MalformedInput::UnknownRole(String::from(other))),
        }
    }
}
