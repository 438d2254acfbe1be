use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::MalformedInput;

/// Room-wide mode shared by every participant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    #[default]
    Open,
    Quiet,
    Meeting,
}

impl RoomState {
    pub fn as_wire(self) -> &'static str {
        match self {
            RoomState::Open => "open",
            RoomState::Quiet => "quiet",
            RoomState::Meeting => "meeting",
        }
    }
}

impl Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for RoomState {
    type Err = MalformedInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(RoomState::Open),
            "quiet" => Ok(RoomState::Quiet),
            "meeting" => Ok(RoomState::Meeting),
            other => Err(MalformedInput::UnknownRoomState(String::from(other))),
        }
    }
}
