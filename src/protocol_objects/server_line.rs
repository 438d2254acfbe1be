//! Grammar of the lines the coordination server broadcasts.
//!
//! A line is a comma-separated list. In the room-prefixed shape the first
//! field is the room state; every other non-empty field is a user segment,
//! usually wrapped in parentheses, of the form `age:user_id:activity` or
//! `age:user_id:activity:role`. Which segment sizes are accepted is fixed by
//! [`SegmentArity`], so both server variants go through the same parser.

use tracing::warn;

use crate::{
    error::MalformedInput,
    parser::{QuotePair, Splitter},
    types::FormatPolicy,
};

use super::{Role, RoomState};

/// Field count accepted for each user segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SegmentArity {
    /// `age:user_id:activity`
    Basic,
    /// `age:user_id:activity:role`
    WithRole,
    /// Either of the above.
    #[default]
    Any,
}

impl SegmentArity {
    fn accepts(self, count: usize) -> bool {
        match self {
            SegmentArity::Basic => count == 3,
            SegmentArity::WithRole => count == 4,
            SegmentArity::Any => count == 3 || count == 4,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            SegmentArity::Basic => "3",
            SegmentArity::WithRole => "4",
            SegmentArity::Any => "3 or 4",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineFormat {
    /// First field of every line is the room state.
    pub room_prefixed: bool,
    pub arity: SegmentArity,
    pub policy: FormatPolicy,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            room_prefixed: true,
            arity: SegmentArity::Any,
            policy: FormatPolicy::Strict,
        }
    }
}

/// One user segment as received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserUpdate {
    pub update_age_ms: u64,
    pub user_id: String,
    pub activity: Option<String>,
    pub role: Option<Role>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServerLine {
    pub room: Option<RoomState>,
    pub users: Vec<UserUpdate>,
}

/// Splits server lines according to a [`LineFormat`].
#[derive(Clone, Debug)]
pub struct LineParser {
    format: LineFormat,
    line_splitter: Splitter,
    segment_splitter: Splitter,
}

impl LineParser {
    pub fn new(format: LineFormat) -> Self {
        let line_splitter = Splitter::new(&[','], &[QuotePair::parens(), QuotePair::double_quote()])
            .with_policy(format.policy);
        let segment_splitter =
            Splitter::new(&[':'], &[QuotePair::double_quote()]).with_policy(format.policy);

        Self {
            format,
            line_splitter,
            segment_splitter,
        }
    }

    pub fn format(&self) -> LineFormat {
        self.format
    }

    /// # Errors
    ///
    /// Under [`FormatPolicy::Strict`] any grammar violation fails the whole
    /// line. Under [`FormatPolicy::Lenient`] offending fields are dropped
    /// and the rest of the line is kept.
    pub fn parse(&self, line: &str) -> Result<ServerLine, MalformedInput> {
        let fields = self.line_splitter.split(Some(line))?;
        let mut fields = fields.into_iter();
        let mut parsed = ServerLine::default();

        if self.format.room_prefixed
            && let Some(room) = fields.next()
            && !room.is_empty()
        {
            match room.parse::<RoomState>() {
                Ok(room) => parsed.room = Some(room),
                Err(error) => self.recover(error)?,
            }
        }

        for segment in fields.filter(|segment| !segment.is_empty()) {
            match self.parse_segment(&segment) {
                Ok(update) => parsed.users.push(update),
                Err(error) => self.recover(error)?,
            }
        }

        Ok(parsed)
    }

    fn recover(&self, error: MalformedInput) -> Result<(), MalformedInput> {
        match self.format.policy {
            FormatPolicy::Strict => Err(error),
            FormatPolicy::Lenient => {
                warn!(%error, "server line: skipping malformed field");
                Ok(())
            }
        }
    }

    fn parse_segment(&self, segment: &str) -> Result<UserUpdate, MalformedInput> {
        let fields = self.segment_splitter.split(Some(segment))?;

        if !self.format.arity.accepts(fields.len()) {
            return Err(MalformedInput::FieldCount {
                segment: String::from(segment),
                found: fields.len(),
                expected: self.format.arity.describe(),
            });
        }

        let mut fields = fields.into_iter();
        let age = fields.next().unwrap_or_default();
        let user_id = fields.next().unwrap_or_default();
        let activity = fields.next().unwrap_or_default();

        let update_age_ms = age
            .parse::<u64>()
            .map_err(|_| MalformedInput::InvalidAge(age.clone()))?;
        if user_id.is_empty() {
            return Err(MalformedInput::EmptyUserId(String::from(segment)));
        }
        let role = fields.next().map(|role| role.parse::<Role>()).transpose()?;

        Ok(UserUpdate {
            update_age_ms,
            user_id,
            activity: Some(activity).filter(|activity| !activity.is_empty()),
            role,
        })
    }
}

#[cfg(test)]
#[path = "server_line_test.rs"]
mod tests;
