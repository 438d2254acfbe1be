use std::{pin::Pin, time::Duration};

use crate::{
    error::GroupError,
    protocol_objects::{ServerLine, UserState},
};

// Constants
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_ACCEPT_TOKEN: &str = "OK";
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

pub const ROOM_UPDATE_PREFIX: char = 'R';
pub const USER_UPDATE_PREFIX: char = 'U';

pub type Result<Type> = std::result::Result<Type, GroupError>;

pub(crate) type LineReceivedEvent =
    Box<dyn Fn(ServerLine) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Called from the reader task with every known user, sorted by user id.
pub type GroupStateListener = Box<dyn Fn(&[UserState]) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// What to do with input that does not match the grammar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FormatPolicy {
    /// Fail with [`crate::error::MalformedInput`].
    #[default]
    Strict,
    /// Keep whatever can be recovered and carry on.
    Lenient,
}
