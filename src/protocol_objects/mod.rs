mod message;
mod role;
mod room_state;
mod server_line;
mod user_state;

pub use message::ClientMessage;
pub use role::Role;
pub use room_state::RoomState;
pub use server_line::*;
pub use user_state::UserState;
