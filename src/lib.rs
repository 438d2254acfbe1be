//! Client for the group-activity coordination protocol.
//!
//! A [`GroupClient`](client::GroupClient) reports the locally classified
//! activity to a coordination server and keeps a sorted view of every other
//! participant's activity, age and role, handing it to registered listeners
//! whenever a server line arrives.
//!
//! ```rust,ignore
//! let client = GroupClient::connect(ClientConfig::new("10.0.0.2", 4711, "phone-7")).await?;
//! client
//!     .add_group_state_listener(|users| println!("{} users", users.len()))
//!     .await;
//! client.set_current_activity(Some("walking"))?;
//! ```

pub mod client;
pub mod config;
mod connection;
pub mod error;
pub mod group_state;
pub mod parser;
pub mod protocol_objects;
pub mod types;

pub use client::GroupClient;
pub use config::ClientConfig;
pub use error::{GroupError, MalformedInput};
