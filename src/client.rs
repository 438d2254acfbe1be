use std::{
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    config::ClientConfig,
    connection::GroupConnection,
    group_state::GroupState,
    protocol_objects::{ClientMessage, Role, RoomState, ServerLine, UserState},
    types::{GroupStateListener, ListenerId, Result},
};

/// Handle to one live coordination connection.
///
/// Created by [`GroupClient::connect`]. The owner polls [`GroupClient::is_alive`]
/// and builds a new client when the connection has gone; nothing here
/// reconnects by itself.
///
/// Listeners run on the reader task while the group lock is held, so a slow
/// listener delays every following line.
pub struct GroupClient {
    client_id: String,
    next_listener_id: AtomicU64,
    connection: GroupConnection,
    mutable_state: Arc<Mutex<GroupClientMutableState>>,
}

#[derive(Default)]
pub(crate) struct GroupClientMutableState {
    group: GroupState,
    listeners: Vec<(ListenerId, GroupStateListener)>,
}

impl GroupClient {
    /// Opens the socket, performs the handshake and starts the reader and
    /// sender tasks.
    ///
    /// # Errors
    ///
    /// [`GroupError::ConnectionError`](crate::error::GroupError::ConnectionError)
    /// or [`GroupError::ConnectTimeout`](crate::error::GroupError::ConnectTimeout)
    /// when the server cannot be reached in time, and
    /// [`GroupError::HandshakeRejected`](crate::error::GroupError::HandshakeRejected)
    /// when it does not answer with the acceptance token.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let mutable_state = Arc::new(Mutex::new(GroupClientMutableState::default()));
        let cancellation_token = CancellationToken::new();

        let line_state = mutable_state.clone();
        let line_token = cancellation_token.clone();
        let line_received_callback = move |line: ServerLine| {
            let mutable_state = line_state.clone();
            let cancellation_token = line_token.clone();
            Box::pin(async move {
                mutable_state
                    .lock()
                    .await
                    .on_receive(&line, &cancellation_token);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        };

        info!(client_id = %config.client_id, addr = %config.addr(), "client: connecting");
        let connection =
            GroupConnection::new(&config, cancellation_token, Box::new(line_received_callback))
                .await?;

        Ok(Self {
            client_id: config.client_id,
            next_listener_id: AtomicU64::new(0),
            connection,
            mutable_state,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Reports the local activity; `None` means no classified activity.
    pub fn set_current_activity(&self, label: Option<&str>) -> Result<()> {
        self.send(ClientMessage::Activity(label.map(String::from)))
    }

    pub fn set_room_state(&self, room: RoomState) -> Result<()> {
        self.send(ClientMessage::Room(room))
    }

    pub fn set_role(&self, user_id: &str, role: Role) -> Result<()> {
        self.send(ClientMessage::Role {
            user_id: String::from(user_id),
            role,
        })
    }

    fn send(&self, message: ClientMessage) -> Result<()> {
        let line = message.into_line()?;
        debug!(client_id = %self.client_id, %line, "client: queue line");
        self.connection.send(line)
    }

    pub async fn add_group_state_listener<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&[UserState]) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.mutable_state
            .lock()
            .await
            .listeners
            .push((id, Box::new(f)));
        id
    }

    /// Returns `false` when no listener had this id.
    pub async fn remove_group_state_listener(&self, id: ListenerId) -> bool {
        let listeners = &mut self.mutable_state.lock().await.listeners;
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Every known remote user, ascending by user id.
    pub async fn snapshot(&self) -> Vec<UserState> {
        self.mutable_state.lock().await.group.snapshot()
    }

    pub async fn room_state(&self) -> Option<RoomState> {
        self.mutable_state.lock().await.group.room()
    }

    pub fn is_alive(&self) -> bool {
        self.connection.is_alive()
    }

    /// Stops both tasks. The socket is released once they have exited.
    pub fn interrupt(&self) {
        info!(client_id = %self.client_id, "client: interrupt");
        self.connection.interrupt();
    }

    /// Why the connection stopped, if it failed.
    pub fn exit_reason(&self) -> Option<&str> {
        self.connection.exit_reason()
    }

    /// Stops the client and waits for both tasks, returning whatever made
    /// them fail.
    pub async fn close(self) -> Result<()> {
        self.connection.close().await
    }
}

impl GroupClientMutableState {
    /// Listeners are skipped once the client has been interrupted.
    fn on_receive(&mut self, line: &ServerLine, cancellation_token: &CancellationToken) {
        self.group.apply_line(line);

        let snapshot = self.group.snapshot();
        for (_, listener) in &self.listeners {
            if cancellation_token.is_cancelled() {
                return;
            }
            listener(&snapshot);
        }
    }
}
