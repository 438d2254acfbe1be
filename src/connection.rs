use std::sync::{Arc, OnceLock};

use futures::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{
    net::TcpStream,
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::timeout,
};
use tokio_util::{
    codec::{Framed, LinesCodec},
    sync::{CancellationToken, DropGuard},
};
use tracing::{debug, info, warn};

use crate::{
    config::ClientConfig,
    error::GroupError,
    protocol_objects::LineParser,
    types::{LineReceivedEvent, Result},
};

type LineStream = SplitStream<Framed<TcpStream, LinesCodec>>;
type LineSink = SplitSink<Framed<TcpStream, LinesCodec>, String>;

/// One socket with its reader and sender tasks.
///
/// Both tasks share a cancellation token. Whichever task stops first, for any
/// reason, cancels it, so the other one exits too and the socket is released
/// once both halves are dropped.
pub struct GroupConnection {
    sender: UnboundedSender<String>,
    listen_join_handle: JoinHandle<Result<()>>,
    send_join_handle: JoinHandle<Result<()>>,
    cancellation_token: CancellationToken,
    exit_reason: Arc<OnceLock<String>>,
    _cancel_on_drop: DropGuard,
}

impl GroupConnection {
    pub(crate) async fn new(
        config: &ClientConfig,
        cancellation_token: CancellationToken,
        line_received_callback: LineReceivedEvent,
    ) -> Result<Self> {
        if config.client_id.contains(['\n', '\r']) {
            return Err(GroupError::InvalidWireText {
                text: config.client_id.clone(),
            });
        }

        let addr = config.addr();
        let framed = match timeout(config.connect_timeout, Self::open(config, &addr)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(GroupError::ConnectTimeout {
                    addr,
                    timeout: config.connect_timeout,
                });
            }
        };

        let (line_sink, line_stream) = framed.split();
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();

        let exit_reason = Arc::new(OnceLock::new());

        let listen_join_handle = tokio::spawn(Self::supervise(
            "listen",
            Self::listen(
                line_stream,
                LineParser::new(config.line_format),
                line_received_callback,
                cancellation_token.clone(),
            ),
            cancellation_token.clone(),
            exit_reason.clone(),
        ));
        let send_join_handle = tokio::spawn(Self::supervise(
            "send",
            Self::send_loop(receiver, line_sink, cancellation_token.clone()),
            cancellation_token.clone(),
            exit_reason.clone(),
        ));

        info!(client_id = %config.client_id, %addr, "connection: established");

        Ok(Self {
            sender,
            listen_join_handle,
            send_join_handle,
            _cancel_on_drop: cancellation_token.clone().drop_guard(),
            cancellation_token,
            exit_reason,
        })
    }

    async fn open(config: &ClientConfig, addr: &str) -> Result<Framed<TcpStream, LinesCodec>> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| GroupError::ConnectionError {
                addr: String::from(addr),
                source,
            })?;

        let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(config.max_line_length));
        Self::handshake(&mut framed, &config.client_id, &config.accept_token).await?;
        Ok(framed)
    }

    async fn handshake(
        framed: &mut Framed<TcpStream, LinesCodec>,
        client_id: &str,
        accept_token: &str,
    ) -> Result<()> {
        framed.send(client_id).await?;

        match framed.next().await {
            Some(Ok(response)) if response == accept_token => Ok(()),
            Some(Ok(response)) => {
                warn!(%client_id, %response, "connection: handshake rejected");
                Err(GroupError::HandshakeRejected {
                    response: Some(response),
                })
            }
            Some(Err(error)) => Err(error.into()),
            None => {
                warn!(%client_id, "connection: closed during handshake");
                Err(GroupError::HandshakeRejected { response: None })
            }
        }
    }

    /// Runs one task body, records its failure and stops the sibling task.
    async fn supervise(
        name: &'static str,
        task: impl Future<Output = Result<()>>,
        cancellation_token: CancellationToken,
        exit_reason: Arc<OnceLock<String>>,
    ) -> Result<()> {
        let result = task.await;

        match &result {
            Ok(()) => debug!(task = name, "connection: task finished"),
            Err(error) => {
                warn!(task = name, %error, "connection: task failed");
                let _ = exit_reason.set(error.to_string());
            }
        }

        cancellation_token.cancel();
        result
    }

    async fn listen(
        mut line_stream: LineStream,
        parser: LineParser,
        line_received_callback: LineReceivedEvent,
        cancellation_token: CancellationToken,
    ) -> Result<()> {
        loop {
            tokio::select! {
                biased;

                () = cancellation_token.cancelled() => {
                    break;
                }

                received = line_stream.next() => {
                    let line = match received {
                        Some(Ok(line)) => line,
                        Some(Err(error)) => return Err(error.into()),
                        None => return Err(GroupError::ConnectionClosed),
                    };

                    let server_line = parser.parse(&line)?;
                    if cancellation_token.is_cancelled() {
                        break;
                    }
                    line_received_callback(server_line).await;
                }
            }
        }

        Ok(())
    }

    async fn send_loop(
        mut receiver: UnboundedReceiver<String>,
        mut line_sink: LineSink,
        cancellation_token: CancellationToken,
    ) -> Result<()> {
        loop {
            tokio::select! {
                biased;

                () = cancellation_token.cancelled() => {
                    break;
                }

                line = receiver.recv() => {
                    let Some(line) = line else {
                        debug!("connection: output queue closed");
                        break;
                    };

                    line_sink.send(line).await?;
                    let mut drained = 1;
                    while !cancellation_token.is_cancelled()
                        && let Ok(line) = receiver.try_recv()
                    {
                        line_sink.send(line).await?;
                        drained += 1;
                    }
                    debug!(lines = drained, "connection: drained output queue");
                },
            }
        }

        let _ = line_sink.close().await;
        Ok(())
    }

    /// Queues one line for the sender task.
    pub(crate) fn send(&self, line: String) -> Result<()> {
        if self.cancellation_token.is_cancelled() {
            return Err(GroupError::NotConnected);
        }
        Ok(self.sender.send(line)?)
    }

    pub fn is_alive(&self) -> bool {
        !self.cancellation_token.is_cancelled()
    }

    pub fn interrupt(&self) {
        self.cancellation_token.cancel();
    }

    pub fn exit_reason(&self) -> Option<&str> {
        self.exit_reason.get().map(String::as_str)
    }

    pub async fn close(self) -> Result<()> {
        self.cancellation_token.cancel();

        let results = tokio::try_join!(self.listen_join_handle, self.send_join_handle)?;

        let mut task_errors = vec![];

        if let Err(error) = results.0 {
            task_errors.push(error);
        }
        if let Err(error) = results.1 {
            task_errors.push(error);
        }

        match task_errors.len() {
            0 => Ok(()),
            1 => Err(task_errors.remove(0)),
            _ => Err(GroupError::MultipleTaskErrors {
                errors: task_errors,
            }),
        }
    }
}
