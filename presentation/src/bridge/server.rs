//! Bridge server loop (reader + per-request tasks + single writer)

use super::protocol::{BridgeError, BridgeMessage, Inbound, OutboundMessage, decode_bytes};
use eforce_application::DispatchOperationUseCase;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Serves one JSON-lines connection against a dispatcher.
///
/// Every inbound frame is handled on its own task, so a slow remote call does
/// not hold up the requests behind it. Responses and log entries share one
/// outbound queue drained by a single writer, so frames never interleave.
#[derive(Clone)]
pub struct BridgeServer {
    use_case: DispatchOperationUseCase,
    default_login_url: String,
    outbound: UnboundedSender<OutboundMessage>,
}

impl BridgeServer {
    /// `outbound` must be the sender whose receiver is later passed to
    /// [`run`](Self::run); the dispatcher's log relay should feed it too.
    pub fn new(
        use_case: DispatchOperationUseCase,
        default_login_url: impl Into<String>,
        outbound: UnboundedSender<OutboundMessage>,
    ) -> Self {
        Self {
            use_case,
            default_login_url: default_login_url.into(),
            outbound,
        }
    }

    /// Serve until `reader` reaches EOF or `cancel` fires.
    ///
    /// On EOF, requests already in flight are allowed to finish and their
    /// frames are written before returning. On cancellation they are aborted.
    pub async fn run<R, W>(
        self,
        reader: R,
        writer: W,
        outbound_rx: UnboundedReceiver<OutboundMessage>,
        cancel: CancellationToken,
    ) -> Result<(), BridgeError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let writer_done = CancellationToken::new();
        let writer_task = tokio::spawn(write_frames(writer, outbound_rx, writer_done.clone()));

        let mut reader = BufReader::new(reader);
        // Bytes of the current line; kept across iterations because a read
        // interrupted by another select branch leaves its partial line here.
        let mut line = Vec::new();
        let mut tasks = JoinSet::new();
        let mut read_result = Ok(());

        info!("Bridge ready");
        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!("Bridge cancelled with {} request(s) in flight", tasks.len());
                    tasks.shutdown().await;
                    break;
                }

                Some(res) = tasks.join_next() => {
                    if let Err(e) = res
                        && !e.is_cancelled()
                    {
                        warn!("Request task panicked: {}", e);
                    }
                }

                read = reader.read_until(b'\n', &mut line) => {
                    match read {
                        Ok(0) if line.is_empty() => {
                            debug!("Bridge input closed");
                            break;
                        }
                        Ok(_) => {
                            let frame = std::mem::take(&mut line);
                            if frame.iter().all(u8::is_ascii_whitespace) {
                                continue;
                            }
                            let server = self.clone();
                            tasks.spawn(async move { server.handle_line(frame).await });
                        }
                        Err(e) => {
                            read_result = Err(BridgeError::Io(e));
                            break;
                        }
                    }
                }
            }
        }

        while let Some(res) = tasks.join_next().await {
            if let Err(e) = res
                && !e.is_cancelled()
            {
                warn!("Request task panicked: {}", e);
            }
        }

        writer_done.cancel();
        match writer_task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(BridgeError::Io(e)),
            Err(e) => warn!("Bridge writer task failed: {}", e),
        }
        info!("Bridge stopped");
        read_result
    }

    async fn handle_line(&self, line: Vec<u8>) {
        trace!("<- {}", String::from_utf8_lossy(&line).trim_end());
        let response = match decode_bytes(&line, &self.default_login_url) {
            Ok(Inbound {
                sender,
                message: BridgeMessage::Operation(request),
            }) => Some(self.use_case.execute(&sender, request).await),
            Ok(Inbound {
                sender,
                message: BridgeMessage::SendLog { channel, message },
            }) => {
                self.use_case.relay_log(&sender, channel, message);
                None
            }
            Err(rejected) => {
                debug!("Rejected frame from {}: {}", rejected.sender, rejected.error);
                Some(
                    self.use_case
                        .reject(&rejected.sender, rejected.kind, rejected.error.into()),
                )
            }
        };

        if let Some(response) = response
            && self
                .outbound
                .send(OutboundMessage::response(&response))
                .is_err()
        {
            warn!("Bridge writer gone; dropped {} frame", response.channel);
        }
    }
}

async fn write_frames<W>(
    mut writer: W,
    mut outbound_rx: UnboundedReceiver<OutboundMessage>,
    done: CancellationToken,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        let message = tokio::select! {
            biased;
            message = outbound_rx.recv() => message,
            _ = done.cancelled() => None,
        };
        let Some(message) = message else {
            break;
        };
        write_frame(&mut writer, &message).await?;
    }

    while let Ok(message) = outbound_rx.try_recv() {
        write_frame(&mut writer, &message).await?;
    }
    writer.flush().await
}

async fn write_frame<W>(writer: &mut W, message: &OutboundMessage) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(message).map_err(std::io::Error::other)?;
    trace!("-> {}", line);
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
