use crate::domain::SessionId;
use crate::interface_adapters::protocol::{ClientMessage, ServerMessage};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::{rand_id, session_id};
use crate::use_cases::{GameEvent, ServerEvent};

use axum::{
    Error,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::{Instrument, Span, debug, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    OutboxClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        // Separate connection id for correlating logs before/after a player_id exists.
        let conn_id = rand_id();
        let span = info_span!("conn", conn_id, player_id = tracing::field::Empty);
        handle_socket(socket, state).instrument(span)
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut ctx = match bootstrap_connection(&mut socket, &state).await {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!(error = ?e, "failed to bootstrap connection");
            let _ = socket.close().await;
            return;
        }
    };

    Span::current().record("player_id", tracing::field::display(&ctx.session_id));
    info!(player_id = %ctx.session_id, "client connected");

    // Main Client Loop
    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    // Serialize message safely; log JSON errors instead of panicking
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

struct ConnCtx {
    pub session_id: SessionId,
    pub input_tx: mpsc::Sender<GameEvent>,
    // Events the world task routed to this session.
    pub outbox_rx: mpsc::Receiver<ServerEvent>,

    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,

    pub invalid_input: u32,

    pub last_input_full_log: Instant,
    pub last_invalid_input_log: Instant,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    state: &AppState,
) -> Result<ConnCtx, NetError> {
    // Every connection is a brand-new player; there is no resume.
    let session_id = session_id();

    // Send Identity Packet
    // Tell the client "This is who you are" before any roster mentions it.
    let identity_msg = ServerMessage::Identity {
        player_id: session_id.to_string(),
    };
    let bytes_out = send_message(socket, &identity_msg).await? as u64;

    // Notify World Task
    // The world task registers the outbox, spawns the player and queues the
    // map + roster snapshot for this session.
    let (outbox, outbox_rx) = mpsc::channel::<ServerEvent>(state.outbox_capacity);
    state
        .input_tx
        .send(GameEvent::Connect {
            session_id: session_id.clone(),
            outbox,
        })
        .await
        .map_err(|_| NetError::InputClosed)?;

    let now = Instant::now() - LOG_THROTTLE;
    Ok(ConnCtx {
        session_id,
        input_tx: state.input_tx.clone(),
        outbox_rx,

        msgs_in: 0,
        msgs_out: 1,
        bytes_in: 0,
        bytes_out,

        invalid_input: 0,

        last_input_full_log: now,
        last_invalid_input_log: now,
    })
}

enum LoopControl {
    Continue,
    Disconnect,
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        // disconnect becomes true on error
        let disconnect: bool = tokio::select! {
            // Incoming Message from Client
            incoming = socket.recv() => {
                match handle_incoming_ws(incoming, ctx) {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            // Outgoing events routed to this session
            outgoing = ctx.outbox_rx.recv() => {
                match outgoing {
                    Some(event) => match forward_event(event, socket, ctx).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    None => {
                        // World task dropped our outbox; nothing more will arrive.
                        fatal = Some(NetError::OutboxClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    if let Err(e) = disconnect_cleanup(ctx).await {
        warn!(error = ?e, "error during disconnect cleanup");
        if fatal.is_none() {
            fatal = Some(e);
        }
    }

    if let Some(err) = fatal {
        Err(err)
    } else {
        Ok(())
    }
}

fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    ctx: &mut ConnCtx,
) -> Result<LoopControl, NetError> {
    let player_id = &ctx.session_id;
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.msgs_in += 1;
                ctx.bytes_in += text.len() as u64;

                let event = serde_json::from_str::<ClientMessage>(&text)
                    .map_err(|e| e.to_string())
                    .and_then(|msg| msg.into_event(player_id).map_err(|e| format!("{e:?}")));

                match event {
                    Ok(event) => forward_input(ctx, event),
                    Err(reason) => {
                        // Malformed input is dropped; the session stays open.
                        ctx.invalid_input += 1;
                        if should_log(&mut ctx.last_invalid_input_log) {
                            warn!(
                                player_id = %ctx.session_id,
                                bytes = text.len(),
                                invalid = ctx.invalid_input,
                                error = %reason,
                                "invalid client message dropped"
                            );
                        }
                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(bytes) => {
                ctx.msgs_in += 1;
                ctx.bytes_in += bytes.len() as u64;
                ctx.invalid_input += 1;
                if should_log(&mut ctx.last_invalid_input_log) {
                    warn!(player_id = %ctx.session_id, "binary message dropped");
                }
                Ok(LoopControl::Continue)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(player_id = %player_id, error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!(player_id = %player_id, "websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

fn forward_input(ctx: &mut ConnCtx, event: GameEvent) -> Result<LoopControl, NetError> {
    match ctx.input_tx.try_send(event) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(_evt)) => {
            if should_log(&mut ctx.last_input_full_log) {
                warn!(player_id = %ctx.session_id, "input channel full; dropping input");
            }
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
    }
}

async fn forward_event(event: ServerEvent, socket: &mut WebSocket, ctx: &mut ConnCtx) -> LoopControl {
    let msg = ServerMessage::from(event);
    match send_message(socket, &msg).await {
        Ok(bytes) => {
            ctx.msgs_out += 1;
            ctx.bytes_out += bytes as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Log unexpected send failures; disconnect will follow immediately.
            warn!(error = ?err, "failed to send event");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(ctx: &mut ConnCtx) -> Result<(), NetError> {
    ctx.input_tx
        .send(GameEvent::Disconnect {
            session_id: ctx.session_id.clone(),
        })
        .await
        .map_err(|_| NetError::InputClosed)?;

    debug!(
        player_id = %ctx.session_id,
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_input = ctx.invalid_input,
        "connection stats"
    );
    info!(player_id = %ctx.session_id, "client disconnected");
    Ok(())
}
