use super::arena::Arena;
use super::dispatch::Dispatcher;
use super::types::{Effects, GameEvent, RespawnTicket};
use rand::Rng;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Timing knobs for the world task.
#[derive(Debug, Clone, Copy)]
pub struct WorldSettings {
    pub respawn_delay: Duration,
    pub projectile_life_time: Duration,
    pub projectile_sweep_interval: Duration,
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// Wall-clock millis anchored at startup and advanced by the Tokio clock.
struct WorldClock {
    epoch_ms: u64,
    started: Instant,
}

impl WorldClock {
    fn start() -> Self {
        Self {
            epoch_ms: now_millis(),
            started: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch_ms + self.started.elapsed().as_millis() as u64
    }
}

/// Single writer for the arena: handles one event to completion before the next.
///
/// Respawn timers hold a weak sender, so the task ends once every connection and
/// the app state have dropped their senders. The arena is handed back on exit.
pub async fn world_task<R: Rng>(
    mut input_rx: mpsc::Receiver<GameEvent>,
    input_tx: mpsc::WeakSender<GameEvent>,
    mut arena: Arena<R>,
    settings: WorldSettings,
) -> Arena<R> {
    let clock = WorldClock::start();
    let mut dispatcher = Dispatcher::new();
    let mut sweep = tokio::time::interval(settings.projectile_sweep_interval);
    sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let life_time_ms = settings.projectile_life_time.as_millis() as u64;

    loop {
        tokio::select! {
            ev = input_rx.recv() => {
                let Some(ev) = ev else {
                    break;
                };
                let effects = handle_event(&mut arena, &mut dispatcher, ev, clock.now_ms());
                if let Some(ticket) = effects.respawn {
                    schedule_respawn(input_tx.clone(), ticket, settings.respawn_delay);
                }
                dispatcher.dispatch_all(effects.messages);
            }
            _ = sweep.tick() => {
                let expired = arena.expire_projectiles(clock.now_ms(), life_time_ms);
                if expired > 0 {
                    debug!(expired, remaining = arena.world().projectiles().len(), "projectiles expired");
                }
            }
        }
    }

    info!(
        dropped_messages = dispatcher.dropped(),
        "input channel closed; world task exiting"
    );
    arena
}

fn handle_event<R: Rng>(
    arena: &mut Arena<R>,
    dispatcher: &mut Dispatcher,
    ev: GameEvent,
    now_ms: u64,
) -> Effects {
    match ev {
        GameEvent::Connect { session_id, outbox } => {
            if arena.life(&session_id).is_some() {
                // Keep the live session's outbox; the duplicate's is dropped here.
                warn!(%session_id, "duplicate session id; connect ignored");
                return Effects::none();
            }
            // Register first so the new session receives its own snapshot.
            dispatcher.register(session_id.clone(), outbox);
            arena.connect(session_id)
        }
        GameEvent::Disconnect { session_id } => {
            // Unregister first so removal only reaches the remaining sessions.
            dispatcher.unregister(&session_id);
            arena.disconnect(&session_id)
        }
        GameEvent::Move { session_id, to } => arena.move_player(&session_id, to),
        GameEvent::Shoot {
            session_id,
            origin,
            direction,
        } => arena.shoot(&session_id, origin, direction, now_ms),
        GameEvent::HitReport {
            session_id,
            projectile_id,
            target_id,
        } => arena.report_hit(&session_id, projectile_id, &target_id),
        GameEvent::Respawn(ticket) => arena.respawn(&ticket),
    }
}

fn schedule_respawn(input_tx: mpsc::WeakSender<GameEvent>, ticket: RespawnTicket, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        // World task is gone; nothing left to respawn into.
        let Some(tx) = input_tx.upgrade() else {
            return;
        };
        if tx.send(GameEvent::Respawn(ticket)).await.is_err() {
            warn!("world task closed before respawn was delivered");
        }
    });
}
