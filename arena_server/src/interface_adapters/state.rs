use crate::use_cases::GameEvent;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct AppState {
    // Inputs flowing from the network into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Capacity of each session's outbound event queue.
    pub outbox_capacity: usize,
}
