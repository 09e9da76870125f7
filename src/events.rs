use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

/// Domain events emitted by the services after their writes commit.
#[derive(Debug, Clone, Serialize)]
pub enum Event {
    TransactionRecorded {
        room_id: i32,
        item_count: usize,
        event_name: String,
    },
    TipRecorded {
        room_id: i32,
        amount: Decimal,
        event_name: String,
    },
    InventoryCounted {
        drink_id: i32,
        old_quantity: i32,
        new_quantity: i32,
    },
    InventoryAdjusted {
        drink_id: i32,
        old_quantity: i32,
        new_quantity: i32,
        change: i32,
    },
    DrinkCreated {
        drink_id: i32,
        name: String,
    },
    DrinkUpdated {
        drink_id: i32,
    },
}

/// Cloneable handle for emitting events into the in-process channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    pub async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.tx.send(event).await
    }
}

/// Consumer task draining the event channel. Events currently only feed the
/// structured log; the channel boundary keeps emitters decoupled from
/// whatever consumes them next.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        info!(event = ?event, "domain event");
    }
    info!("event channel closed; stopping event processor");
}
