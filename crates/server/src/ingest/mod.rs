//! Ingestion of order records from the message topic.
//!
//! One long-running worker consumes records sequentially in delivery order:
//! decode, validate, create. A bad record is logged and dropped; the loop
//! stops only when the shutdown token fires. From the publisher's side
//! ingestion is fire-and-forget, so failures are observable via logs only.

mod consumer;

pub use consumer::OrderConsumer;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use validator::Validate;

use orderline_core::wire;

use crate::service::{OrderService, ServiceError};

/// Worker that drains the order topic into the service's create path.
pub struct IngestWorker {
    consumer: OrderConsumer,
    service: Arc<OrderService>,
    shutdown: CancellationToken,
}

impl IngestWorker {
    /// Create a worker over a subscribed consumer.
    #[must_use]
    pub fn new(
        consumer: OrderConsumer,
        service: Arc<OrderService>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            consumer,
            service,
            shutdown,
        }
    }

    /// Consume records until the shutdown token is cancelled.
    ///
    /// The consumer connection is released when the worker returns.
    pub async fn run(self) {
        info!("order ingestion started");
        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!("order ingestion shutting down");
                    break;
                }
                received = self.consumer.recv() => match received {
                    Ok(payload) => process_record(&self.service, &payload).await,
                    Err(e) => warn!(error = %e, "failed to read record from topic"),
                }
            }
        }
    }
}

/// Handle a single record. Failures are terminal for the record, never for
/// the loop.
async fn process_record(service: &OrderService, payload: &[u8]) {
    let order: wire::Order = match serde_json::from_slice(payload) {
        Ok(order) => order,
        Err(e) => {
            error!(error = %e, "failed to decode order record");
            return;
        }
    };

    if let Err(e) = order.validate() {
        warn!(order_uid = %order.order_uid, error = %e, "rejected order record");
        return;
    }

    let order_uid = order.order_uid.clone();
    match service.create_order(order).await {
        Ok(()) => debug!(order_uid = %order_uid, "order ingested"),
        Err(ServiceError::AlreadyExists) => {
            warn!(order_uid = %order_uid, "order already exists, record dropped");
        }
        Err(e) => error!(order_uid = %order_uid, error = %e, "failed to create order"),
    }
}
