use crate::domain::order::Order;
use crate::domain::ports::{Notifier, NotifierRef};
use crate::error::Result;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Notifier that only writes a log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn order_placed(&self, order: &Order) -> Result<()> {
        info!(
            order_id = %order.id,
            account = %order.account,
            total = %order.total_amount,
            "order placed notification"
        );
        Ok(())
    }
}

/// Runs the notification on a detached task. The caller never waits for it
/// and a failure is only logged.
pub fn dispatch_order_placed(notifier: NotifierRef, order: Order) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = notifier.order_placed(&order).await {
            warn!(order_id = %order.id, error = %e, "order notification failed");
        }
    })
}
