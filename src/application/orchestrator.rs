use super::notify::dispatch_order_placed;
use crate::config::PipelineConfig;
use crate::domain::account::AccountId;
use crate::domain::catalog::{CatalogError, CatalogItem};
use crate::domain::event::DebitEvent;
use crate::domain::order::{Order, OrderLine, OrderRequest};
use crate::domain::ports::{CatalogClientBox, EventPublisherBox, NotifierRef, OrderStoreBox};
use crate::error::{PipelineError, Result};
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Order side of the saga.
///
/// `create_order` validates every item against the catalog, stores the order
/// as `pending` and publishes one [`DebitEvent`]. The caller sees success only
/// when both the write and the publish succeeded.
pub struct OrderOrchestrator {
    catalog: CatalogClientBox,
    orders: OrderStoreBox,
    publisher: EventPublisherBox,
    notifier: Option<NotifierRef>,
    notifications: Mutex<Vec<JoinHandle<()>>>,
    topic: String,
    catalog_timeout: Duration,
    publish_timeout: Duration,
}

impl OrderOrchestrator {
    pub fn new(
        catalog: CatalogClientBox,
        orders: OrderStoreBox,
        publisher: EventPublisherBox,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            catalog,
            orders,
            publisher,
            notifier: None,
            notifications: Mutex::new(Vec::new()),
            topic: config.topic.clone(),
            catalog_timeout: config.catalog_timeout,
            publish_timeout: config.publish_timeout,
        }
    }

    pub fn with_notifier(mut self, notifier: NotifierRef) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub async fn create_order(&self, request: OrderRequest) -> Result<Order> {
        request.validate()?;

        // 1. Validate and price every item. Any rejection aborts before a write.
        let mut lines = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let catalog_item = self.lookup(&item.item_id).await?;
            if catalog_item.id != item.item_id {
                warn!(item = %item.item_id, returned = %catalog_item.id, "order rejected: catalog answered for another item");
                return Err(PipelineError::ItemRejected {
                    item: item.item_id.clone(),
                    reason: format!("catalog returned item '{}'", catalog_item.id),
                });
            }
            if !catalog_item.available {
                warn!(item = %item.item_id, account = %request.account, "order rejected: item not available");
                return Err(PipelineError::ItemRejected {
                    item: item.item_id.clone(),
                    reason: format!("'{}' is not available", catalog_item.title),
                });
            }
            if catalog_item.price < Decimal::ZERO {
                return Err(PipelineError::ItemRejected {
                    item: item.item_id.clone(),
                    reason: "catalog price is negative".to_string(),
                });
            }
            lines.push(OrderLine {
                item_id: item.item_id.clone(),
                quantity: item.quantity,
                unit_price: catalog_item.price,
            });
        }

        // 2. Persist as pending.
        let order = Order::pending(request.account.clone(), lines)?;
        let stored = self.orders.create_order(order).await.map_err(|e| {
            error!(account = %request.account, error = %e, "failed to store order");
            e.into_persistence()
        })?;
        info!(order_id = %stored.id, account = %stored.account, total = %stored.total_amount, "order stored as pending");

        // 3. Publish the debit instruction. From here on the row exists.
        self.publish_debit(&stored).await?;

        if let Some(notifier) = &self.notifier {
            let handle = dispatch_order_placed(notifier.clone(), stored.clone());
            let mut pending = self.notifications.lock().await;
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }

        Ok(stored)
    }

    /// Waits for every notification dispatched so far.
    pub async fn wait_for_notifications(&self) {
        let pending = std::mem::take(&mut *self.notifications.lock().await);
        for handle in pending {
            if let Err(e) = handle.await {
                warn!(error = %e, "notification task did not finish");
            }
        }
    }

    pub async fn orders_for_account(&self, account: &AccountId) -> Result<Vec<Order>> {
        self.orders.list_orders_by_account(account).await
    }

    async fn lookup(&self, item_id: &str) -> Result<CatalogItem> {
        match timeout(self.catalog_timeout, self.catalog.get_item(item_id)).await {
            Ok(Ok(item)) => {
                debug!(item = item_id, price = %item.price, available = item.available, "catalog item resolved");
                Ok(item)
            }
            Ok(Err(CatalogError::Transport(msg))) => {
                warn!(item = item_id, error = %msg, "catalog unreachable");
                Err(PipelineError::DependencyUnavailable(format!(
                    "catalog lookup for {item_id} failed: {msg}"
                )))
            }
            Ok(Err(e)) => {
                warn!(item = item_id, error = %e, "order rejected: catalog lookup failed");
                Err(PipelineError::ItemRejected {
                    item: item_id.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                warn!(item = item_id, timeout_ms = self.catalog_timeout.as_millis() as u64, "catalog lookup timed out");
                Err(PipelineError::DependencyUnavailable(format!(
                    "catalog lookup for {item_id} timed out"
                )))
            }
        }
    }

    async fn publish_debit(&self, order: &Order) -> Result<()> {
        let payload = DebitEvent::from_order(order).to_bytes()?;
        let key = order.id.to_string();

        let failure = match timeout(
            self.publish_timeout,
            self.publisher.publish(&self.topic, &key, payload),
        )
        .await
        {
            Ok(Ok(())) => {
                debug!(order_id = %order.id, topic = %self.topic, "debit event published");
                return Ok(());
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!(
                "publish timed out after {} ms",
                self.publish_timeout.as_millis()
            ),
        };

        // The order row stays pending with nothing left to pay it.
        error!(order_id = %order.id, account = %order.account, error = %failure, "CRITICAL: failed to publish debit event");
        Err(PipelineError::QueueError(format!(
            "failed to queue order {}: {failure}",
            order.id
        )))
    }
}
