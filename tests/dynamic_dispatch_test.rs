use bookpay::domain::account::{AccountId, Balance};
use bookpay::domain::ledger::{EntryKind, LedgerEntry};
use bookpay::domain::order::{Order, OrderLine};
use bookpay::domain::ports::{EventPublisherBox, LedgerStoreBox, OrderStoreBox};
use bookpay::infrastructure::broker::InMemoryBroker;
use bookpay::infrastructure::in_memory::{InMemoryLedgerStore, InMemoryOrderStore};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_stores_as_trait_objects() {
    let ledger: LedgerStoreBox = Box::new(InMemoryLedgerStore::new());
    let orders: OrderStoreBox = Box::new(InMemoryOrderStore::new());
    let (publisher, _subscriber) = InMemoryBroker::channel();
    let publisher: EventPublisherBox = Box::new(publisher);

    let account = AccountId::new("1").unwrap();
    let order = Order::pending(
        account.clone(),
        vec![OrderLine {
            item_id: "b1".to_string(),
            quantity: 1,
            unit_price: dec!(12.50),
        }],
    )
    .unwrap();
    let order_id = order.id;

    // Verify Send + Sync by spawning tasks
    let ledger_account = account.clone();
    let ledger_handle = tokio::spawn(async move {
        let tx = ledger.begin(&ledger_account).await.unwrap();
        let next = Balance::new(dec!(100.0));
        tx.commit(
            next,
            LedgerEntry::new(ledger_account.clone(), EntryKind::Credit, dec!(100.0), next),
        )
        .await
        .unwrap();
        ledger.balance(&ledger_account).await.unwrap()
    });

    let order_handle = tokio::spawn(async move {
        orders.create_order(order).await.unwrap();
        orders.get_order(order_id).await.unwrap().unwrap()
    });

    let publish_handle =
        tokio::spawn(async move { publisher.publish("transaction_created", "k", b"{}".to_vec()).await });

    assert_eq!(ledger_handle.await.unwrap(), Balance::new(dec!(100.0)));
    assert_eq!(order_handle.await.unwrap().account, account);
    assert!(publish_handle.await.unwrap().is_ok());
}
