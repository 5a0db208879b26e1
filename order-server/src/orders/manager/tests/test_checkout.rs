use super::*;

// ========================================================================
// Happy path
// ========================================================================

#[tokio::test]
async fn checkout_totals_and_snapshots_prices() {
    let (manager, pool) = test_manager().await;
    let mug = seed_product(&pool, "Mug", "4.50", 10).await;
    let kettle = seed_product(&pool, "Kettle", "29.99", 3).await;
    fill_cart(&pool, 7, &[(mug, 2), (kettle, 1)]).await;

    let order = manager.checkout(7, ship_to("1 High Street")).await.unwrap();

    assert_eq!(order.customer_id, 7);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.shipping_address, "1 High Street");
    // 2 * 4.50 + 1 * 29.99
    assert_eq!(order.total, "38.99".parse::<Decimal>().unwrap());

    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].product_id, mug);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.items[0].unit_price, "4.50".parse::<Decimal>().unwrap());
    assert_eq!(order.items[1].product_id, kettle);
    assert_eq!(order.items[1].position, 1);
}

#[tokio::test]
async fn checkout_decrements_stock_and_clears_cart() {
    let (manager, pool) = test_manager().await;
    let mug = seed_product(&pool, "Mug", "4.50", 10).await;
    fill_cart(&pool, 7, &[(mug, 4)]).await;

    manager.checkout(7, ship_to("1 High Street")).await.unwrap();

    assert_eq!(stock_of(&pool, mug).await, 6);
    assert!(cart::items_for_customer(&pool, 7).await.unwrap().is_empty());
}

#[tokio::test]
async fn checkout_broadcasts_order_created() {
    let (manager, pool) = test_manager().await;
    let mug = seed_product(&pool, "Mug", "4.50", 10).await;
    fill_cart(&pool, 7, &[(mug, 1)]).await;
    let mut rx = manager.subscribe();

    let order = manager.checkout(7, ship_to("1 High Street")).await.unwrap();

    match rx.try_recv().unwrap() {
        LifecycleEvent::OrderCreated {
            order_id,
            customer_id,
            total,
        } => {
            assert_eq!(order_id, order.id);
            assert_eq!(customer_id, 7);
            assert_eq!(total, order.total);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

// ========================================================================
// Rejections and rollback
// ========================================================================

#[tokio::test]
async fn checkout_with_empty_cart_is_rejected() {
    let (manager, _pool) = test_manager().await;
    let err = manager
        .checkout(7, ship_to("1 High Street"))
        .await
        .unwrap_err();
    assert!(matches!(err, ManagerError::EmptyCart));
}

#[tokio::test]
async fn checkout_shortfall_rolls_back_earlier_reservations() {
    let (manager, pool) = test_manager().await;
    let mug = seed_product(&pool, "Mug", "4.50", 10).await;
    let kettle = seed_product(&pool, "Kettle", "29.99", 1).await;
    // Second line asks for more than is available
    fill_cart(&pool, 7, &[(mug, 2), (kettle, 5)]).await;

    let err = manager
        .checkout(7, ship_to("1 High Street"))
        .await
        .unwrap_err();
    assert!(matches!(err, ManagerError::InsufficientStock(p) if p == kettle));

    // Mug's reservation was compensated, nothing persisted, cart intact
    assert_eq!(stock_of(&pool, mug).await, 10);
    assert_eq!(stock_of(&pool, kettle).await, 1);
    assert!(manager.list_orders(7).await.unwrap().is_empty());
    assert_eq!(cart::items_for_customer(&pool, 7).await.unwrap().len(), 2);
}

#[tokio::test]
async fn persistence_fault_releases_every_reservation() {
    let (manager, pool) = test_manager().await;
    let mug = seed_product(&pool, "Mug", "4.50", 10).await;
    let kettle = seed_product(&pool, "Kettle", "29.99", 5).await;
    fill_cart(&pool, 7, &[(mug, 2), (kettle, 1)]).await;

    // Reservations and price snapshots succeed; persisting the aggregate
    // cannot.
    sqlx::query("DROP TABLE order_items")
        .execute(&pool)
        .await
        .unwrap();

    let err = manager
        .checkout(7, ship_to("1 High Street"))
        .await
        .unwrap_err();
    assert!(matches!(err, ManagerError::Storage(_)));

    // Every reserved unit came back and nothing was persisted
    assert_eq!(stock_of(&pool, mug).await, 10);
    assert_eq!(stock_of(&pool, kettle).await, 5);
    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orders, 0);
    assert_eq!(cart::items_for_customer(&pool, 7).await.unwrap().len(), 2);
}

#[tokio::test]
async fn checkout_failure_emits_no_events() {
    let (manager, pool) = test_manager().await;
    let mug = seed_product(&pool, "Mug", "4.50", 1).await;
    fill_cart(&pool, 7, &[(mug, 2)]).await;
    let mut rx = manager.subscribe();

    manager
        .checkout(7, ship_to("1 High Street"))
        .await
        .unwrap_err();

    assert!(rx.try_recv().is_err());
}

// ========================================================================
// Price immutability
// ========================================================================

#[tokio::test]
async fn later_price_change_does_not_touch_existing_orders() {
    let (manager, pool) = test_manager().await;
    let mug = seed_product(&pool, "Mug", "4.50", 10).await;
    fill_cart(&pool, 7, &[(mug, 2)]).await;
    let order = manager.checkout(7, ship_to("1 High Street")).await.unwrap();

    product::set_price(&pool, mug, "99.00".parse().unwrap())
        .await
        .unwrap();

    let reread = manager
        .get_order(order.id, &Actor::customer(7))
        .await
        .unwrap();
    assert_eq!(reread.total, "9.00".parse::<Decimal>().unwrap());
    assert_eq!(
        reread.items[0].unit_price,
        "4.50".parse::<Decimal>().unwrap()
    );
}
