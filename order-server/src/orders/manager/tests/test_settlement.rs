use super::*;
use crate::db::repository::payment;
use crate::orders::traits::Settlement;
use async_trait::async_trait;
use shared::models::{PaymentMethod, PaymentStatus};

struct RefusingGateway;

#[async_trait]
impl SettlementGateway for RefusingGateway {
    async fn settle(&self, _order_id: i64, _amount: Decimal, _method: PaymentMethod) -> Settlement {
        Settlement::Failed {
            reason: "card declined".to_string(),
        }
    }
}

#[tokio::test]
async fn settlement_advances_pending_to_processing() {
    let (manager, pool) = test_manager().await;
    let order = pending_order(&manager, &pool, 7).await;

    let paid = manager
        .pay(order.id, PaymentMethod::CreditCard, &Actor::customer(7))
        .await
        .unwrap();
    assert_eq!(paid.status, OrderStatus::Processing);

    let attempts = payment::for_order(&pool, order.id).await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].status, PaymentStatus::Completed);
    assert_eq!(attempts[0].amount, order.total);
    assert!(attempts[0].transaction_id.is_some());
}

#[tokio::test]
async fn refused_settlement_leaves_order_pending() {
    let (manager, pool) = test_manager().await;
    let order = pending_order(&manager, &pool, 7).await;
    let manager = manager_with_gateway(pool.clone(), Arc::new(RefusingGateway));

    let err = manager
        .pay(order.id, PaymentMethod::Paypal, &Actor::customer(7))
        .await
        .unwrap_err();
    assert!(matches!(err, ManagerError::SettlementFailed(_)));

    let order = manager
        .get_order(order.id, &Actor::customer(7))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    let attempts = payment::for_order(&pool, order.id).await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].status, PaymentStatus::Failed);
    assert!(attempts[0].transaction_id.is_none());
}

#[tokio::test]
async fn settled_orders_cannot_be_paid_twice() {
    let (manager, pool) = test_manager().await;
    let order = pending_order(&manager, &pool, 7).await;
    manager
        .pay(order.id, PaymentMethod::CreditCard, &Actor::customer(7))
        .await
        .unwrap();

    let err = manager
        .pay(order.id, PaymentMethod::CreditCard, &Actor::customer(7))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ManagerError::InvalidTransition {
            from: OrderStatus::Processing,
            to: OrderStatus::Processing,
        }
    ));
}

#[tokio::test]
async fn only_the_owner_can_pay() {
    let (manager, pool) = test_manager().await;
    let order = pending_order(&manager, &pool, 7).await;

    for actor in [Actor::customer(8), Actor::staff(1)] {
        let err = manager
            .pay(order.id, PaymentMethod::CreditCard, &actor)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::Forbidden));
    }
}
