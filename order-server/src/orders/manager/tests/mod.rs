use super::*;
use crate::db::DbService;
use crate::db::repository::{cart, product};
use crate::services::{DbCartSource, MockSettlementGateway};
use rust_decimal::Decimal;
use shared::models::product::ProductCreate;

mod test_checkout;
mod test_settlement;

async fn test_manager() -> (OrderManager, SqlitePool) {
    let db = DbService::open_in_memory().await.unwrap();
    let pool = db.pool.clone();
    let manager = OrderManager::new(
        pool.clone(),
        Arc::new(DbCartSource::new(pool.clone())),
        Arc::new(MockSettlementGateway),
    );
    (manager, pool)
}

fn manager_with_gateway(pool: SqlitePool, gateway: Arc<dyn SettlementGateway>) -> OrderManager {
    OrderManager::new(pool.clone(), Arc::new(DbCartSource::new(pool)), gateway)
}

async fn seed_product(pool: &SqlitePool, name: &str, unit_price: &str, stock: i32) -> i64 {
    product::create(
        pool,
        ProductCreate {
            name: name.to_string(),
            unit_price: unit_price.parse::<Decimal>().unwrap(),
            stock,
        },
    )
    .await
    .unwrap()
    .id
}

async fn fill_cart(pool: &SqlitePool, customer_id: i64, lines: &[(i64, i32)]) {
    for &(product_id, quantity) in lines {
        cart::add_item(pool, customer_id, product_id, quantity)
            .await
            .unwrap();
    }
}

fn ship_to(address: &str) -> CheckoutRequest {
    CheckoutRequest {
        shipping_address: address.to_string(),
    }
}

async fn stock_of(pool: &SqlitePool, product_id: i64) -> i32 {
    product::find_by_id(pool, product_id)
        .await
        .unwrap()
        .unwrap()
        .stock
}

/// Drive a fresh order into `Pending` for transition tests
async fn pending_order(manager: &OrderManager, pool: &SqlitePool, customer_id: i64) -> Order {
    let product_id = seed_product(pool, "Fixture", "10.00", 50).await;
    fill_cart(pool, customer_id, &[(product_id, 2)]).await;
    manager
        .checkout(customer_id, ship_to("1 Fixture Lane"))
        .await
        .unwrap()
}
