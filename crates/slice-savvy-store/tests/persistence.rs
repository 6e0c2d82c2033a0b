//! Reopen and migration behaviour against a real `RocksDB` directory.

#![cfg(feature = "rocksdb-backend")]

mod common;

use chrono::NaiveDate;
use serde_json::json;

use common::TestHarness;
use slice_savvy_core::{CustomerId, MembershipTier, MenuItemDraft};
use slice_savvy_store::keys::{MENU_ITEMS_KEY, STORE_STATE_KEY};
use slice_savvy_store::{migrations, Storage, CURRENT_VERSION};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

#[tokio::test]
async fn customer_edits_survive_reopen() {
    let harness = TestHarness::new();
    let id = CustomerId::new("2").unwrap();

    {
        let dashboard = harness.dashboard();
        let mut customer = dashboard.store.get_customer_by_id(&id).await.unwrap().unwrap();
        customer.membership_tier = MembershipTier::Gold;
        customer.loyalty_points = 900;
        dashboard.store.update_customer(customer).await.unwrap();
        dashboard
            .store
            .delete_customer(&CustomerId::new("6").unwrap())
            .await
            .unwrap();
        dashboard.close().await.unwrap();
    }

    let dashboard = harness.dashboard();
    let customer = dashboard.store.get_customer_by_id(&id).await.unwrap().unwrap();
    assert_eq!(customer.membership_tier, MembershipTier::Gold);
    assert_eq!(customer.loyalty_points, 900);
    assert!(dashboard
        .store
        .get_customer_by_id(&CustomerId::new("6").unwrap())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn refreshed_analytics_survive_reopen() {
    let harness = TestHarness::new();

    let snapshot = {
        let dashboard = harness.dashboard();
        let snapshot = dashboard.store.refresh_analytics(None, day(13)).await.unwrap();
        dashboard.close().await.unwrap();
        snapshot
    };

    let dashboard = harness.dashboard();
    assert_eq!(dashboard.store.select(|s| s.analytics.clone()).await, snapshot);
}

#[tokio::test]
async fn menu_changes_survive_reopen() {
    let harness = TestHarness::new();

    let created = {
        let dashboard = harness.dashboard();
        let created = dashboard
            .menu
            .create(MenuItemDraft {
                name: "Spicy Honey".into(),
                category: "Specialty".into(),
                price_cents: 1899,
                description: "Soppressata with hot honey.".into(),
                ingredients: vec!["Soppressata".into(), "Hot honey".into()],
                is_popular: true,
            })
            .unwrap();
        dashboard.close().await.unwrap();
        created
    };

    let dashboard = harness.dashboard();
    let items = dashboard.menu.load().unwrap();
    assert_eq!(items.len(), TestHarness::seed().menu_items.len() + 1);
    assert_eq!(dashboard.menu.get(&created.id).unwrap(), Some(created));
}

#[tokio::test]
async fn legacy_record_is_migrated_and_written_back() {
    let harness = TestHarness::new();

    {
        let storage = harness.storage();
        let legacy = json!({
            "version": 0,
            "state": {
                "customers": [{
                    "id": "c-1",
                    "name": "Grace Hopper",
                    "email": "grace@example.com",
                    "membershipTier": "Platinum",
                    "joinDate": "2021-12-09"
                }],
                "orders": [{
                    "orderId": "legacy-1",
                    "customer": "Grace Hopper",
                    "customerEmail": "grace@example.com",
                    "pizzaType": "Margherita",
                    "quantity": 3,
                    "totalCents": 3897,
                    "orderDate": "2024-05-20T19:30:00",
                    "status": "Delivered"
                }],
                "analytics": {
                    "totalRevenueCents": 3897,
                    "totalOrders": 1,
                    "averageOrderValueCents": 3897,
                    "customerCount": 1
                }
            }
        });
        storage
            .set(STORE_STATE_KEY, &serde_json::to_vec(&legacy).unwrap())
            .unwrap();
        storage.flush().unwrap();
    }

    {
        let dashboard = harness.dashboard();
        let orders = dashboard
            .store
            .get_customer_orders(&CustomerId::new("c-1").unwrap())
            .await
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].product_name, "Margherita");

        let analytics = dashboard.store.select(|s| s.analytics.clone()).await;
        assert_eq!(analytics.total_revenue_cents, 3897);
        assert_eq!(analytics.pizza_sales_distribution.get("Margherita"), Some(&100.0));
        let last = analytics.monthly_revenue.last().unwrap();
        assert_eq!((last.year, last.month), (2024, 5));
    }

    let storage = harness.storage();
    let bytes = storage.get(STORE_STATE_KEY).unwrap().unwrap();
    assert_eq!(migrations::decode(&bytes).unwrap().version(), CURRENT_VERSION);
}

#[tokio::test]
async fn unreadable_records_fall_back_to_seed() {
    let harness = TestHarness::new();

    {
        let storage = harness.storage();
        storage.set(STORE_STATE_KEY, b"\x00\x01garbage").unwrap();
        storage.set(MENU_ITEMS_KEY, b"{}").unwrap();
        storage.flush().unwrap();
    }

    let dashboard = harness.dashboard();
    let seed = TestHarness::seed();
    assert_eq!(dashboard.store.snapshot().await.orders, seed.orders);
    assert_eq!(dashboard.menu.load().unwrap(), seed.menu_items);

    let report = dashboard.report(None, day(13)).await.unwrap();
    assert_eq!(report.summary.total_orders, seed.orders.len() as u64);
}
