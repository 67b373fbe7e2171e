//! End-to-end behaviour of the cart store against in-memory backends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use marketplace_cart::prelude::*;
use marketplace_storage::{KeyValueStore, MemoryStore, StorageError};
use tokio::sync::Notify;

const KEY: &str = "@GoMarketplace:products";

fn product(id: &str) -> Product {
    Product::new(id, format!("Product {}", id), format!("https://img/{}.png", id), 10.0)
}

async fn mount(storage: Arc<dyn KeyValueStore>) -> (CartProvider, CartHandle) {
    let provider = CartProvider::mount(storage, CartStoreConfig::default());
    let cart = use_cart(Some(&provider)).unwrap();
    cart.ready().await.unwrap();
    (provider, cart)
}

/// Backend whose reads or writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::read(key, "permission denied"));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::write(key, "disk full"));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

/// Backend whose writes take a while to resolve.
#[derive(Default)]
struct SlowStore {
    inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

/// Backend whose reads block until released.
struct GatedStore {
    inner: MemoryStore,
    gate: Notify,
}

#[async_trait]
impl KeyValueStore for GatedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.gate.notified().await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

#[tokio::test]
async fn test_add_to_empty_cart_persists_record() {
    let storage = Arc::new(MemoryStore::new());
    let (provider, cart) = mount(storage.clone()).await;

    cart.add_to_cart(Product::new("x", "T", "u", 10.0)).await.unwrap();

    let products = cart.products();
    assert_eq!(products, vec![LineItem::from_product(Product::new("x", "T", "u", 10.0))]);
    assert_eq!(products[0].quantity, 1);

    let record = storage.get(KEY).await.unwrap().unwrap();
    assert_eq!(record, serde_json::to_string(&products).unwrap());

    provider.unmount().await;
}

#[tokio::test]
async fn test_add_existing_increments_without_growing() {
    let (provider, cart) = mount(Arc::new(MemoryStore::new())).await;

    cart.add_to_cart(product("a")).await.unwrap();
    cart.add_to_cart(product("b")).await.unwrap();
    cart.add_to_cart(product("a")).await.unwrap();

    let products = cart.products();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id.as_str(), "a");
    assert_eq!(products[0].quantity, 2);
    assert_eq!(products[1].quantity, 1);

    provider.unmount().await;
}

#[tokio::test]
async fn test_hydrates_from_persisted_record() {
    let storage = Arc::new(MemoryStore::with_entries([(
        KEY,
        r#"[{"id":"a","title":"T","image_url":"u","price":10,"quantity":2}]"#,
    )]));
    let (provider, cart) = mount(storage).await;

    assert_eq!(
        cart.products(),
        vec![LineItem::from_product(Product::new("a", "T", "u", 10.0)).with_quantity(2)]
    );
    assert_eq!(cart.lifecycle(), CartLifecycle::Ready);

    provider.unmount().await;
}

#[tokio::test]
async fn test_decrement_last_unit_empties_record() {
    let storage = Arc::new(MemoryStore::with_entries([(
        KEY,
        r#"[{"id":"x","title":"T","image_url":"u","price":10,"quantity":1}]"#,
    )]));
    let (provider, cart) = mount(storage.clone()).await;

    cart.decrement("x").await.unwrap();

    assert!(cart.products().is_empty());
    assert_eq!(storage.get(KEY).await.unwrap().as_deref(), Some("[]"));

    provider.unmount().await;
}

#[tokio::test]
async fn test_decrement_keeps_other_items() {
    let (provider, cart) = mount(Arc::new(MemoryStore::new())).await;

    cart.add_to_cart(product("a")).await.unwrap();
    cart.add_to_cart(product("b")).await.unwrap();
    cart.increment("b").await.unwrap();
    cart.decrement("b").await.unwrap();

    let products = cart.products();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].quantity, 1);
    assert_eq!(products[1].quantity, 1);

    provider.unmount().await;
}

#[tokio::test]
async fn test_unknown_ids_are_silent_noops() {
    let storage = Arc::new(MemoryStore::new());
    let (provider, cart) = mount(storage.clone()).await;
    cart.add_to_cart(product("a")).await.unwrap();
    let before = cart.products();

    cart.increment("missing").await.unwrap();
    cart.decrement("missing").await.unwrap();

    assert_eq!(cart.products(), before);
    assert_eq!(
        storage.get(KEY).await.unwrap().unwrap(),
        serde_json::to_string(&before).unwrap()
    );

    provider.unmount().await;
}

#[tokio::test]
async fn test_failed_write_leaves_state_unchanged() {
    let storage = Arc::new(FlakyStore::default());
    let (provider, cart) = mount(storage.clone()).await;
    cart.add_to_cart(product("a")).await.unwrap();
    let before = cart.products();

    storage.fail_writes.store(true, Ordering::SeqCst);
    let result = cart.add_to_cart(product("b")).await;
    assert!(matches!(result, Err(CartError::Storage(StorageError::Write { .. }))));
    let result = cart.increment("a").await;
    assert!(matches!(result, Err(CartError::Storage(_))));

    assert_eq!(cart.products(), before);

    // The store keeps working once storage recovers.
    storage.fail_writes.store(false, Ordering::SeqCst);
    cart.increment("a").await.unwrap();
    assert_eq!(cart.products()[0].quantity, 2);

    provider.unmount().await;
}

#[tokio::test]
async fn test_malformed_record_fails_hydration() {
    let storage = Arc::new(MemoryStore::with_entries([(KEY, "{broken")]));
    let provider = CartProvider::mount(storage, CartStoreConfig::default());
    let cart = provider.cart();

    assert!(matches!(cart.ready().await, Err(CartError::HydrationFailed(_))));
    assert!(matches!(cart.lifecycle(), CartLifecycle::Failed(_)));

    let result = cart.add_to_cart(product("a")).await;
    assert!(matches!(result, Err(CartError::HydrationFailed(_))));
    assert!(cart.products().is_empty());

    provider.unmount().await;
}

#[tokio::test]
async fn test_unreadable_storage_fails_hydration() {
    let storage = Arc::new(FlakyStore::default());
    storage.fail_reads.store(true, Ordering::SeqCst);
    let provider = CartProvider::mount(storage.clone(), CartStoreConfig::default());
    let cart = provider.cart();

    let err = cart.ready().await.err().unwrap();
    assert!(err.to_string().contains("permission denied"));

    let result = cart.decrement("a").await;
    assert!(matches!(result, Err(CartError::HydrationFailed(_))));

    provider.unmount().await;
}

#[tokio::test]
async fn test_overlapping_adds_are_not_lost() {
    let storage = Arc::new(SlowStore::default());
    let (provider, cart) = mount(storage.clone()).await;

    let (first, second) = tokio::join!(
        cart.add_to_cart(product("a")),
        cart.add_to_cart(product("a"))
    );
    first.unwrap();
    second.unwrap();

    assert_eq!(cart.products()[0].quantity, 2);
    let persisted: Vec<LineItem> =
        serde_json::from_str(&storage.inner.get(KEY).await.unwrap().unwrap()).unwrap();
    assert_eq!(persisted[0].quantity, 2);

    provider.unmount().await;
}

#[tokio::test]
async fn test_mutations_before_hydration_are_replayed() {
    let storage = Arc::new(GatedStore {
        inner: MemoryStore::with_entries([(
            KEY,
            r#"[{"id":"a","title":"T","image_url":"u","price":10,"quantity":2}]"#,
        )]),
        gate: Notify::new(),
    });
    let provider = CartProvider::mount(storage.clone(), CartStoreConfig::default());
    let cart = provider.cart();

    let early = {
        let cart = cart.clone();
        tokio::spawn(async move { cart.add_to_cart(product("a")).await })
    };
    tokio::task::yield_now().await;
    assert!(!cart.lifecycle().is_settled());

    storage.gate.notify_one();
    early.await.unwrap().unwrap();
    cart.ready().await.unwrap();

    let products = cart.products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].quantity, 3);
    assert_eq!(products[0].title, "T");

    provider.unmount().await;
}

#[tokio::test]
async fn test_subscribers_see_committed_changes() {
    let (provider, cart) = mount(Arc::new(MemoryStore::new())).await;
    let mut views = cart.subscribe();
    views.borrow_and_update();

    cart.add_to_cart(product("a")).await.unwrap();

    views.changed().await.unwrap();
    let view = views.borrow_and_update().clone();
    assert_eq!(view.lifecycle, CartLifecycle::Ready);
    assert_eq!(view.cart.item_count(), 1);
    assert_eq!(cart.summary().subtotal, 10.0);

    provider.unmount().await;
}

#[tokio::test]
async fn test_custom_storage_key() {
    let storage = Arc::new(MemoryStore::new());
    let provider = CartProvider::mount(
        storage.clone(),
        CartStoreConfig::default().with_storage_key("@Test:cart"),
    );
    let cart = provider.cart();
    cart.ready().await.unwrap();

    cart.add_to_cart(product("a")).await.unwrap();

    assert!(storage.get("@Test:cart").await.unwrap().is_some());
    assert_eq!(storage.get(KEY).await.unwrap(), None);

    provider.unmount().await;
}

#[tokio::test]
async fn test_non_finite_price_is_rejected() {
    let storage = Arc::new(MemoryStore::new());
    let (provider, cart) = mount(storage.clone()).await;
    cart.add_to_cart(product("a")).await.unwrap();
    let record = storage.get(KEY).await.unwrap();

    for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let result = cart.add_to_cart(Product::new("x", "T", "u", price)).await;
        assert!(matches!(result, Err(CartError::InvalidPrice { .. })));
    }

    assert_eq!(cart.products().len(), 1);
    assert_eq!(storage.get(KEY).await.unwrap(), record);
    provider.unmount().await;

    // The record still hydrates in a new session.
    let (provider, cart) = mount(storage).await;
    assert_eq!(cart.products()[0].id.as_str(), "a");
    provider.unmount().await;
}
