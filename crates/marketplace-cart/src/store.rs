//! The cart store actor.
//!
//! A single task owns the authoritative [`Cart`]. It hydrates the cart from
//! storage once, then applies mutations one at a time in arrival order: each
//! mutation is computed against the latest committed cart, written to
//! storage, and only then committed and published to consumers. Mutations
//! sent while hydration is still running wait in the queue and are applied
//! afterwards.

use std::sync::Arc;

use marketplace_storage::{KeyValueStore, TypedStore};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cart::{Cart, CartSummary, Decrement, LineItem, Product};
use crate::config::CartStoreConfig;
use crate::error::CartError;
use crate::ids::ProductId;

/// Lifecycle of a cart store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CartLifecycle {
    /// Created, hydration not started.
    #[default]
    Uninitialized,
    /// Reading the persisted record.
    Hydrating,
    /// Hydrated; mutations are applied.
    Ready,
    /// Hydration failed; mutations are rejected.
    Failed(String),
}

impl CartLifecycle {
    /// Whether hydration has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed(_))
    }
}

/// Snapshot published to consumers after every committed change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartView {
    /// Store lifecycle at the time of the snapshot.
    pub lifecycle: CartLifecycle,
    /// Committed cart contents.
    pub cart: Cart,
}

type Reply = oneshot::Sender<Result<(), CartError>>;

/// Commands to the store task
#[derive(Debug)]
enum CartCommand {
    Add { product: Product, reply: Reply },
    Increment { id: ProductId, reply: Reply },
    Decrement { id: ProductId, reply: Reply },
    Shutdown,
}

/// Handle to a running cart store.
///
/// Cheap to clone. Reads come from the last published [`CartView`]; writes
/// are queued to the store task and resolve once committed.
#[derive(Clone)]
pub struct CartHandle {
    cmd_tx: mpsc::Sender<CartCommand>,
    view_rx: watch::Receiver<CartView>,
}

impl CartHandle {
    /// Add a product, or bump its quantity if already present.
    pub async fn add_to_cart(&self, product: Product) -> Result<(), CartError> {
        self.request(|reply| CartCommand::Add { product, reply })
            .await
    }

    /// Increase an item's quantity. Unknown ids are ignored.
    pub async fn increment(&self, id: impl Into<ProductId>) -> Result<(), CartError> {
        let id = id.into();
        self.request(|reply| CartCommand::Increment { id, reply })
            .await
    }

    /// Decrease an item's quantity, removing it at zero. Unknown ids are ignored.
    pub async fn decrement(&self, id: impl Into<ProductId>) -> Result<(), CartError> {
        let id = id.into();
        self.request(|reply| CartCommand::Decrement { id, reply })
            .await
    }

    async fn request<F>(&self, make: F) -> Result<(), CartError>
    where
        F: FnOnce(Reply) -> CartCommand,
    {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(reply))
            .await
            .map_err(|_| CartError::StoreClosed)?;
        rx.await.map_err(|_| CartError::StoreClosed)?
    }

    /// Current line items.
    pub fn products(&self) -> Vec<LineItem> {
        self.view_rx.borrow().cart.items().to_vec()
    }

    /// Current cart.
    pub fn cart(&self) -> Cart {
        self.view_rx.borrow().cart.clone()
    }

    /// Current totals.
    pub fn summary(&self) -> CartSummary {
        self.view_rx.borrow().cart.summary()
    }

    /// Current lifecycle.
    pub fn lifecycle(&self) -> CartLifecycle {
        self.view_rx.borrow().lifecycle.clone()
    }

    /// Watch every committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.view_rx.clone()
    }

    /// Wait until hydration has finished.
    ///
    /// Returns `CartError::HydrationFailed` if the persisted record could not
    /// be loaded.
    pub async fn ready(&self) -> Result<(), CartError> {
        let mut rx = self.view_rx.clone();
        let view = rx
            .wait_for(|view| view.lifecycle.is_settled())
            .await
            .map_err(|_| CartError::StoreClosed)?;

        match &view.lifecycle {
            CartLifecycle::Failed(reason) => Err(CartError::HydrationFailed(reason.clone())),
            _ => Ok(()),
        }
    }

    /// Ask the store task to stop after the mutations already queued.
    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(CartCommand::Shutdown).await;
    }

    /// Whether the store task is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.cmd_tx.is_closed()
    }
}

/// The store task state.
pub struct CartStore {
    storage: TypedStore<dyn KeyValueStore>,
    key: String,
    cart: Cart,
    lifecycle: CartLifecycle,
    cmd_rx: mpsc::Receiver<CartCommand>,
    view_tx: watch::Sender<CartView>,
}

impl CartStore {
    /// Spawn the store task and return a handle to it.
    ///
    /// Hydration starts immediately. Must be called inside a tokio runtime.
    pub fn spawn(
        storage: Arc<dyn KeyValueStore>,
        config: CartStoreConfig,
    ) -> (CartHandle, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(config.channel_capacity.max(1));
        let (view_tx, view_rx) = watch::channel(CartView::default());

        let store = Self {
            storage: TypedStore::new(storage),
            key: config.storage_key,
            cart: Cart::new(),
            lifecycle: CartLifecycle::Uninitialized,
            cmd_rx,
            view_tx,
        };

        let task = tokio::spawn(store.run());

        (CartHandle { cmd_tx, view_rx }, task)
    }

    /// Main loop for the store task
    async fn run(mut self) {
        self.hydrate().await;

        while let Some(cmd) = self.cmd_rx.recv().await {
            let (result, reply) = match cmd {
                CartCommand::Shutdown => break,
                CartCommand::Add { product, reply } => (self.add(product).await, reply),
                CartCommand::Increment { id, reply } => (self.increment(&id).await, reply),
                CartCommand::Decrement { id, reply } => (self.decrement(&id).await, reply),
            };
            // The caller may have stopped waiting; the mutation still stands.
            let _ = reply.send(result);
        }

        debug!(key = %self.key, "cart store stopped");
    }

    async fn hydrate(&mut self) {
        self.set_lifecycle(CartLifecycle::Hydrating);

        match self.storage.get::<Vec<LineItem>>(&self.key).await {
            Ok(Some(items)) => {
                let (cart, adjusted) = Cart::from_items(items);
                if adjusted > 0 {
                    warn!(
                        key = %self.key,
                        adjusted,
                        "dropped or merged invalid entries in persisted cart"
                    );
                }
                info!(key = %self.key, items = cart.len(), "hydrated cart from storage");
                self.cart = cart;
            }
            Ok(None) => {
                info!(key = %self.key, "no persisted cart, starting empty");
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "cart hydration failed");
                self.set_lifecycle(CartLifecycle::Failed(e.to_string()));
                return;
            }
        }

        self.set_lifecycle(CartLifecycle::Ready);
    }

    async fn add(&mut self, product: Product) -> Result<(), CartError> {
        self.ensure_ready()?;

        let id = product.id.clone();
        if !product.price.is_finite() {
            // JSON has no encoding for these; the record would not load back.
            warn!(id = %id, price = product.price, "rejected product with non-finite price");
            return Err(CartError::InvalidPrice {
                id: id.into_inner(),
                price: product.price,
            });
        }

        let mut next = self.cart.clone();
        let quantity = next.add_item(product);

        self.commit(next).await?;
        debug!(id = %id, quantity, "added to cart");
        Ok(())
    }

    async fn increment(&mut self, id: &ProductId) -> Result<(), CartError> {
        self.ensure_ready()?;

        let mut next = self.cart.clone();
        let Some(quantity) = next.increment(id) else {
            debug!(id = %id, "increment ignored, item not in cart");
            return Ok(());
        };

        self.commit(next).await?;
        debug!(id = %id, quantity, "incremented cart item");
        Ok(())
    }

    async fn decrement(&mut self, id: &ProductId) -> Result<(), CartError> {
        self.ensure_ready()?;

        let mut next = self.cart.clone();
        let outcome = next.decrement(id);
        if outcome == Decrement::NotFound {
            debug!(id = %id, "decrement ignored, item not in cart");
            return Ok(());
        }

        self.commit(next).await?;
        match outcome {
            Decrement::Removed => debug!(id = %id, "removed from cart"),
            Decrement::Decremented(quantity) => debug!(id = %id, quantity, "decremented cart item"),
            Decrement::NotFound => {}
        }
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), CartError> {
        match &self.lifecycle {
            CartLifecycle::Failed(reason) => Err(CartError::HydrationFailed(reason.clone())),
            _ => Ok(()),
        }
    }

    /// Persist `next`, then make it the committed cart.
    ///
    /// On a storage failure the committed cart is left untouched.
    async fn commit(&mut self, next: Cart) -> Result<(), CartError> {
        if let Err(e) = self.storage.set(&self.key, &next).await {
            warn!(key = %self.key, error = %e, "failed to persist cart, mutation dropped");
            return Err(e.into());
        }

        self.cart = next;
        self.publish();
        Ok(())
    }

    fn set_lifecycle(&mut self, lifecycle: CartLifecycle) {
        self.lifecycle = lifecycle;
        self.publish();
    }

    fn publish(&self) {
        // send_replace keeps the value current even with no receivers left.
        self.view_tx.send_replace(CartView {
            lifecycle: self.lifecycle.clone(),
            cart: self.cart.clone(),
        });
    }
}
