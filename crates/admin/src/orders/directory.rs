//! Order directory.
//!
//! Holds the orders visible to the signed-in user and the single order open
//! in the detail view. Fetching requires a session token; without one the
//! backend is never called.

use std::sync::Arc;

use bloom_core::{Order, OrderId};
use bloom_storefront::api::OrderBackend;
use bloom_storefront::{Notice, Notifier, Session};

use super::detail::reduce_order;
use super::types::{OrderDetailView, OrderRow};
use crate::error::{DirectoryError, FailureKind};
use crate::format::DisplayFormat;

const MSG_NOT_SIGNED_IN: &str = "You must be logged in to view orders";
const MSG_SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
const MSG_LOAD_FAILED: &str = "Failed to load orders";

/// Outcome of the most recent fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// No fetch has completed yet.
    #[default]
    NotLoaded,
    /// The held list is from the last fetch.
    Loaded,
    /// The last fetch failed; the held list is from an earlier one, if any.
    Failed(FailureKind),
}

/// Order directory.
pub struct OrderDirectory<B> {
    backend: B,
    session: Session,
    notifier: Arc<dyn Notifier>,
    format: DisplayFormat,
    orders: Vec<Order>,
    status: LoadStatus,
    active: Option<Order>,
}

impl<B: OrderBackend> OrderDirectory<B> {
    /// Create an empty directory.
    #[must_use]
    pub fn new(
        backend: B,
        session: Session,
        notifier: Arc<dyn Notifier>,
        format: DisplayFormat,
    ) -> Self {
        Self {
            backend,
            session,
            notifier,
            format,
            orders: Vec::new(),
            status: LoadStatus::NotLoaded,
            active: None,
        }
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch the order list, replacing the held list on success.
    ///
    /// On failure the held list is left as it was and one error notice is
    /// emitted. A rejected token also ends the session, clearing it from the
    /// credential store.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Unauthenticated` without calling the backend
    /// if no session token is held, `DirectoryError::AuthorizationExpired` if
    /// the backend rejects the token, and `MalformedResponse`/`Network` for
    /// other failures.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&mut self) -> Result<&[Order], DirectoryError> {
        let Some(token) = self.session.token() else {
            return Err(self.fail(DirectoryError::Unauthenticated));
        };

        match self.backend.list_orders(&token).await {
            Ok(orders) => {
                tracing::info!(count = orders.len(), "orders loaded");
                self.orders = orders;
                self.status = LoadStatus::Loaded;
                Ok(&self.orders)
            }
            Err(e) => Err(self.fail(DirectoryError::from_api(e))),
        }
    }

    fn fail(&mut self, err: DirectoryError) -> DirectoryError {
        self.status = LoadStatus::Failed(err.kind());
        if matches!(err, DirectoryError::AuthorizationExpired(_))
            && let Err(e) = self.session.expire()
        {
            tracing::warn!(error = %e, "could not remove expired session token");
        }
        let message = match &err {
            DirectoryError::Unauthenticated => MSG_NOT_SIGNED_IN.to_string(),
            DirectoryError::AuthorizationExpired(_) => MSG_SESSION_EXPIRED.to_string(),
            DirectoryError::MalformedResponse(_) => MSG_LOAD_FAILED.to_string(),
            DirectoryError::Network(api) => api
                .server_message()
                .map_or_else(|| MSG_LOAD_FAILED.to_string(), ToOwned::to_owned),
        };
        tracing::error!(error = %err, "failed to load orders");
        self.notifier.notify(Notice::error(message));
        err
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Open `order` in the detail view, replacing any open order.
    pub fn select_order(&mut self, order: Order) {
        self.active = Some(order);
    }

    /// Close the detail view.
    pub fn clear_selection(&mut self) {
        self.active = None;
    }

    /// Open the held order with `order_id`. Returns `false` if no held order
    /// has that id; the selection is then unchanged.
    pub fn select_by_id(&mut self, order_id: &OrderId) -> bool {
        match self.find(order_id).cloned() {
            Some(order) => {
                self.select_order(order);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Held orders, in backend order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    /// Look up a held order by id.
    #[must_use]
    pub fn find(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.order_id == order_id)
    }

    /// The order open in the detail view.
    #[must_use]
    pub const fn active(&self) -> Option<&Order> {
        self.active.as_ref()
    }

    /// Detail view of the open order.
    #[must_use]
    pub fn active_detail(&self) -> Option<OrderDetailView> {
        self.active
            .as_ref()
            .map(|order| reduce_order(order, &self.format))
    }

    /// Table rows for the held orders.
    #[must_use]
    pub fn rows(&self) -> Vec<OrderRow> {
        self.orders
            .iter()
            .map(|order| OrderRow::from_order(order, &self.format))
            .collect()
    }

    /// Display settings used for rows and detail views.
    #[must_use]
    pub const fn format(&self) -> &DisplayFormat {
        &self.format
    }
}

impl<B> std::fmt::Debug for OrderDirectory<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderDirectory")
            .field("orders", &self.orders.len())
            .field("status", &self.status)
            .field("active", &self.active.as_ref().map(|o| o.order_id.as_str()))
            .finish_non_exhaustive()
    }
}
