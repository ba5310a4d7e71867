//! Order detail page. Needs a signed-in viewer with a user id; the order
//! service is asked with that id in the identity header.

use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::api::Backend;
use crate::domain::aggregates::OrderId;
use crate::session::{self, SessionStore, UserId};
use crate::ui::{Notification, Ui};
use crate::view::order::{render_order, OrderDetailView, OrderPageView};
use crate::{Result, StorefrontError, LOGIN_ROUTE};

pub struct OrderDetailPage {
    backend: Arc<dyn Backend>,
    ui: Arc<dyn Ui>,
    user: UserId,
    view: Mutex<OrderPageView>,
}

impl OrderDetailPage {
    /// Fails, after notifying and redirecting to the login route, when the
    /// session cannot identify the viewer.
    pub fn open(backend: Arc<dyn Backend>, ui: Arc<dyn Ui>, persistent: &dyn SessionStore, per_tab: &dyn SessionStore) -> Result<Self> {
        match session::resolve_required_user(persistent, per_tab) {
            Ok(user) => Ok(Self { backend, ui, user, view: Mutex::new(OrderPageView::default()) }),
            Err(e) => {
                warn!(error = %e, "order page opened without usable identity");
                let message = match e {
                    StorefrontError::LoginRequired => "Login required.",
                    _ => "Your login information is invalid. Please sign in again.",
                };
                ui.notify(Notification::error(message));
                ui.redirect(LOGIN_ROUTE);
                Err(e)
            }
        }
    }

    pub fn user(&self) -> &UserId { &self.user }

    pub fn view(&self) -> OrderPageView { self.view.lock().unwrap_or_else(|e| e.into_inner()).clone() }

    fn set_view(&self, view: OrderPageView) { *self.view.lock().unwrap_or_else(|e| e.into_inner()) = view; }

    pub async fn load(&self, order_id: OrderId) -> Result<OrderDetailView> {
        self.set_view(OrderPageView { loading: true, error: None, detail: None });
        match self.backend.get_order(&self.user, order_id).await {
            Ok(order) => {
                info!(order_id, items = order.items.len(), "order loaded");
                let detail = render_order(&order);
                self.set_view(OrderPageView { loading: false, error: None, detail: Some(detail.clone()) });
                Ok(detail)
            }
            Err(e) => {
                error!(order_id, error = %e, "order lookup failed");
                let message = match &e {
                    StorefrontError::OrderNotFound => "Order not found.".to_string(),
                    StorefrontError::Status { status, .. } => format!("Failed to load the order ({}).", status),
                    _ => "Failed to load the order.".to_string(),
                };
                self.ui.notify(Notification::error(message.clone()));
                self.set_view(OrderPageView { loading: false, error: Some(message), detail: None });
                Err(e)
            }
        }
    }
}
