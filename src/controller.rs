//! Catalog page controller.
//!
//! Owns the page state for one page load and wires the viewer's actions to
//! the backend. Each action checks the policy table before building a
//! request, reports every failure through [`Ui::notify`], and refreshes the
//! whole catalog after a successful product change. Cart and favorite state
//! stay on the server.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info, warn};

use crate::api::Backend;
use crate::domain::aggregates::{BookmarkRequest, CartItemRequest, Product, ProductId};
use crate::domain::events::CatalogAction;
use crate::domain::value_objects::CategoryFilter;
use crate::form::ProductForm;
use crate::policy::{self, Capability};
use crate::session::{self, SessionStore, UserId, Viewer};
use crate::state::CatalogState;
use crate::ui::{Notification, Ui};
use crate::view::catalog::{CatalogView, DeletePrompt, DELETE_QUESTION};
use crate::view::detail::{find_detail, ProductDetail};
use crate::{Result, StorefrontError, LOGIN_ROUTE};

/// Identifies an action for duplicate suppression while its request is out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum ActionKey {
    Save(Option<ProductId>),
    Delete(ProductId),
    Cart(ProductId),
    Favorite(ProductId),
}

/// Holds a key in the in-flight set until dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<ActionKey>>,
    key: ActionKey,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) { lock(self.set).remove(&self.key); }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> { m.lock().unwrap_or_else(|e| e.into_inner()) }

pub struct CatalogController {
    backend: Arc<dyn Backend>,
    ui: Arc<dyn Ui>,
    state: Mutex<CatalogState>,
    form: Mutex<Option<ProductForm>>,
    detail: Mutex<Option<ProductDetail>>,
    delete_prompt: Mutex<Option<DeletePrompt>>,
    in_flight: Mutex<HashSet<ActionKey>>,
}

impl CatalogController {
    pub fn new(backend: Arc<dyn Backend>, ui: Arc<dyn Ui>, viewer: Viewer) -> Self {
        Self::with_state(backend, ui, CatalogState::new(viewer))
    }

    pub fn with_state(backend: Arc<dyn Backend>, ui: Arc<dyn Ui>, state: CatalogState) -> Self {
        Self {
            backend,
            ui,
            state: Mutex::new(state),
            form: Mutex::new(None),
            detail: Mutex::new(None),
            delete_prompt: Mutex::new(None),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Page load: resolve the viewer once from the session. The catalog is
    /// not fetched until [`load_products`](Self::load_products).
    pub fn open(backend: Arc<dyn Backend>, ui: Arc<dyn Ui>, session: &dyn SessionStore) -> Self {
        let viewer = session::resolve_viewer(session);
        info!(role = ?viewer.role, "catalog page opened");
        Self::new(backend, ui, viewer)
    }

    pub fn viewer(&self) -> Viewer { lock(&self.state).viewer().clone() }
    pub fn view(&self) -> CatalogView { lock(&self.state).view() }
    pub fn state(&self) -> CatalogState { lock(&self.state).clone() }
    pub fn form(&self) -> Option<ProductForm> { lock(&self.form).clone() }
    pub fn detail(&self) -> Option<ProductDetail> { lock(&self.detail).clone() }
    pub fn close_form(&self) { lock(&self.form).take(); }
    pub fn close_detail(&self) { lock(&self.detail).take(); }
    pub fn delete_prompt(&self) -> Option<DeletePrompt> { lock(&self.delete_prompt).clone() }

    fn dispatch(&self, action: CatalogAction) -> CatalogView {
        let mut state = lock(&self.state);
        state.apply(action);
        state.view()
    }

    /// Fetches the full catalog. On failure the previous catalog stays as it was.
    pub async fn load_products(&self) -> Result<()> {
        match self.backend.list_products().await {
            Ok(products) => {
                info!(count = products.len(), "catalog loaded");
                self.dispatch(CatalogAction::CatalogLoaded(products));
                Ok(())
            }
            Err(e) => Err(self.report(e, "Failed to load the product list.")),
        }
    }

    pub fn set_category(&self, filter: CategoryFilter) -> CatalogView { self.dispatch(CatalogAction::CategoryChanged(filter)) }
    pub fn set_search(&self, term: impl Into<String>) -> CatalogView { self.dispatch(CatalogAction::SearchChanged(term.into())) }
    pub fn go_to_page(&self, page: usize) -> CatalogView { self.dispatch(CatalogAction::PageSelected(page)) }

    /// Opens the detail view for a product already in the cache.
    pub fn show_detail(&self, id: ProductId) -> Result<ProductDetail> {
        let found = find_detail(lock(&self.state).catalog(), id);
        match found {
            Ok(detail) => {
                *lock(&self.detail) = Some(detail.clone());
                Ok(detail)
            }
            Err(e) => {
                warn!(product_id = id, "detail requested for unknown product");
                self.ui.notify(Notification::error("Product information could not be found."));
                Err(e)
            }
        }
    }

    pub fn open_create_form(&self) -> Result<()> {
        self.authorize(Capability::CreateProduct)?;
        *lock(&self.form) = Some(ProductForm::blank());
        Ok(())
    }

    /// Loads the current product from the service before opening the form.
    pub async fn open_edit_form(&self, id: ProductId) -> Result<()> {
        self.authorize(Capability::EditProduct)?;
        match self.backend.get_product(id).await {
            Ok(product) => {
                *lock(&self.form) = Some(ProductForm::from_product(&product));
                Ok(())
            }
            Err(e) => Err(self.report(e, "Failed to load product information.")),
        }
    }

    /// Creates when the form has no id, updates otherwise. The form stays open
    /// on any failure and closes on success.
    pub async fn save_product(&self, form: ProductForm) -> Result<()> {
        let capability = if form.is_update() { Capability::EditProduct } else { Capability::CreateProduct };
        self.authorize(capability)?;
        *lock(&self.form) = Some(form.clone());
        let payload = form.to_payload().map_err(|e| self.report(e, "Please check the product form."))?;
        let _guard = self.begin(ActionKey::Save(form.id)).map_err(|e| self.report(e, ""))?;
        let sent = match form.id {
            Some(id) => self.backend.update_product(id, &payload).await,
            None => self.backend.create_product(&payload).await,
        };
        sent.map_err(|e| self.report(e, "Failed to save the product."))?;
        info!(product_id = ?form.id, name = %payload.name, "product saved");
        self.close_form();
        let _ = self.load_products().await;
        self.ui.notify(Notification::success("Saved."));
        Ok(())
    }

    /// Opens the confirmation step for a cached product. Nothing is sent.
    pub fn prompt_delete(&self, id: ProductId) -> Result<DeletePrompt> {
        self.authorize(Capability::DeleteProduct)?;
        let prompt = lock(&self.state).find(id).map(DeletePrompt::for_product);
        let prompt = prompt.ok_or(StorefrontError::ProductNotFound(id)).map_err(|e| self.report(e, "Product information could not be found."))?;
        *lock(&self.delete_prompt) = Some(prompt.clone());
        Ok(prompt)
    }

    /// Asks for confirmation first; declining is not an error and sends nothing.
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.authorize(Capability::DeleteProduct)?;
        if !self.ui.confirm(DELETE_QUESTION) {
            return Ok(());
        }
        let _guard = self.begin(ActionKey::Delete(id)).map_err(|e| self.report(e, ""))?;
        self.backend.delete_product(id).await.map_err(|e| self.report(e, "Failed to delete the product."))?;
        info!(product_id = id, "product deleted");
        let _ = self.load_products().await;
        self.ui.notify(Notification::success("Deleted."));
        Ok(())
    }

    pub async fn add_to_cart(&self, id: ProductId) -> Result<()> {
        let user = self.authorize_user(Capability::AddToCart)?;
        self.stocked_product(Capability::AddToCart, id)?;
        let _guard = self.begin(ActionKey::Cart(id)).map_err(|e| self.report(e, ""))?;
        self.backend
            .add_cart_item(&user, &CartItemRequest::single(id))
            .await
            .map_err(|e| self.report(e, "Failed to add the product to the cart."))?;
        info!(product_id = id, user_id = %user, "added to cart");
        self.ui.notify(Notification::success("Added to cart."));
        Ok(())
    }

    /// Sends the cached name, category and price along with the id.
    pub async fn add_to_favorite(&self, id: ProductId) -> Result<()> {
        let user = self.authorize_user(Capability::AddToFavorite)?;
        let bookmark = BookmarkRequest::from(&self.stocked_product(Capability::AddToFavorite, id)?);
        let _guard = self.begin(ActionKey::Favorite(id)).map_err(|e| self.report(e, ""))?;
        self.backend.add_bookmark(&user, &bookmark).await.map_err(|e| self.report(e, "Failed to add to favorites."))?;
        info!(product_id = id, user_id = %user, "added to favorites");
        self.ui.notify(Notification::success("Added to favorites."));
        Ok(())
    }

    fn authorize(&self, capability: Capability) -> Result<()> {
        let viewer = self.viewer();
        policy::require(&viewer, capability).map_err(|e| {
            warn!(?capability, role = ?viewer.role, "permission denied");
            self.ui.notify(Notification::error(capability.denial_message()));
            e
        })
    }

    /// Role check, then an explicit user id. There is no default user.
    fn authorize_user(&self, capability: Capability) -> Result<UserId> {
        self.authorize(capability)?;
        self.viewer().user_id.ok_or(StorefrontError::MissingUserId).map_err(|e| self.report(e, ""))
    }

    /// The cached product, refused when the capability needs stock and there is none.
    fn stocked_product(&self, capability: Capability, id: ProductId) -> Result<Product> {
        let product = lock(&self.state).find(id).cloned();
        let product = product.ok_or(StorefrontError::ProductNotFound(id)).map_err(|e| self.report(e, "Product information could not be found."))?;
        if capability.needs_stock() && product.is_sold_out() {
            return Err(self.report(StorefrontError::SoldOut(id), "This product is sold out."));
        }
        Ok(product)
    }

    fn begin(&self, key: ActionKey) -> Result<InFlight<'_>> {
        if lock(&self.in_flight).insert(key) {
            Ok(InFlight { set: &self.in_flight, key })
        } else {
            Err(StorefrontError::RequestInFlight)
        }
    }

    /// Logs and shows the failure. Identity problems also send the viewer to log in.
    fn report(&self, err: StorefrontError, message: &str) -> StorefrontError {
        match &err {
            StorefrontError::RequestInFlight => {
                warn!("duplicate request suppressed");
                self.ui.notify(Notification::info("That request is already in progress."));
            }
            e if e.is_identity() => {
                warn!(error = %e, "session identity unusable");
                self.ui.notify(Notification::error("Your login information is invalid. Please sign in again."));
                self.ui.redirect(LOGIN_ROUTE);
            }
            StorefrontError::SoldOut(id) => {
                warn!(product_id = *id, "sold-out product refused");
                self.ui.notify(Notification::error(message));
            }
            StorefrontError::InvalidForm(reason) => {
                warn!(%reason, "form rejected");
                self.ui.notify(Notification::error(format!("{} ({})", message, reason)));
            }
            e => {
                error!(error = %e, "{}", message);
                self.ui.notify(Notification::error(message));
            }
        }
        err
    }
}
