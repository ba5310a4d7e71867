//! HTTP surface of the storefront.
//!
//! Every request reads the cookie session, builds its own controller and
//! renders a page. Actions follow post/redirect/get: the POST handler runs the
//! action, stores its notices in a short-lived `flash` cookie and sends the
//! browser back to the catalog, where the next GET shows them once.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::api::Backend;
use crate::controller::CatalogController;
use crate::domain::aggregates::{OrderId, ProductId};
use crate::form::ProductForm;
use crate::pages::{OrderDetailPage, ReviewsPage};
use crate::session::{CookieSessionStore, MemorySessionStore, SessionStore};
use crate::ui::{flash_text, parse_flash, RecordingUi, Ui};
use crate::view::html::{self, CatalogTemplate};
use crate::view::OrderPageView;
use crate::{CategoryFilter, Result};

pub const CATALOG_ROUTE: &str = "/products";
pub const FLASH_KEY: &str = "flash";

#[derive(Clone)]
pub struct AppState { pub backend: Arc<dyn Backend> }

impl AppState {
    pub fn new(backend: Arc<dyn Backend>) -> Self { Self { backend } }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "cafe-storefront"})) }))
        .route("/products", get(catalog).post(save_product))
        .route("/products/new", get(new_product))
        .route("/products/:id", get(product_detail))
        .route("/products/:id/edit", get(edit_product))
        .route("/products/:id/delete", get(confirm_delete).post(delete_product))
        .route("/products/:id/cart", post(add_to_cart))
        .route("/products/:id/favorite", post(add_to_favorite))
        .route("/orders/:id", get(order_detail))
        .route("/reviews", get(reviews))
        .route("/reviews/:product_id", get(product_reviews))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams { pub category: Option<String>, pub search: Option<String>, pub page: Option<usize> }

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams { pub confirmed: Option<String> }

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewParams { pub product_id: Option<String> }

fn session_from(headers: &HeaderMap) -> CookieSessionStore {
    CookieSessionStore::from_header(headers.get(header::COOKIE).and_then(|v| v.to_str().ok()).unwrap_or(""))
}

/// Shows the notices the previous action left behind, then expires them.
fn replay_flash(session: &CookieSessionStore, ui: &RecordingUi) {
    if let Some(text) = session.get(FLASH_KEY) {
        for note in parse_flash(&text) { ui.notify(note); }
        session.remove(FLASH_KEY);
    }
}

fn set_cookie(response: &mut Response, cookie: String) {
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

fn expire_removed(session: &CookieSessionStore, response: &mut Response) {
    for key in session.take_removed() {
        set_cookie(response, format!("{}=; Path=/; Max-Age=0", key));
    }
}

/// Redirects win over page content.
fn respond(session: &CookieSessionStore, ui: &RecordingUi, page: impl FnOnce(&RecordingUi) -> Result<String>) -> Response {
    let mut response = match ui.redirects().last() {
        Some(target) => Redirect::to(target).into_response(),
        None => match page(ui) {
            Ok(body) => Html(body).into_response(),
            Err(e) => {
                error!(error = %e, "page rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "The page could not be rendered.").into_response()
            }
        },
    };
    expire_removed(session, &mut response);
    response
}

/// Ends an action with 303 to the catalog, or to wherever the action redirected.
fn redirect_back(session: &CookieSessionStore, ui: &RecordingUi) -> Response {
    let target = ui.redirects().last().cloned().unwrap_or_else(|| CATALOG_ROUTE.to_string());
    let mut response = Redirect::to(&target).into_response();
    let notes = ui.notifications();
    if !notes.is_empty() {
        set_cookie(&mut response, format!("{}={}; Path=/; HttpOnly", FLASH_KEY, urlencoding::encode(&flash_text(&notes))));
    }
    expire_removed(session, &mut response);
    response
}

/// Catalog controller for this request, with the catalog already fetched.
async fn open_catalog(state: &AppState, session: &CookieSessionStore, ui: &Arc<RecordingUi>) -> CatalogController {
    let controller = CatalogController::open(state.backend.clone(), ui.clone(), session);
    let _ = controller.load_products().await;
    controller
}

/// Same as [`open_catalog`] for pages, which also show the pending flash.
async fn open_catalog_page(state: &AppState, session: &CookieSessionStore, ui: &Arc<RecordingUi>) -> CatalogController {
    replay_flash(session, ui);
    open_catalog(state, session, ui).await
}

fn render_catalog(controller: &CatalogController, ui: &RecordingUi) -> Result<String> {
    let view = controller.view();
    let notes = ui.notifications();
    let detail = controller.detail();
    let form = controller.form();
    let prompt = controller.delete_prompt();
    html::catalog_page(
        CatalogTemplate::new(&view, &notes).with_detail(detail.as_ref()).with_form(form.as_ref()).with_prompt(prompt.as_ref()),
    )
}

async fn catalog(State(s): State<AppState>, headers: HeaderMap, Query(p): Query<CatalogParams>) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::default());
    let controller = open_catalog_page(&s, &session, &ui).await;
    controller.set_category(CategoryFilter::parse(p.category.as_deref().unwrap_or("")));
    controller.set_search(p.search.unwrap_or_default());
    controller.go_to_page(p.page.unwrap_or(1));
    respond(&session, &ui, |ui| render_catalog(&controller, ui))
}

async fn new_product(State(s): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::default());
    let controller = open_catalog_page(&s, &session, &ui).await;
    let _ = controller.open_create_form();
    respond(&session, &ui, |ui| render_catalog(&controller, ui))
}

async fn product_detail(State(s): State<AppState>, headers: HeaderMap, Path(id): Path<ProductId>) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::default());
    let controller = open_catalog_page(&s, &session, &ui).await;
    let _ = controller.show_detail(id);
    respond(&session, &ui, |ui| render_catalog(&controller, ui))
}

async fn edit_product(State(s): State<AppState>, headers: HeaderMap, Path(id): Path<ProductId>) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::default());
    let controller = open_catalog_page(&s, &session, &ui).await;
    let _ = controller.open_edit_form(id).await;
    respond(&session, &ui, |ui| render_catalog(&controller, ui))
}

/// A failed save keeps the form open and renders it again with what was typed.
async fn save_product(State(s): State<AppState>, headers: HeaderMap, Form(form): Form<ProductForm>) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::default());
    let controller = open_catalog(&s, &session, &ui).await;
    let _ = controller.save_product(form).await;
    if controller.form().is_some() && ui.redirects().is_empty() {
        return respond(&session, &ui, |ui| render_catalog(&controller, ui));
    }
    redirect_back(&session, &ui)
}

/// Confirmation step. Nothing is deleted here.
async fn confirm_delete(State(s): State<AppState>, headers: HeaderMap, Path(id): Path<ProductId>) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::default());
    let controller = open_catalog_page(&s, &session, &ui).await;
    let _ = controller.prompt_delete(id);
    respond(&session, &ui, |ui| render_catalog(&controller, ui))
}

/// Only `confirmed=true` from the confirmation form counts as yes.
async fn delete_product(State(s): State<AppState>, headers: HeaderMap, Path(id): Path<ProductId>, Form(p): Form<DeleteParams>) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::new(p.confirmed.as_deref() == Some("true")));
    let controller = open_catalog(&s, &session, &ui).await;
    let _ = controller.delete_product(id).await;
    redirect_back(&session, &ui)
}

async fn add_to_cart(State(s): State<AppState>, headers: HeaderMap, Path(id): Path<ProductId>) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::default());
    let controller = open_catalog(&s, &session, &ui).await;
    let _ = controller.add_to_cart(id).await;
    redirect_back(&session, &ui)
}

async fn add_to_favorite(State(s): State<AppState>, headers: HeaderMap, Path(id): Path<ProductId>) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::default());
    let controller = open_catalog(&s, &session, &ui).await;
    let _ = controller.add_to_favorite(id).await;
    redirect_back(&session, &ui)
}

/// Cookies are the only session source here, so the per-tab fallback is empty.
async fn order_detail(State(s): State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::default());
    let page = match OrderDetailPage::open(s.backend.clone(), ui.clone(), &session, &MemorySessionStore::new()) {
        Ok(page) => page,
        Err(_) => return respond(&session, &ui, |_| Ok(String::new())),
    };
    let view = match id.trim().parse::<OrderId>() {
        Ok(order_id) => {
            let _ = page.load(order_id).await;
            page.view()
        }
        Err(_) => OrderPageView { loading: false, error: Some("Invalid order ID.".into()), detail: None },
    };
    let status = if view.detail.is_some() { StatusCode::OK } else { StatusCode::NOT_FOUND };
    let mut response = respond(&session, &ui, |ui| html::order_page(&view, &ui.notifications()));
    if response.status() == StatusCode::OK { *response.status_mut() = status; }
    response
}

async fn reviews(State(s): State<AppState>, headers: HeaderMap, Query(p): Query<ReviewParams>) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::default());
    let page = ReviewsPage::new(s.backend.clone(), ui.clone(), None);
    let _ = match p.product_id.as_deref() {
        Some(input) => page.search(input).await,
        None => page.show_all().await,
    };
    respond(&session, &ui, |ui| html::reviews_page(&page.view(), &ui.notifications()))
}

async fn product_reviews(State(s): State<AppState>, headers: HeaderMap, Path(product_id): Path<ProductId>) -> Response {
    let session = session_from(&headers);
    let ui = Arc::new(RecordingUi::default());
    let page = ReviewsPage::new(s.backend.clone(), ui.clone(), Some(product_id));
    let _ = page.load().await;
    respond(&session, &ui, |ui| html::reviews_page(&page.view(), &ui.notifications()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Notification;

    #[test]
    fn test_redirect_back_carries_flash() {
        let session = CookieSessionStore::from_header("");
        let ui = RecordingUi::default();
        ui.notify(Notification::success("Added to cart."));
        let response = redirect_back(&session, &ui);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/products");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert_eq!(cookie, "flash=success%3AAdded%20to%20cart.; Path=/; HttpOnly");
    }

    #[test]
    fn test_replay_flash_expires_cookie() {
        let session = CookieSessionStore::from_header("flash=error%3AFailed%20to%20add.");
        let ui = RecordingUi::default();
        replay_flash(&session, &ui);
        assert_eq!(ui.notifications(), vec![Notification::error("Failed to add.")]);
        assert_eq!(session.take_removed(), vec!["flash".to_string()]);
    }
}
