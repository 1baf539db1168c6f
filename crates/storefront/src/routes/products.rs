//! Catalog browsing: home page, category listings and product detail.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kitbay_core::catalog::{CategorySummary, DEFAULT_COMPARE_LIMIT, Spec};
use tracing::instrument;

use super::orders::OrderView;
use super::{PageContext, ProductView};
use crate::filters;
use crate::middleware::ClientStorage;
use crate::state::AppState;

/// Number of orders shown on the home page.
const RECENT_ORDERS: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub categories: Vec<CategorySummary>,
    pub recent_orders: Vec<OrderView>,
}

/// Category listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/category.html")]
pub struct CategoryTemplate {
    pub page: PageContext,
    pub name: String,
    pub products: Vec<ProductView>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductView,
    pub specs: Vec<Spec>,
    pub related: Vec<ProductView>,
}

/// Unknown category or product.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct CatalogNotFoundTemplate {
    pub page: PageContext,
    pub what: &'static str,
    pub name: String,
}

fn not_found(page: PageContext, what: &'static str, name: String) -> Response {
    (StatusCode::NOT_FOUND, CatalogNotFoundTemplate { page, what, name }).into_response()
}

/// Categories with their product counts, and the latest orders.
#[instrument(skip(state, client))]
pub async fn home(State(state): State<AppState>, mut client: ClientStorage) -> impl IntoResponse {
    let page = PageContext::load(&mut client);
    let recent_orders = state
        .orders()
        .orders()
        .iter()
        .take(RECENT_ORDERS)
        .map(|order| OrderView::new(order, page.currency))
        .collect();

    HomeTemplate {
        page,
        categories: state.catalog().categories(),
        recent_orders,
    }
}

/// Every product in one category.
#[instrument(skip(state, client))]
pub async fn category(
    State(state): State<AppState>,
    mut client: ClientStorage,
    Path(slug): Path<String>,
) -> Response {
    let page = PageContext::load(&mut client);
    let catalog = state.catalog();

    let Some(name) = catalog.category_for_slug(&slug) else {
        return not_found(page, "category", slug);
    };

    let products = catalog
        .by_category(name)
        .map(|product| ProductView::new(product, page.currency))
        .collect();

    CategoryTemplate {
        page,
        name: name.to_owned(),
        products,
    }
    .into_response()
}

/// Product detail with its specification table.
#[instrument(skip(state, client))]
pub async fn show(
    State(state): State<AppState>,
    mut client: ClientStorage,
    Path(model): Path<String>,
) -> Response {
    let page = PageContext::load(&mut client);
    let catalog = state.catalog();

    let Some(product) = catalog.find(&model) else {
        return not_found(page, "product", model);
    };

    let related = catalog
        .compare_candidates(&model, DEFAULT_COMPARE_LIMIT)
        .into_iter()
        .map(|candidate| ProductView::new(candidate, page.currency))
        .collect();

    ProductShowTemplate {
        page,
        product: ProductView::new(product, page.currency),
        specs: product.specs(),
        related,
    }
    .into_response()
}
