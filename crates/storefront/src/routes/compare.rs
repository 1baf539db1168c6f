//! Product comparison page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kitbay_core::catalog::DEFAULT_COMPARE_LIMIT;
use tracing::instrument;

use super::{PageContext, ProductView};
use crate::filters;
use crate::middleware::ClientStorage;
use crate::state::AppState;

/// Comparison page template.
#[derive(Template, WebTemplate)]
#[template(path = "compare/show.html")]
pub struct CompareTemplate {
    pub page: PageContext,
    pub product: ProductView,
    pub candidates: Vec<ProductView>,
}

/// Unknown product page template.
#[derive(Template, WebTemplate)]
#[template(path = "compare/not_found.html")]
pub struct CompareNotFoundTemplate {
    pub page: PageContext,
    pub model: String,
}

/// Compare a product with others from the same category.
#[instrument(skip(state, client))]
pub async fn show(
    State(state): State<AppState>,
    mut client: ClientStorage,
    Path(model): Path<String>,
) -> Response {
    let page = PageContext::load(&mut client);

    let Some(product) = state.catalog().find(&model) else {
        return (
            StatusCode::NOT_FOUND,
            CompareNotFoundTemplate { page, model },
        )
            .into_response();
    };

    let candidates = state
        .catalog()
        .compare_candidates(&model, DEFAULT_COMPARE_LIMIT)
        .into_iter()
        .map(|candidate| ProductView::new(candidate, page.currency))
        .collect();

    CompareTemplate {
        page,
        product: ProductView::new(product, page.currency),
        candidates,
    }
    .into_response()
}
