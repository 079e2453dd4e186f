use axum::{Json, Router, routing::get};

use crate::{
    ApiState,
    quiz::view::{CategoryCardView, category_cards},
};

/// The category selector catalog.
pub fn routes() -> Router<ApiState> {
    Router::new().route("/categories", get(list_categories))
}

async fn list_categories() -> Json<Vec<CategoryCardView>> {
    Json(category_cards())
}
