use axum::{extract::{Query, State}, Json};
use models::post::Post;
use serde::Deserialize;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Post>>, JsonApiError> {
    Ok(Json(state.posts.search(&query.q).await?))
}
