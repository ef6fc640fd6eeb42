//! Navigation endpoint
//!
//! Returns the menu tree visible to the current user. Display only;
//! the route guards remain the enforcement point.

use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::auth::middleware::CurrentUser;
use crate::domain::access::{navigation_tree, visible_items, NavEntry};

/// Navigation entry visible to the current user
#[derive(Debug, Serialize, ToSchema)]
pub struct NavEntryDto {
    pub label: String,
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavEntryDto>,
}

impl From<NavEntry> for NavEntryDto {
    fn from(entry: NavEntry) -> Self {
        Self {
            label: entry.label.to_string(),
            path: entry.path.to_string(),
            children: entry.children.into_iter().map(Into::into).collect(),
        }
    }
}

/// Menu tree for the current user
#[utoipa::path(
    get,
    path = "/api/v1/navigation",
    tag = "Navigation",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Visible navigation entries, in display order", body = ApiResponse<Vec<NavEntryDto>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_navigation(
    Extension(current): Extension<CurrentUser>,
) -> Json<ApiResponse<Vec<NavEntryDto>>> {
    let visible = visible_items(Some(&current.user), &navigation_tree());
    Json(ApiResponse::success(
        visible.into_iter().map(Into::into).collect(),
    ))
}
