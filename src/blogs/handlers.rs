use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::dto::MessageResponse,
    blogs::{
        dto::{BlogResponse, BlogsResponse, CreateBlogRequest, DeleteBlogRequest, UpdateBlogRequest},
        repo_types::DeleteOutcome,
    },
    error::ApiError,
    extract::ApiJson,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_blogs))
        .route("/blogs/", get(list_blogs))
        .route("/myblogs/:author", get(list_author_blogs))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs/create", post(create_blog))
        .route("/myblogs/update/:id", put(update_blog))
        .route("/myblogs/delete/:id", delete(delete_blog))
}

#[instrument(skip(state, payload))]
pub async fn create_blog(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateBlogRequest>,
) -> Result<Json<BlogResponse>, ApiError> {
    let new_blog = payload
        .into_new_blog()
        .ok_or_else(|| ApiError::Validation("Please fill all the required fields".into()))?;

    let blog = state.blogs.insert(new_blog).await.map_err(|e| {
        error!(error = %e, "insert blog failed");
        ApiError::Internal("Error creating blog, please try again".into())
    })?;

    info!(blog_id = %blog.id, author = %blog.author, "blog created");
    Ok(Json(BlogResponse {
        message: "Blog created successfully",
        blog,
    }))
}

#[instrument(skip(state))]
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<BlogsResponse>, ApiError> {
    let blogs = state.blogs.find_all().await.map_err(|e| {
        error!(error = %e, "find_all blogs failed");
        ApiError::Internal("Error fetching blogs".into())
    })?;
    Ok(Json(BlogsResponse { blogs }))
}

#[instrument(skip(state))]
pub async fn list_author_blogs(
    State(state): State<AppState>,
    Path(author): Path<String>,
) -> Result<Json<BlogsResponse>, ApiError> {
    let blogs = state.blogs.find_by_author(&author).await.map_err(|e| {
        error!(error = %e, %author, "find_by_author failed");
        ApiError::Internal("Error fetching blogs".into())
    })?;

    if blogs.is_empty() {
        return Err(ApiError::NotFound("No blogs found for this author.".into()));
    }
    Ok(Json(BlogsResponse { blogs }))
}

#[instrument(skip(state, payload))]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateBlogRequest>,
) -> Result<Json<BlogResponse>, ApiError> {
    match state.blogs.update_by_id(&id, payload.into()).await {
        Ok(Some(blog)) => {
            info!(blog_id = %blog.id, "blog updated");
            Ok(Json(BlogResponse {
                message: "Blog updated successfully",
                blog,
            }))
        }
        Ok(None) => Err(ApiError::NotFound("Blog not found".into())),
        Err(e) => {
            error!(error = %e, %id, "update blog failed");
            Err(ApiError::Internal("Error updating blog".into()))
        }
    }
}

/// The requester must name the blog's author; the check happens in the same
/// store operation as the delete. A missing or unreadable body counts as a
/// missing username.
#[instrument(skip(state, payload))]
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Option<ApiJson<DeleteBlogRequest>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let username = payload
        .and_then(|ApiJson(body)| body.username)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::Validation("Username is required".into()))?;

    match state.blogs.delete_by_id_for_author(&id, &username).await {
        Ok(DeleteOutcome::Deleted) => {
            info!(blog_id = %id, %username, "blog deleted");
            Ok(Json(MessageResponse {
                message: "Blog deleted successfully",
            }))
        }
        Ok(DeleteOutcome::NotFound) => Err(ApiError::NotFound("Blog not found".into())),
        Ok(DeleteOutcome::AuthorMismatch) => {
            warn!(blog_id = %id, %username, "delete refused, username does not match author");
            Err(ApiError::Forbidden(
                "Username does not match. Blog not deleted.".into(),
            ))
        }
        Err(e) => {
            error!(error = %e, %id, "delete blog failed");
            Err(ApiError::Internal("Error deleting blog".into()))
        }
    }
}
