use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    JsonBody, QueryParams,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    CreateUser, ListUsersQuery, MessageResponse, UpdateUser, User, UserEnvelope, UserPage,
};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const USER_CREATED: &str = "User created successfully";
pub const USER_UPDATED: &str = "User updated successfully";
pub const USER_DELETED: &str = "User deleted successfully";

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, update_user, delete_user),
    components(
        schemas(User, CreateUser, UpdateUser, UserPage, UserEnvelope, MessageResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", put(update_user).delete(delete_user))
        .with_state(shared_service)
}

/// List users, paginated, with optional search
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = UserPage),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    QueryParams(query): QueryParams<ListUsersQuery>,
) -> UserResult<Json<UserPage>> {
    let page = service.list_users(query).await?;
    Ok(Json(page))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = UserEnvelope),
        (status = 400, response = BadRequestValidationResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    JsonBody(input): JsonBody<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: USER_CREATED.to_string(),
            data: user,
        }),
    ))
}

/// Update some fields of a user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID (24-char hex ObjectId)")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated successfully", body = UserEnvelope),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateUser>,
) -> UserResult<Json<UserEnvelope>> {
    let user = service.update_user(&id, input).await?;
    Ok(Json(UserEnvelope {
        message: USER_UPDATED.to_string(),
        data: user,
    }))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID (24-char hex ObjectId)")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<Json<MessageResponse>> {
    service.delete_user(&id).await?;
    Ok(Json(MessageResponse {
        message: USER_DELETED.to_string(),
    }))
}
