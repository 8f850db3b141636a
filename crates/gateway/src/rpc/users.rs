//! Account operations exposed as `users.UsersService` methods

use std::convert::Infallible;
use std::sync::Arc;

use accounts_users::{ServiceResult, User, UserRole};
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, GatewayError, GatewayResult};
use crate::state::GatewayState;

/// Users buffered between the handler task and the response body.
const STREAM_BUFFER: usize = 32;

const NDJSON: &str = "application/x-ndjson";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RoleDto {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl From<UserRole> for RoleDto {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::User => RoleDto::User,
            UserRole::Admin => RoleDto::Admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: RoleDto,
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role.into(),
            sub: user.sub,
            name: user.name,
            avatar_id: user.avatar_id,
            deleted: user.deleted,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AuthRequest {
    pub email: String,
    pub sub: String,
}

impl From<AuthRequest> for accounts_users::AuthRequest {
    fn from(request: AuthRequest) -> Self {
        Self {
            email: request.email,
            sub: request.sub,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserIdsRequest {
    #[serde(default)]
    pub user_ids: Vec<String>,
}

impl From<UserIdsRequest> for accounts_users::UserIds {
    fn from(request: UserIdsRequest) -> Self {
        Self {
            user_ids: request.user_ids,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserIdRequest {
    pub user_id: String,
}

impl From<UserIdRequest> for accounts_users::UserId {
    fn from(request: UserIdRequest) -> Self {
        Self {
            user_id: request.user_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_id: Option<String>,
}

impl From<UpdateUserRequest> for accounts_users::UpdateUserRequest {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            id: request.id,
            name: request.name,
            avatar_id: request.avatar_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteUserRequest {
    pub id: String,
    pub sub: String,
    pub email: String,
}

impl From<DeleteUserRequest> for accounts_users::DeleteUserRequest {
    fn from(request: DeleteUserRequest) -> Self {
        Self {
            id: request.id,
            sub: request.sub,
            email: request.email,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct EmptyResponse {}

/// Create the `users.UsersService` routes
pub fn create_user_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/users.UsersService/Auth", post(auth))
        .route("/users.UsersService/GetUsers", post(get_users))
        .route("/users.UsersService/GetUser", post(get_user))
        .route("/users.UsersService/UpdateUser", post(update_user))
        .route("/users.UsersService/DeleteUser", post(delete_user))
}

/// Authenticate by email, provisioning the account on first sight
#[utoipa::path(
    post,
    path = "/users.UsersService/Auth",
    tag = "users",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Authenticated user", body = UserResponse),
        (status = 400, description = "Invalid email or code", body = ErrorResponse),
        (status = 401, description = "Account deleted", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn auth(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<AuthRequest>,
) -> GatewayResult<Json<UserResponse>> {
    let user = state.user_service.auth(request.into()).await?;
    Ok(Json(user.into()))
}

/// Stream the users matching a set of ids as newline-delimited JSON.
///
/// A failure before the first user is a plain error response. A failure after that
/// is appended to the stream as a final error line.
#[utoipa::path(
    post,
    path = "/users.UsersService/GetUsers",
    tag = "users",
    request_body = UserIdsRequest,
    responses(
        (status = 200, description = "One user per line", body = UserResponse, content_type = "application/x-ndjson"),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn get_users(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<UserIdsRequest>,
) -> Response {
    let (tx, mut rx) = mpsc::channel::<ServiceResult<User>>(STREAM_BUFFER);
    let service = Arc::clone(&state.user_service);

    tokio::spawn(async move {
        if let Err(error) = service.get_users(request.into(), &tx).await {
            // The body may already be gone, in which case there is nobody to tell.
            let _ = tx.send(Err(error)).await;
        }
    });

    let first = match rx.recv().await {
        Some(Err(error)) => return GatewayError::from(error).into_response(),
        first => first,
    };

    let head = stream::iter(first.map(ndjson_line));
    let tail = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (ndjson_line(item), rx))
    });
    let body = Body::from_stream(head.chain(tail).map(Ok::<_, Infallible>));

    ([(header::CONTENT_TYPE, NDJSON)], body).into_response()
}

/// Fetch a single user by id
#[utoipa::path(
    post,
    path = "/users.UsersService/GetUser",
    tag = "users",
    request_body = UserIdRequest,
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "No such user", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<UserIdRequest>,
) -> GatewayResult<Json<UserResponse>> {
    let user = state.user_service.get_user(request.into()).await?;
    Ok(Json(user.into()))
}

/// Edit name and avatar of a live user
#[utoipa::path(
    post,
    path = "/users.UsersService/UpdateUser",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Applied, or nothing matched", body = EmptyResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<UpdateUserRequest>,
) -> GatewayResult<Json<EmptyResponse>> {
    state.user_service.update_user(request.into()).await?;
    Ok(Json(EmptyResponse {}))
}

/// Soft-delete a user owned by the given sub and email
#[utoipa::path(
    post,
    path = "/users.UsersService/DeleteUser",
    tag = "users",
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "Applied, or nothing matched", body = EmptyResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<DeleteUserRequest>,
) -> GatewayResult<Json<EmptyResponse>> {
    state.user_service.delete_user(request.into()).await?;
    Ok(Json(EmptyResponse {}))
}

fn ndjson_line(item: ServiceResult<User>) -> String {
    let encoded = match item {
        Ok(user) => serde_json::to_string(&UserResponse::from(user)),
        Err(error) => serde_json::to_string(&ErrorResponse::from(&GatewayError::from(error))),
    };

    let mut line = encoded.unwrap_or_else(|error| {
        let error = GatewayError::Internal(error.to_string());
        serde_json::json!({ "code": error.code(), "message": error.to_string() }).to_string()
    });
    line.push('\n');
    line
}
