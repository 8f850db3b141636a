//! # Accounts Gateway Crate
//!
//! Serves the `users.UsersService` operations over HTTP, one POST route per method,
//! and translates handler errors into status codes.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use accounts_gateway::{create_router, GatewayState};
//!
//! # async fn run(pool: sqlx::SqlitePool) -> std::io::Result<()> {
//! let app = create_router(GatewayState::new(pool));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:50051").await?;
//! axum::serve(listener, app).await
//! # }
//! ```

pub mod error;
pub mod middleware;
pub mod rpc;
pub mod state;

pub use error::{ErrorResponse, GatewayError, GatewayResult};
pub use state::GatewayState;

use std::sync::Arc;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    #[allow(unused_mut)]
    let mut router = Router::new()
        .merge(rpc::create_rpc_routes().with_state(Arc::new(state)))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http());

    #[cfg(debug_assertions)]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            paths(
                rpc::health::health_check,
                rpc::users::auth,
                rpc::users::get_users,
                rpc::users::get_user,
                rpc::users::update_user,
                rpc::users::delete_user,
            ),
            components(
                schemas(
                    rpc::health::HealthResponse,
                    rpc::users::RoleDto,
                    rpc::users::UserResponse,
                    rpc::users::AuthRequest,
                    rpc::users::UserIdsRequest,
                    rpc::users::UserIdRequest,
                    rpc::users::UpdateUserRequest,
                    rpc::users::DeleteUserRequest,
                    rpc::users::EmptyResponse,
                    error::ErrorResponse,
                )
            ),
            tags(
                (name = "users", description = "Account operations"),
                (name = "health", description = "Service health"),
            )
        )]
        struct ApiDoc;

        router = router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
}
