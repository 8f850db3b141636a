//! Remote-procedure routes

pub mod health;
pub mod users;

use std::sync::Arc;

use axum::Router;

use crate::state::GatewayState;

/// Create all routes served by the gateway
pub fn create_rpc_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .merge(health::create_health_routes())
        .merge(users::create_user_routes())
}
