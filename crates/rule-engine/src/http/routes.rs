//! 路由配置模块

use axum::{
    Router, middleware,
    routing::{get, post},
};
use rule_shared::observability::middleware as obs_middleware;

use crate::http::{handlers, state::AppState};

/// 规则相关路由
pub fn rule_routes() -> Router<AppState> {
    Router::new()
        .route("/create_rule", post(handlers::create_rule))
        .route("/combine_rules", post(handlers::combine_rules))
        .route("/evaluate_rule", post(handlers::evaluate_rule))
}

/// 构建完整应用：规则路由、健康检查与可观测性中间件
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(rule_routes())
        .route("/health", get(handlers::health_check))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
