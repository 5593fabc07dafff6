//! HTTP 接口
//!
//! 对外暴露规则的创建、合并与评估端点，请求与响应均为 JSON。

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
