//! 应用状态定义

use crate::manager::RuleManager;

/// Axum 路由共享状态
///
/// 规则管理器无内部状态，按值克隆即可在 handler 间共享。
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub manager: RuleManager,
}
