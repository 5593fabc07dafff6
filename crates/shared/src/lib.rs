//! 共享库
//!
//! 包含规则服务使用的配置加载、日志、指标与 HTTP 中间件等基础设施代码。

pub mod config;
pub mod observability;
