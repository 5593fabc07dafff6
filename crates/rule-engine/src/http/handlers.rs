//! 规则 API 处理器
//!
//! 每个请求独立构建语法树，处理结束即丢弃，不做任何持久化。

use std::time::Instant;

use axum::{Json, extract::State};
use rule_shared::observability::metrics::record_rule_operation;
use tracing::info;
use validator::Validate;

use crate::{
    error::Result as RuleResult,
    http::{
        dto::{
            ApiResponse, CombineRulesRequest, CreateRuleRequest, EvaluateRuleRequest,
            EvaluateRuleResponse,
        },
        error::ApiError,
        state::AppState,
    },
    models::AstNode,
};

/// 记录规则操作指标并透传结果
fn observe<T>(operation: &str, start: Instant, result: RuleResult<T>) -> RuleResult<T> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.error_code(),
    };
    record_rule_operation(operation, outcome, start.elapsed().as_secs_f64());
    result
}

/// 创建规则
///
/// POST /create_rule
pub async fn create_rule(
    State(state): State<AppState>,
    Json(req): Json<CreateRuleRequest>,
) -> Result<Json<ApiResponse<AstNode>>, ApiError> {
    req.validate()?;

    let start = Instant::now();
    let root = observe("create", start, state.manager.create_rule(&req.rule))?;

    info!(fields = root.fields().len(), "规则已创建");
    Ok(Json(ApiResponse::success(root)))
}

/// 合并规则
///
/// POST /combine_rules
pub async fn combine_rules(
    State(state): State<AppState>,
    Json(req): Json<CombineRulesRequest>,
) -> Result<Json<ApiResponse<AstNode>>, ApiError> {
    req.validate()?;

    let start = Instant::now();
    let root = observe("combine", start, state.manager.combine_rules(&req.rules))?;

    info!(rules = req.rules.len(), "规则已合并");
    Ok(Json(ApiResponse::success(root)))
}

/// 评估规则
///
/// POST /evaluate_rule
pub async fn evaluate_rule(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRuleRequest>,
) -> Result<Json<ApiResponse<EvaluateRuleResponse>>, ApiError> {
    req.validate()?;

    if !req.data.is_object() {
        return Err(ApiError::Validation("data 必须是 JSON 对象".to_string()));
    }

    let start = Instant::now();
    let result = observe(
        "evaluate",
        start,
        state.manager.evaluate_rule(&req.rule, &req.data),
    )?;

    info!(result, "规则已评估");
    Ok(Json(ApiResponse::success(EvaluateRuleResponse { result })))
}

/// 健康检查
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
