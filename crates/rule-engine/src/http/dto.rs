//! 请求/响应 DTO 定义

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// 创建规则请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRuleRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "规则不能为空"))]
    pub rule: String,
}

/// 合并规则请求
#[derive(Debug, Deserialize, Validate)]
pub struct CombineRulesRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "规则列表不能为空"))]
    pub rules: Vec<String>,
}

/// 评估规则请求
#[derive(Debug, Deserialize, Validate)]
pub struct EvaluateRuleRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "规则不能为空"))]
    pub rule: String,
    /// 待评估的记录，必须是 JSON 对象
    #[serde(default)]
    pub data: Value,
}

/// 评估结果
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateRuleResponse {
    pub result: bool,
}

/// API 统一响应
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }
}
