//! 规则引擎错误类型

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("不支持的比较操作符: '{0}'")]
    UnsupportedOperator(String),

    #[error("规则格式错误: {0}")]
    MalformedRule(String),

    #[error("括号不匹配: {0}")]
    MismatchedParentheses(String),

    #[error("规则列表不能为空")]
    EmptyInput,
}

impl RuleError {
    /// 是否为规则文本解析阶段产生的错误
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperator(_) | Self::MalformedRule(_) | Self::MismatchedParentheses(_)
        )
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedOperator(_) => "UNSUPPORTED_OPERATOR",
            Self::MalformedRule(_) => "MALFORMED_RULE",
            Self::MismatchedParentheses(_) => "MISMATCHED_PARENTHESES",
            Self::EmptyInput => "EMPTY_INPUT",
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
