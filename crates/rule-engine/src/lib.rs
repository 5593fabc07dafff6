//! 规则表达式引擎
//!
//! 将 `age > 30 AND status = 'active'` 形式的规则文本编译为语法树，
//! 并对任意键值记录求值：
//! - 分词与基于双栈归约的语法树构建
//! - 三态（真/假/未知）评估，字段缺失时跳过对应条件
//! - 多条规则以 AND 合并
//! - HTTP 接口（创建、合并、评估）

pub mod builder;
pub mod error;
pub mod evaluator;
pub mod http;
pub mod manager;
pub mod models;
pub mod operators;
pub mod tokenizer;

pub use builder::AstBuilder;
pub use error::{Result, RuleError};
pub use evaluator::{ConditionEvaluator, RuleEvaluator, Verdict};
pub use manager::RuleManager;
pub use models::{AstNode, EvaluationContext, Literal, Operand, OperatorNode, Record};
pub use operators::{ComparisonOperator, LogicalOperator};
pub use tokenizer::{normalize_quotes, tokenize};
