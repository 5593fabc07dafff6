//! 语法树评估器
//!
//! 对记录逐节点求三态结果：字段缺失的比较结果为 `Unknown`，
//! 连接节点遇到一侧 `Unknown` 时直接采用另一侧的结果。

use crate::models::{AstNode, Literal, Operand, Record};
use crate::operators::LogicalOperator;
use serde_json::Value;
use std::cmp::Ordering;

/// 三态评估结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    True,
    False,
    Unknown,
}

impl Verdict {
    /// 最终结论：只有确定为 False 时不通过
    pub fn passes(self) -> bool {
        self != Self::False
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Unknown => None,
        }
    }

    /// 连接两侧结果
    ///
    /// 一侧未知时跳过连接词，原样返回另一侧；两侧都确定时按布尔逻辑计算。
    pub fn connect(operator: LogicalOperator, left: Self, right: Self) -> Self {
        match (left.as_bool(), right.as_bool()) {
            (None, None) => Self::Unknown,
            (None, Some(_)) => right,
            (Some(_), None) => left,
            (Some(l), Some(r)) => operator.apply(l, r).into(),
        }
    }
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

/// 条件评估器
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估单个比较条件
    ///
    /// # Arguments
    /// * `field_value` - 从记录中获取的字段值，None 表示字段不存在
    /// * `operand` - 规则中的比较条件
    pub fn evaluate(field_value: Option<&Value>, operand: &Operand) -> Verdict {
        match field_value {
            Some(actual) => operand
                .operator
                .matches(Self::compare(actual, &operand.value))
                .into(),
            None => Verdict::Unknown,
        }
    }

    /// 以记录值为左侧与字面量比较，类型不兼容时返回 None
    fn compare(actual: &Value, expected: &Literal) -> Option<Ordering> {
        match (actual, expected) {
            (Value::Number(n), Literal::Integer(expected)) => match n.as_i64() {
                Some(actual) => Some(actual.cmp(expected)),
                None => n.as_f64()?.partial_cmp(&(*expected as f64)),
            },
            (Value::String(actual), Literal::Text(expected)) => {
                Some(actual.as_str().cmp(expected.as_str()))
            }
            _ => None,
        }
    }
}

/// 语法树评估器
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEvaluator;

impl RuleEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// 评估规则，未知结果按通过处理
    pub fn evaluate<R: Record + ?Sized>(&self, root: &AstNode, record: &R) -> bool {
        self.resolve(root, record).passes()
    }

    /// 递归求三态结果
    pub fn resolve<R: Record + ?Sized>(&self, node: &AstNode, record: &R) -> Verdict {
        match node {
            AstNode::Operand(operand) => {
                ConditionEvaluator::evaluate(record.get_field(&operand.field), operand)
            }
            AstNode::Operator(node) => {
                let left = self.resolve(&node.left, record);
                let right = node
                    .right
                    .as_deref()
                    .map_or(Verdict::Unknown, |right| self.resolve(right, record));

                Verdict::connect(node.operator, left, right)
            }
        }
    }
}
