//! 规则引擎领域模型

use crate::operators::{ComparisonOperator, LogicalOperator};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::BuildHasher;

/// 比较条件中的字面量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Integer(i64),
    Text(String),
}

impl Literal {
    /// 将词法单元转换为字面量
    ///
    /// 完整的十进制整数解析为 `Integer`；被单引号包裹时去掉引号作为 `Text`；
    /// 其余情况原样作为 `Text`。
    pub fn coerce(lexeme: &str) -> Self {
        if let Ok(n) = lexeme.parse::<i64>() {
            return Self::Integer(n);
        }

        match lexeme
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        {
            Some(inner) => Self::Text(inner.to_string()),
            None => Self::Text(lexeme.to_string()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// 原子比较：字段、比较操作符、字面量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    pub field: String,
    pub operator: ComparisonOperator,
    pub value: Literal,
}

impl Operand {
    pub fn new(field: impl Into<String>, operator: ComparisonOperator, value: Literal) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// 逻辑连接节点
///
/// `right` 在构建过程中才会被填充，构建完成的树中一定存在。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorNode {
    pub operator: LogicalOperator,
    pub left: Box<AstNode>,
    pub right: Option<Box<AstNode>>,
}

impl OperatorNode {
    /// 创建右子节点待定的连接节点
    pub fn pending(operator: LogicalOperator, left: AstNode) -> Self {
        Self {
            operator,
            left: Box::new(left),
            right: None,
        }
    }

    pub fn new(operator: LogicalOperator, left: AstNode, right: AstNode) -> Self {
        Self {
            operator,
            left: Box::new(left),
            right: Some(Box::new(right)),
        }
    }
}

/// 抽象语法树节点（比较叶子或逻辑连接）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AstNode {
    Operand(Operand),
    Operator(OperatorNode),
}

impl AstNode {
    pub fn operand(field: impl Into<String>, operator: ComparisonOperator, value: Literal) -> Self {
        Self::Operand(Operand::new(field, operator, value))
    }

    /// 以 AND 合并两棵树，原有两棵树成为新根的左右子树
    pub fn combine(left: AstNode, right: AstNode) -> Self {
        Self::Operator(OperatorNode::new(LogicalOperator::And, left, right))
    }

    /// 所有连接节点是否都已具备左右子树
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Operand(_) => true,
            Self::Operator(node) => {
                node.left.is_complete() && node.right.as_ref().is_some_and(|r| r.is_complete())
            }
        }
    }

    /// 规则中引用的所有字段
    pub fn fields(&self) -> BTreeSet<&str> {
        let mut fields = BTreeSet::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, fields: &mut BTreeSet<&'a str>) {
        match self {
            Self::Operand(operand) => {
                fields.insert(operand.field.as_str());
            }
            Self::Operator(node) => {
                node.left.collect_fields(fields);
                if let Some(right) = &node.right {
                    right.collect_fields(fields);
                }
            }
        }
    }
}

impl From<Operand> for AstNode {
    fn from(operand: Operand) -> Self {
        Self::Operand(operand)
    }
}

/// 渲染为规则文本，连接节点总是加括号
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand(operand) => write!(f, "{}", operand),
            Self::Operator(node) => match &node.right {
                Some(right) => write!(f, "({} {} {})", node.left, node.operator, right),
                None => write!(f, "({} {} ?)", node.left, node.operator),
            },
        }
    }
}

/// 可供规则读取的记录
///
/// 只要求按字段名查找，字段不存在时返回 None。
pub trait Record {
    fn get_field(&self, field: &str) -> Option<&Value>;

    fn contains_field(&self, field: &str) -> bool {
        self.get_field(field).is_some()
    }
}

impl Record for Map<String, Value> {
    fn get_field(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl<S: BuildHasher> Record for HashMap<String, Value, S> {
    fn get_field(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

/// 非对象的 JSON 值视为空记录
impl Record for Value {
    fn get_field(&self, field: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(field))
    }
}

/// 评估上下文 - 提供给规则引擎的数据
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    data: Value,
}

impl EvaluationContext {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// 从 JSON 对象创建
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let data: Value = serde_json::from_str(json)?;
        Ok(Self { data })
    }
}

impl Record for EvaluationContext {
    /// 字段名按字面匹配顶层键，不解析点号路径
    fn get_field(&self, field: &str) -> Option<&Value> {
        self.data.get_field(field)
    }
}
