//! 语法树构建器
//!
//! 使用两个栈从左到右归约词法单元：
//! - 元素栈：尚未归约的原始词法单元（`(` 标记以及进行中的 `字段 操作符 值`）
//! - 节点栈：已完成、等待挂载为左/右子树的节点
//!
//! 该算法不实现运算符优先级。连接词总是取最近完成的比较或节点作为左子树，
//! `)` 总是填充最近一个尚缺右子树的连接节点，而不一定是与之配对的 `(` 所属的节点。
//! 现有规则文本的解析结果依赖这一行为，不能替换为常规的优先级解析器。

use crate::error::{Result, RuleError};
use crate::models::{AstNode, Literal, Operand, OperatorNode};
use crate::operators::{ComparisonOperator, LogicalOperator};
use crate::tokenizer::tokenize;

const OPEN_PAREN: &str = "(";
const CLOSE_PAREN: &str = ")";

/// 语法树构建器
#[derive(Debug, Clone, Copy, Default)]
pub struct AstBuilder;

impl AstBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 将规则文本构建为语法树
    pub fn build(&self, rule: &str) -> Result<AstNode> {
        let mut state = BuildState::default();

        for token in tokenize(rule) {
            match token.as_str() {
                OPEN_PAREN => state.open_group(token),
                CLOSE_PAREN => state.close_group()?,
                other => match LogicalOperator::from_keyword(other) {
                    Some(operator) => state.push_connective(operator)?,
                    None => state.elements.push(token),
                },
            }
        }

        state.finish()
    }

    /// 以 AND 合并两棵语法树
    pub fn combine(&self, left: AstNode, right: AstNode) -> AstNode {
        AstNode::combine(left, right)
    }
}

/// 单次构建过程中的状态
#[derive(Debug, Default)]
struct BuildState {
    elements: Vec<String>,
    nodes: Vec<AstNode>,
    /// 当前未闭合的 `(` 数量
    depth: usize,
}

impl BuildState {
    fn open_group(&mut self, token: String) {
        self.depth += 1;
        self.elements.push(token);
    }

    /// 遇到 AND / OR：取左子树并压入右子树待定的连接节点
    fn push_connective(&mut self, operator: LogicalOperator) -> Result<()> {
        let left = self.take_node("连接词缺少左操作数")?;
        self.nodes
            .push(AstNode::Operator(OperatorNode::pending(operator, left)));
        Ok(())
    }

    /// 遇到 `)`
    fn close_group(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(RuleError::MismatchedParentheses(
                "')' 没有对应的 '('".to_string(),
            ));
        }
        self.depth -= 1;

        // 节点栈为空：括号内只有一个比较，没有连接词
        if self.nodes.is_empty() {
            let node = self.take_node("括号内缺少比较条件")?;
            self.nodes.push(node);
            return Ok(());
        }

        let right = self.take_node("')' 之前缺少右操作数")?;
        self.attach_right(right)?;

        match self.elements.pop() {
            Some(token) if token == OPEN_PAREN => Ok(()),
            _ => Err(RuleError::MismatchedParentheses(
                "')' 之前的元素不是 '('".to_string(),
            )),
        }
    }

    /// 输入结束：归约尾部的比较并校验只剩一棵完整的树
    fn finish(mut self) -> Result<AstNode> {
        if self.depth > 0 {
            return Err(RuleError::MalformedRule(format!(
                "存在 {} 个未闭合的 '('",
                self.depth
            )));
        }

        // 节点栈已是一棵完整的树时直接返回，尾部未归约的元素被忽略
        if matches!(self.nodes.as_slice(), [root] if root.is_complete()) {
            if let Some(root) = self.nodes.pop() {
                return Ok(root);
            }
        }

        if let Some(node) = self.reduce_operand()? {
            if self.nodes.is_empty() {
                self.nodes.push(node);
            } else {
                self.attach_right(node)?;
            }
        }

        if let Some(leftover) = self.elements.iter().find(|t| t.as_str() != OPEN_PAREN) {
            return Err(RuleError::MalformedRule(format!(
                "无法归约的词法单元: '{}'",
                leftover
            )));
        }

        if self.nodes.len() != 1 {
            return Err(RuleError::MalformedRule(format!(
                "构建结束时应只剩一个根节点，实际有 {} 个",
                self.nodes.len()
            )));
        }

        let root = self.nodes.remove(0);
        if !root.is_complete() {
            return Err(RuleError::MalformedRule(
                "连接词缺少右操作数".to_string(),
            ));
        }

        Ok(root)
    }

    /// 优先归约元素栈顶的比较，否则弹出节点栈顶
    fn take_node(&mut self, context: &str) -> Result<AstNode> {
        if let Some(node) = self.reduce_operand()? {
            return Ok(node);
        }

        self.nodes
            .pop()
            .ok_or_else(|| RuleError::MalformedRule(context.to_string()))
    }

    /// 将节点设置为节点栈顶连接节点的右子树
    fn attach_right(&mut self, right: AstNode) -> Result<()> {
        match self.nodes.last_mut() {
            Some(AstNode::Operator(node)) if node.right.is_none() => {
                node.right = Some(Box::new(right));
                Ok(())
            }
            _ => Err(RuleError::MalformedRule(
                "没有等待右操作数的连接词".to_string(),
            )),
        }
    }

    /// 将元素栈顶的三个词法单元按 `字段 操作符 值` 归约为比较节点
    ///
    /// 不足三个时返回 None，表示没有待归约的比较。
    fn reduce_operand(&mut self) -> Result<Option<AstNode>> {
        if self.elements.len() < 3 {
            return Ok(None);
        }

        let mut triple = self.elements.split_off(self.elements.len() - 3).into_iter();
        let (Some(field), Some(operator), Some(value)) =
            (triple.next(), triple.next(), triple.next())
        else {
            return Ok(None);
        };

        let operator: ComparisonOperator = operator.parse()?;
        let operand = Operand::new(field, operator, Literal::coerce(&value));

        Ok(Some(AstNode::Operand(operand)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(rule: &str) -> Result<AstNode> {
        AstBuilder::new().build(rule)
    }

    fn leaf(field: &str, operator: ComparisonOperator, value: Literal) -> AstNode {
        AstNode::operand(field, operator, value)
    }

    fn int(n: i64) -> Literal {
        Literal::Integer(n)
    }

    fn text(s: &str) -> Literal {
        Literal::Text(s.to_string())
    }

    fn op(operator: LogicalOperator, left: AstNode, right: AstNode) -> AstNode {
        AstNode::Operator(OperatorNode::new(operator, left, right))
    }

    #[test]
    fn test_single_comparison_for_every_operator() {
        for operator in ComparisonOperator::ALL {
            let rule = format!("age {} 30", operator);
            assert_eq!(
                build(&rule).unwrap(),
                leaf("age", operator, int(30)),
                "rule: {}",
                rule
            );
        }
    }

    #[test]
    fn test_string_literal_values() {
        assert_eq!(
            build("status = 'active'").unwrap(),
            leaf("status", ComparisonOperator::Eq, text("active"))
        );
        assert_eq!(
            build(r#"department = "Sales head""#).unwrap(),
            leaf("department", ComparisonOperator::Eq, text("Sales head"))
        );
        assert_eq!(
            build("status = active").unwrap(),
            leaf("status", ComparisonOperator::Eq, text("active"))
        );
    }

    #[test]
    fn test_unsupported_operator() {
        let err = build("age => 30").unwrap_err();
        assert_eq!(err, RuleError::UnsupportedOperator("=>".to_string()));

        let err = build("(age => 30 AND x = 1)").unwrap_err();
        assert_eq!(err, RuleError::UnsupportedOperator("=>".to_string()));
    }

    #[test]
    fn test_parenthesized_pair() {
        let a = leaf("age", ComparisonOperator::Gt, int(30));
        let b = leaf("dept", ComparisonOperator::Eq, text("Sales"));

        assert_eq!(
            build("(age > 30 AND dept = 'Sales')").unwrap(),
            op(LogicalOperator::And, a.clone(), b.clone())
        );
        assert_eq!(
            build("(age > 30 OR dept = 'Sales')").unwrap(),
            op(LogicalOperator::Or, a, b)
        );
    }

    #[test]
    fn test_grouped_comparisons_joined() {
        let tree = build("(age > 30) AND (missing = 1)").unwrap();

        assert_eq!(
            tree,
            op(
                LogicalOperator::And,
                leaf("age", ComparisonOperator::Gt, int(30)),
                leaf("missing", ComparisonOperator::Eq, int(1)),
            )
        );
    }

    #[test]
    fn test_nested_pairs() {
        let tree = build(
            "((age > 30 AND department != 'sales') OR (age < 25 AND department = 'Marketing manager'))",
        )
        .unwrap();

        let expected = op(
            LogicalOperator::Or,
            op(
                LogicalOperator::And,
                leaf("age", ComparisonOperator::Gt, int(30)),
                leaf("department", ComparisonOperator::Neq, text("sales")),
            ),
            op(
                LogicalOperator::And,
                leaf("age", ComparisonOperator::Lt, int(25)),
                leaf("department", ComparisonOperator::Eq, text("Marketing manager")),
            ),
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_trailing_comparison_fills_open_connective() {
        let tree = build("age > 30 AND status = 'active'").unwrap();
        assert_eq!(
            tree,
            op(
                LogicalOperator::And,
                leaf("age", ComparisonOperator::Gt, int(30)),
                leaf("status", ComparisonOperator::Eq, text("active")),
            )
        );

        let tree = build("(a = 1 AND b = 2) OR c = 3").unwrap();
        assert_eq!(
            tree,
            op(
                LogicalOperator::Or,
                op(
                    LogicalOperator::And,
                    leaf("a", ComparisonOperator::Eq, int(1)),
                    leaf("b", ComparisonOperator::Eq, int(2)),
                ),
                leaf("c", ComparisonOperator::Eq, int(3)),
            )
        );
    }

    #[test]
    fn test_unparenthesized_mixed_chain_is_malformed() {
        // OR 直接归约了 b = 2，AND 节点留在栈底无法闭合
        let err = build("a = 1 AND b = 2 OR c = 3").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule(_)));
    }

    #[test]
    fn test_close_attaches_to_most_recent_connective() {
        // 顶层两个括号组之间的连接词永远拿不到右子树
        let err = build("(a = 1 AND b = 2) OR (c = 3 AND d = 4)").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule(_)));

        // 外层再加一对括号即可闭合
        let tree = build("((a = 1 AND b = 2) OR (c = 3 AND d = 4))").unwrap();
        assert!(tree.is_complete());
        assert_eq!(tree.fields().len(), 4);
    }

    #[test]
    fn test_extra_close_paren() {
        let err = build("(age > 30 AND x = 1))").unwrap_err();
        assert!(matches!(err, RuleError::MismatchedParentheses(_)));

        let err = build("age > 30)").unwrap_err();
        assert!(matches!(err, RuleError::MismatchedParentheses(_)));
    }

    #[test]
    fn test_unterminated_open_paren() {
        let err = build("(age > 30").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule(_)));

        let err = build("(age > 30 AND x = 1").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule(_)));
    }

    #[test]
    fn test_malformed_inputs() {
        for rule in [
            "",
            "AND",
            "age >",
            "()",
            "(a = 1 AND)",
            "a = 1 AND",
            "a = 1 b = 2",
            "x a = 1",
            "ORDER = 5",
        ] {
            let err = build(rule).unwrap_err();
            assert!(
                matches!(err, RuleError::MalformedRule(_)),
                "rule {:?} gave {:?}",
                rule,
                err
            );
        }
    }

    #[test]
    fn test_dangling_connective_inside_tree() {
        // 第一个 AND 被第二个连接词弹出作为左子树，却从未获得右子树
        let err = build("a = 1 AND OR b = 2").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule(_)));
    }

    #[test]
    fn test_trailing_tokens_after_complete_tree_are_ignored() {
        assert_eq!(
            build("(age > 30) x").unwrap(),
            leaf("age", ComparisonOperator::Gt, int(30))
        );

        // 末尾的三个元素不会再被当作比较归约
        assert_eq!(
            build("(a = 1) AND (b = 2) ; drop table").unwrap(),
            op(
                LogicalOperator::And,
                leaf("a", ComparisonOperator::Eq, int(1)),
                leaf("b", ComparisonOperator::Eq, int(2)),
            )
        );

        // 树尚未完整时，尾部元素仍参与归约与校验
        let err = build("x a = 1").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule(_)));
    }

    #[test]
    fn test_display_rebuilds_same_tree() {
        for rule in [
            "age > 30",
            "(age > 30 AND dept = 'Sales')",
            "((a = 1 AND b != 'x') OR (c < 3 AND d >= 4))",
            "(a = 1 AND (b = 2 OR c = 3))",
        ] {
            let tree = build(rule).unwrap();
            let rendered = tree.to_string();
            assert_eq!(build(&rendered).unwrap(), tree, "rendered: {}", rendered);
        }
    }

    #[test]
    fn test_combine() {
        let builder = AstBuilder::new();
        let left = builder.build("age > 30").unwrap();
        let right = builder.build("status = 'active'").unwrap();

        let combined = builder.combine(left.clone(), right.clone());
        assert_eq!(combined, op(LogicalOperator::And, left, right));
    }
}
