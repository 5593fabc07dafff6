//! 规则管理器
//!
//! 组合构建器与评估器，对外提供创建、合并、评估三种操作。
//! 不持有任何可变状态，可在多个任务间克隆共享。

use crate::builder::AstBuilder;
use crate::error::{Result, RuleError};
use crate::evaluator::RuleEvaluator;
use crate::models::{AstNode, Record};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleManager {
    builder: AstBuilder,
    evaluator: RuleEvaluator,
}

impl RuleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建规则：将规则文本构建为语法树
    #[instrument(level = "debug", skip(self))]
    pub fn create_rule(&self, rule: &str) -> Result<AstNode> {
        let root = self.builder.build(rule)?;
        debug!(fields = root.fields().len(), "规则已构建");
        Ok(root)
    }

    /// 合并规则：逐条构建后依次以 AND 左折叠
    ///
    /// 任意一条构建失败即返回错误；规则列表为空时返回 `EmptyInput`。
    #[instrument(level = "debug", skip_all)]
    pub fn combine_rules<I, S>(&self, rules: I) -> Result<AstNode>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut combined: Option<AstNode> = None;
        let mut count = 0usize;

        for rule in rules {
            let node = self.builder.build(rule.as_ref())?;
            combined = Some(match combined {
                Some(acc) => self.builder.combine(acc, node),
                None => node,
            });
            count += 1;
        }

        let root = combined.ok_or(RuleError::EmptyInput)?;
        debug!(rules = count, "规则已合并");
        Ok(root)
    }

    /// 评估规则：构建语法树后对记录求值
    #[instrument(level = "debug", skip(self, record))]
    pub fn evaluate_rule<R: Record + ?Sized>(&self, rule: &str, record: &R) -> Result<bool> {
        let root = self.builder.build(rule)?;
        Ok(self.evaluate_ast(&root, record))
    }

    /// 对已构建的语法树求值
    pub fn evaluate_ast<R: Record + ?Sized>(&self, root: &AstNode, record: &R) -> bool {
        let passed = self.evaluator.evaluate(root, record);
        debug!(passed, "规则评估完成");
        passed
    }
}
