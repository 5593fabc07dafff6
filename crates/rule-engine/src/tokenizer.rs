//! 规则文本分词
//!
//! 将规则字符串切分为按出现顺序排列的词法单元。无法识别的字符不会报错，
//! 而是直接被丢弃，非法输入需要由构建阶段发现。

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// 词法单元匹配规则，按优先级排列：
/// 双字符操作符与连接词、括号、单字符操作符、单引号字符串、单词/数字
///
/// 连接词不要求单词边界，`ORDER` 会被切成 `OR` 与 `DER`。
/// 单词只匹配 ASCII 字符，非 ASCII 标识符会被丢弃。
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(<=|>=|!=|=>|AND|OR|\(|\)|<|>|=|'[^']*'|(?-u:\w)+)\s*")
        .expect("token pattern must compile")
});

/// 将双引号统一替换为单引号
pub fn normalize_quotes(rule: &str) -> Cow<'_, str> {
    if rule.contains('"') {
        Cow::Owned(rule.replace('"', "'"))
    } else {
        Cow::Borrowed(rule)
    }
}

/// 分词
///
/// 每个词法单元两侧的空白会被去除；字符串字面量保留外层单引号。
pub fn tokenize(rule: &str) -> Vec<String> {
    let normalized = normalize_quotes(rule);

    TOKEN_PATTERN
        .captures_iter(&normalized)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_comparison() {
        assert_eq!(tokenize("age > 30"), vec!["age", ">", "30"]);
        assert_eq!(tokenize("age>30"), vec!["age", ">", "30"]);
    }

    #[test]
    fn test_two_char_operators_take_priority() {
        assert_eq!(tokenize("a >= 1"), vec!["a", ">=", "1"]);
        assert_eq!(tokenize("a<=1"), vec!["a", "<=", "1"]);
        assert_eq!(tokenize("a != 'x'"), vec!["a", "!=", "'x'"]);
        assert_eq!(tokenize("a => 1"), vec!["a", "=>", "1"]);
    }

    #[test]
    fn test_connectives_and_parentheses() {
        assert_eq!(
            tokenize("(age > 30 AND dept = 'Sales') OR (x < 2)"),
            vec![
                "(", "age", ">", "30", "AND", "dept", "=", "'Sales'", ")", "OR", "(", "x", "<",
                "2", ")"
            ]
        );
    }

    #[test]
    fn test_double_quotes_normalized() {
        assert_eq!(
            tokenize(r#"department = "Sales head""#),
            vec!["department", "=", "'Sales head'"]
        );
    }

    #[test]
    fn test_keywords_split_leading_identifiers() {
        // 连接词优先于单词匹配，以 OR / AND 开头的字段名会被拆开
        assert_eq!(tokenize("ORDER = 5"), vec!["OR", "DER", "=", "5"]);
        assert_eq!(tokenize("ANDROID = 1"), vec!["AND", "ROID", "=", "1"]);
        // 连接词只在单词开头被识别
        assert_eq!(tokenize("COLOR = 1"), vec!["COLOR", "=", "1"]);
        // 小写不是连接词
        assert_eq!(tokenize("a = 1 and b = 2"), vec!["a", "=", "1", "and", "b", "=", "2"]);
    }

    #[test]
    fn test_unrecognized_characters_are_dropped() {
        // 当前行为：无法识别的字符被静默丢弃而不是报错
        assert_eq!(tokenize("age > 30 ; # @"), vec!["age", ">", "30"]);
        assert_eq!(tokenize("score > 3.5"), vec!["score", ">", "3", "5"]);
        assert_eq!(tokenize("a ! b"), vec!["a", "b"]);
        assert!(tokenize("  ").is_empty());
    }

    #[test]
    fn test_unterminated_quote_splits_into_words() {
        assert_eq!(tokenize("name = 'bob"), vec!["name", "=", "bob"]);
    }

    #[test]
    fn test_non_ascii_identifiers_are_dropped() {
        assert_eq!(tokenize("年龄 > 30"), vec![">", "30"]);
        // 字符串字面量内部不受影响
        assert_eq!(tokenize("dept = '销售'"), vec!["dept", "=", "'销售'"]);
    }

    #[test]
    fn test_tokenizing_is_stable() {
        let rule = r#"((age > 30 AND department = "Sales head") OR (age < 25))"#;

        let normalized = normalize_quotes(rule);
        assert_eq!(tokenize(&normalized), tokenize(rule));

        let first = tokenize(rule);
        let second = tokenize(&first.join(" "));
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_borrows_when_unchanged() {
        assert!(matches!(normalize_quotes("a = 'x'"), Cow::Borrowed(_)));
        assert_eq!(normalize_quotes(r#"a = "x""#), "a = 'x'");
    }
}
