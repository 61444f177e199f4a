//! 题目文本解析服务 - 业务能力层
//!
//! 文本格式是两行一题：
//!
//! ```text
//! What is 2+2?
//! 3|4|5|6|1
//! Capital of France?
//! Paris|London|Berlin|0|The capital since centuries.
//! ```
//!
//! 第二行最后一个字段是数字时它就是答案下标（从 0 开始），
//! 否则它是解析，倒数第二个字段才是答案下标。

use crate::config::ParserMode;
use crate::models::{IdSequence, QuestionRecord};
use regex::Regex;
use std::fmt;
use tracing::debug;

/// 灵活格式下至少需要的选项数
const MIN_OPTIONS: usize = 2;
/// 旧格式固定字段数：4 个选项 + 答案 + 解析
const LEGACY_FIELDS: usize = 6;
const LEGACY_OPTIONS: usize = 4;

/// 某一对行被丢弃的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 题干行或选项行为空
    BlankLine,
    /// 选项不足
    TooFewOptions { found: usize },
    /// 找不到答案字段
    MissingAnswer,
    /// 答案字段不是非负整数
    InvalidAnswer(String),
    /// 旧格式字段数不足
    FieldCount { found: usize, expected: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BlankLine => write!(f, "空行"),
            SkipReason::TooFewOptions { found } => {
                write!(f, "选项不足: {} 个 (至少 {})", found, MIN_OPTIONS)
            }
            SkipReason::MissingAnswer => write!(f, "缺少答案字段"),
            SkipReason::InvalidAnswer(value) => write!(f, "答案字段无效: '{}'", value),
            SkipReason::FieldCount { found, expected } => {
                write!(f, "字段数 {} 少于 {}", found, expected)
            }
        }
    }
}

/// 解析警告，`line` 为题干行的行号（从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line: usize,
    pub reason: SkipReason,
}

/// 单个文本的解析结果
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub records: Vec<QuestionRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// 从第二行拆出来的字段
struct Fields {
    options: Vec<String>,
    answer_index: usize,
    explanation: Option<String>,
}

/// 题目文本解析器
///
/// 永不失败：解析不了的行对直接跳过并记一条警告，后面的题照常解析
pub struct RecordParser {
    mode: ParserMode,
    number: Regex,
}

impl RecordParser {
    pub fn new(mode: ParserMode) -> Self {
        Self {
            mode,
            number: Regex::new(r"^-?\d+(\.\d+)?$").expect("number pattern is valid"),
        }
    }

    /// 解析一个题目文件
    ///
    /// # 参数
    /// - `text`: 文件全文
    /// - `category` / `topic`: 写入每条记录的分组
    /// - `ids`: 全局编号序列，保证跨文件唯一
    pub fn parse(
        &self,
        text: &str,
        category: &str,
        topic: &str,
        ids: &mut IdSequence,
    ) -> ParseOutcome {
        let normalized = text.replace("\r\n", "\n");
        let lines: Vec<&str> = normalized.split('\n').collect();
        let mut outcome = ParseOutcome::default();

        // 奇数行时最后一行没有配对，直接丢弃
        for (pair_index, pair) in lines.chunks_exact(2).enumerate() {
            let line_no = pair_index * 2 + 1;
            let title_line = pair[0].trim();
            let field_line = pair[1].trim();

            if title_line.is_empty() && field_line.is_empty() {
                continue;
            }

            let title = title_line.replace("**", "").trim().to_string();
            if title.is_empty() || field_line.is_empty() {
                outcome.warn(line_no, SkipReason::BlankLine);
                continue;
            }

            match self.split_fields(field_line) {
                Ok(fields) => outcome.records.push(QuestionRecord {
                    id: ids.next_id(),
                    category: category.to_string(),
                    topic: topic.to_string(),
                    title,
                    options: fields.options,
                    answer_index: fields.answer_index,
                    explanation: fields.explanation,
                }),
                Err(reason) => outcome.warn(line_no, reason),
            }
        }

        outcome
    }

    fn split_fields(&self, field_line: &str) -> Result<Fields, SkipReason> {
        let mut parts: Vec<&str> = field_line.split('|').map(str::trim).collect();
        if parts.last() == Some(&"") {
            parts.pop();
        }

        match self.mode {
            ParserMode::Flexible => self.split_flexible(&parts),
            ParserMode::Legacy => self.split_legacy(&parts),
        }
    }

    fn split_flexible(&self, parts: &[&str]) -> Result<Fields, SkipReason> {
        let (last, rest) = parts.split_last().ok_or(SkipReason::MissingAnswer)?;

        let (options, answer, explanation) = if self.is_number(last) {
            (rest, *last, None)
        } else {
            let (answer, options) = rest.split_last().ok_or(SkipReason::MissingAnswer)?;
            if !self.is_number(answer) {
                return Err(SkipReason::InvalidAnswer(answer.to_string()));
            }
            (options, *answer, Some(*last))
        };

        if options.len() < MIN_OPTIONS {
            return Err(SkipReason::TooFewOptions {
                found: options.len(),
            });
        }

        Ok(Fields {
            options: options.iter().map(|o| o.to_string()).collect(),
            answer_index: parse_index(answer)?,
            explanation: explanation.filter(|e| !e.is_empty()).map(str::to_string),
        })
    }

    fn split_legacy(&self, parts: &[&str]) -> Result<Fields, SkipReason> {
        if parts.len() < LEGACY_FIELDS {
            return Err(SkipReason::FieldCount {
                found: parts.len(),
                expected: LEGACY_FIELDS,
            });
        }

        let answer = parts[LEGACY_OPTIONS];
        if !self.is_number(answer) {
            return Err(SkipReason::InvalidAnswer(answer.to_string()));
        }
        // 解析里本身可能带 `|`
        let explanation = parts[LEGACY_OPTIONS + 1..].join("|");

        Ok(Fields {
            options: parts[..LEGACY_OPTIONS].iter().map(|o| o.to_string()).collect(),
            answer_index: parse_index(answer)?,
            explanation: Some(explanation).filter(|e| !e.is_empty()),
        })
    }

    fn is_number(&self, value: &str) -> bool {
        self.number.is_match(value)
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(ParserMode::default())
    }
}

impl ParseOutcome {
    fn warn(&mut self, line: usize, reason: SkipReason) {
        debug!("跳过第 {} 行开始的题目: {}", line, reason);
        self.warnings.push(ParseWarning { line, reason });
    }
}

fn parse_index(value: &str) -> Result<usize, SkipReason> {
    value
        .parse()
        .map_err(|_| SkipReason::InvalidAnswer(value.to_string()))
}
