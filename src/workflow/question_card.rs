//! 单道题的交互流程
//!
//! - 背题模式：答案直接揭晓，不接受作答
//! - 答题模式：只能选一次，选完揭晓对错

use crate::error::CardError;
use crate::models::{Mode, QuestionRecord};

/// 答案越界时展示的文本
const UNKNOWN_ANSWER: &str = "Unknown";

/// 作答反馈
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub selected: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    /// 是否展开反馈文字：答错时总是展开，答对时只在有解析时展开
    pub show_details: bool,
    pub details: String,
}

/// 题卡
#[derive(Debug, Clone)]
pub struct QuestionCard<'a> {
    record: &'a QuestionRecord,
    mode: Mode,
    selection: Option<usize>,
}

impl<'a> QuestionCard<'a> {
    pub fn new(record: &'a QuestionRecord, mode: Mode) -> Self {
        Self {
            record,
            mode,
            selection: None,
        }
    }

    /// 恢复之前的作答
    pub fn with_selection(record: &'a QuestionRecord, mode: Mode, selection: Option<usize>) -> Self {
        Self {
            record,
            mode,
            selection,
        }
    }

    pub fn record(&self) -> &'a QuestionRecord {
        self.record
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// 是否已经揭晓答案
    pub fn is_revealed(&self) -> bool {
        self.mode == Mode::Study || self.selection.is_some()
    }

    /// 作答，`index` 从 0 开始
    pub fn select(&mut self, index: usize) -> Result<Feedback, CardError> {
        if self.mode == Mode::Study {
            return Err(CardError::StudyMode);
        }
        if self.selection.is_some() {
            return Err(CardError::AlreadyAnswered);
        }
        let option_count = self.record.options.len();
        if index >= option_count {
            return Err(CardError::InvalidOption {
                index,
                max_index: option_count.saturating_sub(1),
            });
        }

        self.selection = Some(index);
        self.feedback().ok_or(CardError::AlreadyAnswered)
    }

    /// 已作答时的反馈
    pub fn feedback(&self) -> Option<Feedback> {
        let selected = self.selection?;
        let is_correct = selected == self.record.answer_index;
        Some(Feedback {
            selected,
            correct_index: self.record.answer_index,
            is_correct,
            show_details: !is_correct || self.record.has_explanation(),
            details: self.quiz_details(),
        })
    }

    /// 背题模式下的说明：正确答案 + 解析
    pub fn study_details(&self) -> String {
        let mut text = format!("Correct answer: {}", self.correct_text());
        if let Some(explanation) = self.explanation() {
            text.push('\n');
            text.push_str(explanation);
        }
        text
    }

    fn quiz_details(&self) -> String {
        match self.explanation() {
            Some(explanation) => format!("Explanation: {}", explanation),
            None => format!("Correct answer was: {}", self.correct_text()),
        }
    }

    fn correct_text(&self) -> &str {
        self.record.correct_option().unwrap_or(UNKNOWN_ANSWER)
    }

    fn explanation(&self) -> Option<&str> {
        self.record
            .explanation
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(explanation: Option<&str>) -> QuestionRecord {
        QuestionRecord {
            id: 1,
            category: "GK".to_string(),
            topic: "GEO".to_string(),
            title: "Capital of France?".to_string(),
            options: vec!["Paris".to_string(), "London".to_string(), "Berlin".to_string()],
            answer_index: 0,
            explanation: explanation.map(str::to_string),
        }
    }

    #[test]
    fn quiz_allows_a_single_answer() {
        let r = record(None);
        let mut card = QuestionCard::new(&r, Mode::Quiz);
        assert!(!card.is_revealed());

        let feedback = card.select(1).unwrap();
        assert!(!feedback.is_correct);
        assert!(feedback.show_details);
        assert_eq!(feedback.details, "Correct answer was: Paris");
        assert!(card.is_revealed());

        assert_eq!(card.select(0), Err(CardError::AlreadyAnswered));
    }

    #[test]
    fn correct_answer_hides_details_without_explanation() {
        let r = record(None);
        let feedback = QuestionCard::new(&r, Mode::Quiz).select(0).unwrap();
        assert!(feedback.is_correct);
        assert!(!feedback.show_details);

        let r = record(Some("Since 508 AD."));
        let feedback = QuestionCard::new(&r, Mode::Quiz).select(0).unwrap();
        assert!(feedback.show_details);
        assert_eq!(feedback.details, "Explanation: Since 508 AD.");
    }

    #[test]
    fn study_mode_reveals_without_answering() {
        let r = record(Some("Since 508 AD."));
        let mut card = QuestionCard::new(&r, Mode::Study);
        assert!(card.is_revealed());
        assert_eq!(card.study_details(), "Correct answer: Paris\nSince 508 AD.");
        assert_eq!(card.select(0), Err(CardError::StudyMode));
    }

    #[test]
    fn invalid_option_is_rejected() {
        let r = record(None);
        let mut card = QuestionCard::new(&r, Mode::Quiz);
        assert_eq!(
            card.select(3),
            Err(CardError::InvalidOption { index: 3, max_index: 2 })
        );
        assert!(card.selection().is_none());
    }

    #[test]
    fn out_of_range_answer_shows_unknown() {
        let mut r = record(None);
        r.answer_index = 9;
        let card = QuestionCard::new(&r, Mode::Study);
        assert_eq!(card.study_details(), "Correct answer: Unknown");
    }
}
