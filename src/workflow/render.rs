//! 纯文本渲染

use crate::models::{CategoryTree, Mode, ViewState};
use crate::services::{PageView, View};
use crate::workflow::question_card::{Feedback, QuestionCard};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

/// 没有任何题目通过筛选时的提示
pub const NO_RESULTS: &str = "没有找到题目，请调整筛选条件或搜索关键词。";

/// 渲染一张题卡
///
/// `position` 为筛选结果中的序号，`slot` 为本页内的题号（作答命令用）
pub fn render_card(card: &QuestionCard<'_>, position: usize, slot: usize, in_cart: bool) -> String {
    let record = card.record();
    let mut out = String::new();

    let star = if in_cart { " ★" } else { "" };
    let _ = writeln!(
        out,
        "[{}] {} / {}  #{}{}",
        slot, record.category, record.topic, position, star
    );
    let _ = writeln!(out, "{}", record.title);

    for (i, option) in record.options.iter().enumerate() {
        let mark = if card.is_revealed() && i == record.answer_index {
            " ✔"
        } else if card.selection() == Some(i) {
            " ✘"
        } else {
            ""
        };
        let _ = writeln!(out, "  {}) {}{}", i + 1, option, mark);
    }

    if let Some(feedback) = card.feedback() {
        if feedback.show_details {
            let _ = writeln!(out, "  {}", feedback.details);
        }
    } else if card.is_revealed() {
        for line in card.study_details().lines() {
            let _ = writeln!(out, "  {}", line);
        }
    }

    out
}

/// 渲染作答结果
pub fn render_feedback(feedback: &Feedback) -> String {
    let verdict = if feedback.is_correct {
        "✅ 回答正确".to_string()
    } else {
        format!("❌ 回答错误，正确答案是第 {} 项", feedback.correct_index + 1)
    };
    if feedback.show_details {
        format!("{}\n{}", verdict, feedback.details)
    } else {
        verdict
    }
}

/// 渲染一页题目和分页信息
pub fn render_view(
    view: &View<'_>,
    state: &ViewState,
    answers: &HashMap<u64, usize>,
    last_updated: Option<&str>,
) -> String {
    let page = match view {
        View::NoResults => return NO_RESULTS.to_string(),
        View::Page(page) => page,
    };

    let mut out = String::new();
    for (i, record) in page.items.iter().enumerate() {
        let selection = match state.mode {
            Mode::Quiz => answers.get(&record.id).copied(),
            Mode::Study => None,
        };
        let card = QuestionCard::with_selection(record, state.mode, selection);
        out.push_str(&render_card(
            &card,
            page.first_position + i,
            i + 1,
            state.cart.contains(&record.id),
        ));
        out.push('\n');
    }
    out.push_str(&render_pagination(page, state));
    if let Some(date) = last_updated {
        let _ = write!(out, "\n最后更新: {}", date);
    }
    out
}

/// 分页 / 筛选状态行
pub fn render_pagination(page: &PageView<'_>, state: &ViewState) -> String {
    let mode = match state.mode {
        Mode::Quiz => "答题",
        Mode::Study => "背题",
    };
    let mut flags = Vec::new();
    if state.shuffle {
        flags.push("乱序");
    }
    if state.cart_only {
        flags.push("仅收藏");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };

    format!(
        "第 {}/{} 页 · 共 {} 题 · 分类: {} · 主题: {} · 模式: {}{}",
        page.page,
        page.total_pages,
        page.total_matches,
        String::from(state.cat_filter.clone()),
        String::from(state.topic_filter.clone()),
        mode,
        flags
    )
}

/// 分类树，附带每个分类 / 主题的题目数量
pub fn render_tree(tree: &CategoryTree, cart: &BTreeSet<u64>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "全部分类 ({})", tree.total());
    for (category, topics) in tree.iter() {
        let _ = writeln!(out, "├─ {} ({})", category, tree.category_count(category));
        for (topic, count) in topics {
            let _ = writeln!(out, "│  └─ {} ({})", topic, count);
        }
    }
    let _ = write!(out, "收藏: {} 题", cart.len());
    out
}
