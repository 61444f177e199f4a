//! 筛选 / 分页服务
//!
//! 纯函数：同样的输入（不打乱时）得到同样的输出，从不修改题目列表

use crate::models::{QuestionRecord, SortDirection, ViewState};
use rand::seq::SliceRandom;
use rand::Rng;

/// 当前页
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    pub items: Vec<&'a QuestionRecord>,
    /// 钳制后的页码（从 1 开始）
    pub page: usize,
    pub total_pages: usize,
    /// 通过筛选的题目总数
    pub total_matches: usize,
    /// 本页第一题在筛选结果中的序号（从 1 开始）
    pub first_position: usize,
}

/// 计算结果：没有任何题目通过筛选时与"页码越界"区分开
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    NoResults,
    Page(PageView<'a>),
}

impl<'a> View<'a> {
    pub fn page(&self) -> Option<&PageView<'a>> {
        match self {
            View::NoResults => None,
            View::Page(page) => Some(page),
        }
    }
}

/// 总页数 = ceil(count / page_size)
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// 把请求的页码钳制到 `[1, total_pages]`
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

pub fn compute_view<'a>(records: &'a [QuestionRecord], state: &ViewState) -> View<'a> {
    compute_view_with_rng(records, state, &mut rand::thread_rng())
}

/// 筛选 → 打乱或排序 → 切页
pub fn compute_view_with_rng<'a, R: Rng + ?Sized>(
    records: &'a [QuestionRecord],
    state: &ViewState,
    rng: &mut R,
) -> View<'a> {
    let mut matched: Vec<&QuestionRecord> = records.iter().filter(|r| state.accepts(r)).collect();
    if matched.is_empty() {
        return View::NoResults;
    }

    if state.shuffle {
        matched.shuffle(rng);
    } else {
        match state.sort {
            SortDirection::Asc => matched.sort_by_key(|r| r.id),
            SortDirection::Desc => matched.sort_by(|a, b| b.id.cmp(&a.id)),
        }
    }

    let page_size = state.page_size.max(1);
    let total_matches = matched.len();
    let total_pages = total_pages(total_matches, page_size);
    let page = clamp_page(state.current_page, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_matches);

    View::Page(PageView {
        items: matched[start..end].to_vec(),
        page,
        total_pages,
        total_matches,
        first_position: start + 1,
    })
}
