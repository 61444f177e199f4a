//! 浏览会话
//!
//! 持有已加载的题库和视图状态，一次处理一条命令

use crate::error::{AppError, AppResult, CardError, CommandError};
use crate::models::{Filter, ViewState};
use crate::orchestrator::QuestionStore;
use crate::services::{compute_view_with_rng, total_pages, SettingsStore, View};
use crate::workflow::command::{Command, HELP};
use crate::workflow::question_card::QuestionCard;
use crate::workflow::render;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::warn;

/// 命令执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 输出文本，继续会话
    Show(String),
    Quit,
}

/// 浏览会话
pub struct Session {
    store: QuestionStore,
    state: ViewState,
    /// 题目 id → 已选选项（从 0 开始）
    answers: HashMap<u64, usize>,
    /// 乱序种子：筛选条件不变时翻页保持同一顺序
    shuffle_seed: u64,
    settings: Option<SettingsStore>,
    last_updated: Option<String>,
}

impl Session {
    pub fn new(store: QuestionStore, mut state: ViewState) -> Self {
        state.reconcile(store.tree());
        Self {
            store,
            state,
            answers: HashMap::new(),
            shuffle_seed: rand::thread_rng().gen(),
            settings: None,
            last_updated: None,
        }
    }

    /// 状态变化后写回本地设置
    pub fn with_settings(mut self, settings: SettingsStore) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_last_updated(mut self, last_updated: Option<String>) -> Self {
        self.last_updated = last_updated;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    /// 渲染当前页，同时把钳制后的页码写回状态
    pub fn render(&mut self) -> String {
        let mut rng = StdRng::seed_from_u64(self.shuffle_seed);
        let view = compute_view_with_rng(self.store.records(), &self.state, &mut rng);
        self.state.current_page = match &view {
            View::Page(page) => page.page,
            View::NoResults => 1,
        };
        render::render_view(&view, &self.state, &self.answers, self.last_updated.as_deref())
    }

    /// 执行一条命令
    pub fn apply(&mut self, command: Command) -> AppResult<Reply> {
        match command {
            Command::Quit => return Ok(Reply::Quit),
            Command::Help => return Ok(Reply::Show(HELP.to_string())),
            Command::Tree => {
                return Ok(Reply::Show(render::render_tree(
                    self.store.tree(),
                    &self.state.cart,
                )))
            }
            Command::Answer { card, option } => return self.answer(card, option),
            Command::ToggleCart(card) => return self.toggle_cart(card),
            Command::Next => self.state.current_page = self.state.current_page.saturating_add(1),
            Command::Prev => self.state.current_page = self.state.current_page.saturating_sub(1),
            Command::Goto(page) => self.state.current_page = page.clamp(1, self.total_pages()),
            Command::Category(filter) => {
                let tree = self.store.tree();
                let filter = all_unless_named(filter, |name| tree.contains_category(name));
                self.state.select_category(filter);
                self.reseed();
            }
            Command::Topic(filter) => {
                let tree = self.store.tree();
                let category = &self.state.cat_filter;
                let filter = all_unless_named(filter, |name| tree.contains_topic(category, name));
                self.state.select_topic(filter);
                self.reseed();
            }
            Command::Search(query) => {
                self.state.set_search(query);
                self.reseed();
            }
            Command::Mode(mode) => self.state.mode = mode,
            Command::ToggleShuffle => {
                self.state.toggle_shuffle();
                self.reseed();
            }
            Command::Sort(direction) => {
                self.state.sort = direction;
                self.state.current_page = 1;
            }
            Command::CartOnly => {
                self.state.cart_only = !self.state.cart_only;
                self.state.current_page = 1;
            }
        }

        let text = self.render();
        self.persist();
        Ok(Reply::Show(text))
    }

    fn answer(&mut self, slot: usize, option: usize) -> AppResult<Reply> {
        let id = self.id_in_slot(slot)?;
        let record = self.store.get(id).ok_or_else(|| bad_slot(slot))?;
        let mut card =
            QuestionCard::with_selection(record, self.state.mode, self.answers.get(&id).copied());
        let index = option.checked_sub(1).ok_or(CardError::InvalidOption {
            index: 0,
            max_index: record.options.len().saturating_sub(1),
        })?;
        let feedback = card.select(index)?;

        self.answers.insert(id, feedback.selected);
        Ok(Reply::Show(render::render_feedback(&feedback)))
    }

    fn toggle_cart(&mut self, slot: usize) -> AppResult<Reply> {
        let id = self.id_in_slot(slot)?;
        let added = self.state.toggle_cart(id);
        self.persist();
        let text = if added { "★ 已收藏" } else { "已取消收藏" };
        Ok(Reply::Show(text.to_string()))
    }

    /// 本页第 `slot` 题（从 1 开始）的 id
    fn id_in_slot(&mut self, slot: usize) -> AppResult<u64> {
        let mut rng = StdRng::seed_from_u64(self.shuffle_seed);
        let ids: Vec<u64> = match compute_view_with_rng(self.store.records(), &self.state, &mut rng) {
            View::Page(page) => {
                self.state.current_page = page.page;
                page.items.iter().map(|r| r.id).collect()
            }
            View::NoResults => Vec::new(),
        };

        slot.checked_sub(1)
            .and_then(|i| ids.get(i))
            .copied()
            .ok_or_else(|| bad_slot(slot))
    }

    /// 当前筛选下的总页数，没有结果时为 1
    fn total_pages(&self) -> usize {
        let matches = self
            .store
            .records()
            .iter()
            .filter(|r| self.state.accepts(r))
            .count();
        total_pages(matches, self.state.page_size).max(1)
    }

    fn reseed(&mut self) {
        self.shuffle_seed = rand::thread_rng().gen();
    }

    fn persist(&self) {
        if let Some(settings) = &self.settings {
            if let Err(e) = settings.save(&self.state) {
                warn!("⚠️ 保存设置失败: {}", e);
            }
        }
    }
}

/// 输入 `all`（不区分大小写）且没有同名分类 / 主题时表示全部
fn all_unless_named(filter: Filter, exists: impl Fn(&str) -> bool) -> Filter {
    match filter {
        Filter::Only(name) if name.eq_ignore_ascii_case("all") && !exists(&name) => Filter::Any,
        other => other,
    }
}

fn bad_slot(slot: usize) -> AppError {
    AppError::Command(CommandError::InvalidArgument {
        value: slot.to_string(),
        expected: "本页题号",
    })
}
