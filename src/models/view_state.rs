use crate::models::category_tree::CategoryTree;
use crate::models::question::QuestionRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 显示模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// 先选再揭晓
    #[default]
    Quiz,
    /// 直接显示答案
    Study,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiz" => Ok(Mode::Quiz),
            "study" => Ok(Mode::Study),
            other => Err(other.to_string()),
        }
    }
}

/// 按 id 排序的方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(other.to_string()),
        }
    }
}

/// 分类 / 主题筛选条件，持久化时 `Any` 写成 `"all"`
///
/// 只有小写的 `"all"` 是哨兵值，`"All"` 等按名字匹配
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Filter {
    #[default]
    Any,
    Only(String),
}

impl Filter {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Filter::Any => true,
            Filter::Only(expected) => expected == value,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Filter::Any)
    }
}

impl From<String> for Filter {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "all" {
            Filter::Any
        } else {
            Filter::Only(trimmed.to_string())
        }
    }
}

impl From<&str> for Filter {
    fn from(value: &str) -> Self {
        Filter::from(value.to_string())
    }
}

impl From<Filter> for String {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Any => "all".to_string(),
            Filter::Only(value) => value,
        }
    }
}

/// 视图状态
///
/// 由命令修改，部分字段会镜像到本地设置文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub mode: Mode,
    pub cat_filter: Filter,
    pub topic_filter: Filter,
    #[serde(skip)]
    pub search_query: String,
    pub shuffle: bool,
    pub sort: SortDirection,
    pub current_page: usize,
    #[serde(skip)]
    pub page_size: usize,
    /// 收藏的题目 id
    pub cart: BTreeSet<u64>,
    pub cart_only: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: Mode::Quiz,
            cat_filter: Filter::Any,
            topic_filter: Filter::Any,
            search_query: String::new(),
            shuffle: false,
            sort: SortDirection::Asc,
            current_page: 1,
            page_size: 20,
            cart: BTreeSet::new(),
            cart_only: false,
        }
    }
}

impl ViewState {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// 判断一道题是否通过当前筛选
    pub fn accepts(&self, record: &QuestionRecord) -> bool {
        if !self.cat_filter.matches(&record.category) {
            return false;
        }
        if !self.topic_filter.matches(&record.topic) {
            return false;
        }
        if self.cart_only && !self.cart.contains(&record.id) {
            return false;
        }
        let query = self.search_query.trim();
        query.is_empty() || record.title.to_lowercase().contains(&query.to_lowercase())
    }

    /// 切换分类：清空搜索和主题，回到第一页
    pub fn select_category(&mut self, filter: Filter) {
        self.cat_filter = filter;
        self.topic_filter = Filter::Any;
        self.search_query.clear();
        self.current_page = 1;
    }

    pub fn select_topic(&mut self, filter: Filter) {
        self.topic_filter = filter;
        self.current_page = 1;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.current_page = 1;
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        self.current_page = 1;
    }

    /// 收藏 / 取消收藏，返回操作后是否在收藏中
    pub fn toggle_cart(&mut self, id: u64) -> bool {
        if self.cart.remove(&id) {
            false
        } else {
            self.cart.insert(id);
            true
        }
    }

    /// 设置里保存的分类或主题已不存在时回退为全部
    pub fn reconcile(&mut self, tree: &CategoryTree) {
        if let Filter::Only(category) = &self.cat_filter {
            if !tree.contains_category(category) {
                self.cat_filter = Filter::Any;
                self.topic_filter = Filter::Any;
            }
        }
        if let Filter::Only(topic) = &self.topic_filter {
            if !tree.contains_topic(&self.cat_filter, topic) {
                self.topic_filter = Filter::Any;
            }
        }
        if self.current_page == 0 {
            self.current_page = 1;
        }
    }
}
