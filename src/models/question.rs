use serde::{Deserialize, Serialize};

/// 一道选择题
///
/// 创建后不再修改。`id` 是插入顺序号，也是默认排序键
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: u64,
    pub category: String,
    pub topic: String,
    pub title: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuestionRecord {
    /// 正确选项的文本；答案越界时返回 None
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.answer_index).map(String::as_str)
    }

    /// 解析是否非空
    pub fn has_explanation(&self) -> bool {
        self.explanation
            .as_deref()
            .map(|e| !e.trim().is_empty())
            .unwrap_or(false)
    }
}

/// 清单条目 `{path, title}`
///
/// 根清单和分类清单共用；老格式的分类清单里 `title` 可能缺失
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl ManifestEntry {
    /// 展示用名称：有标题用标题，否则从路径推导
    pub fn display_name(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => topic_name_from_path(&self.path),
        }
    }
}

/// 从文件路径推导主题名：去目录、去扩展名、下划线换空格、转大写
///
/// `data/gk/world_history.txt` → `WORLD HISTORY`
pub fn topic_name_from_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = match file_name.rfind('.') {
        Some(pos) if pos > 0 => &file_name[..pos],
        _ => file_name,
    };
    stem.replace('_', " ").to_uppercase()
}

/// 全局递增的题目编号
#[derive(Debug, Default, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取下一个编号
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}
