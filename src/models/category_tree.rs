use crate::models::question::QuestionRecord;
use crate::models::view_state::Filter;
use std::collections::BTreeMap;

/// 分类 → 主题 → 题目数量
///
/// 只用于展示，筛选永远基于扁平的题目列表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTree {
    categories: BTreeMap<String, BTreeMap<String, usize>>,
}

impl CategoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从题目列表整体重建
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a QuestionRecord>) -> Self {
        let mut tree = Self::new();
        for record in records {
            tree.add(record);
        }
        tree
    }

    /// 增量登记一道题
    pub fn add(&mut self, record: &QuestionRecord) {
        *self
            .categories
            .entry(record.category.clone())
            .or_default()
            .entry(record.topic.clone())
            .or_default() += 1;
    }

    pub fn category_count(&self, category: &str) -> usize {
        self.categories
            .get(category)
            .map(|topics| topics.values().sum())
            .unwrap_or(0)
    }

    pub fn topic_count(&self, category: &str, topic: &str) -> usize {
        self.categories
            .get(category)
            .and_then(|topics| topics.get(topic))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.categories.values().flat_map(|t| t.values()).sum()
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// 选定分类下（`Any` 时为任一分类下）是否存在该主题
    pub fn contains_topic(&self, category: &Filter, topic: &str) -> bool {
        match category {
            Filter::Any => self.categories.values().any(|t| t.contains_key(topic)),
            Filter::Only(name) => self
                .categories
                .get(name)
                .is_some_and(|t| t.contains_key(topic)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, usize>)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, topic: &str) -> QuestionRecord {
        QuestionRecord {
            id: 0,
            category: category.to_string(),
            topic: topic.to_string(),
            title: "t".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            answer_index: 0,
            explanation: None,
        }
    }

    #[test]
    fn counts_per_category_and_topic() {
        let records = vec![
            record("GK", "HISTORY"),
            record("GK", "HISTORY"),
            record("GK", "SCIENCE"),
            record("Math", "ALGEBRA"),
        ];
        let tree = CategoryTree::from_records(&records);

        assert_eq!(tree.total(), 4);
        assert_eq!(tree.category_count("GK"), 3);
        assert_eq!(tree.topic_count("GK", "HISTORY"), 2);
        assert_eq!(tree.topic_count("Math", "HISTORY"), 0);
        assert!(tree.contains_topic(&Filter::Any, "ALGEBRA"));
        assert!(tree.contains_topic(&Filter::from("Math"), "ALGEBRA"));
        assert!(!tree.contains_topic(&Filter::from("GK"), "ALGEBRA"));
        assert!(!tree.contains_category("Physics"));
    }

    #[test]
    fn incremental_matches_rebuild() {
        let records = vec![record("GK", "A"), record("X", "B"), record("GK", "A")];
        let mut incremental = CategoryTree::new();
        for r in &records {
            incremental.add(r);
        }
        assert_eq!(incremental, CategoryTree::from_records(&records));
    }
}
