//! 期望集合与现有集合的比较
//!
//! 两个集合都以身份键（顶点 vid，边 eid 文本）索引：
//! - 期望中有、现有中也有：相等则 Kept，否则 Updated（保存期望值）
//! - 期望中有、现有中没有：Added
//! - 现有中剩下的：Deleted
//!
//! 分类只取决于两个键集合和相等判定，桶内顺序不做保证。

use crate::query::identity::identity_key;
use crate::schema::EntityDescriptor;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// 各分类的数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompareCounts {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
    pub kept: usize,
}

impl fmt::Display for CompareCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added {}, updated {}, deleted {}, kept {}",
            self.added, self.updated, self.deleted, self.kept
        )
    }
}

/// 一次比较的分类结果
#[derive(Debug, Clone)]
pub struct CompareResult<T> {
    pub added: Vec<T>,
    pub updated: Vec<T>,
    pub deleted: Vec<T>,
    pub kept: Vec<T>,
    pub counts: CompareCounts,
    /// Updated 实体的身份键 -> 取值不同的属性名
    pub changed_properties: HashMap<String, Vec<String>>,
}

impl<T> Default for CompareResult<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
            kept: Vec::new(),
            counts: CompareCounts::default(),
            changed_properties: HashMap::new(),
        }
    }
}

impl<T> CompareResult<T> {
    /// 是否无需任何变更
    pub fn is_unchanged(&self) -> bool {
        self.counts.added == 0 && self.counts.updated == 0 && self.counts.deleted == 0
    }

    /// 丢弃明细，只保留计数
    pub fn into_counts_only(self) -> Self {
        Self {
            counts: self.counts,
            ..Self::default()
        }
    }

    pub fn summary(&self) -> String {
        self.counts.to_string()
    }
}

/// 取值不同的属性名，按声明顺序
pub fn differing_properties<T>(descriptor: &EntityDescriptor<T>, left: &T, right: &T) -> Vec<String> {
    descriptor
        .properties()
        .iter()
        .filter(|p| !p.access.equals(left, right))
        .map(|p| p.name().to_string())
        .collect()
}

/// 身份相同且每个属性都相等
pub fn is_same_entity<T>(descriptor: &EntityDescriptor<T>, left: &T, right: &T) -> bool {
    identity_key(descriptor, left) == identity_key(descriptor, right)
        && differing_properties(descriptor, left, right).is_empty()
}

/// 比较两组已按身份键排好的条目；现有条目中未被匹配的按原顺序进入 Deleted
pub fn compare_entries<T>(
    descriptor: &EntityDescriptor<T>,
    current: Vec<(String, T)>,
    desired: Vec<(String, T)>,
) -> CompareResult<T> {
    let mut slots: Vec<Option<T>> = Vec::with_capacity(current.len());
    let mut keys: Vec<String> = Vec::with_capacity(current.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(current.len());
    for (key, entity) in current {
        match index.get(&key) {
            Some(&pos) => slots[pos] = Some(entity),
            None => {
                index.insert(key.clone(), slots.len());
                keys.push(key);
                slots.push(Some(entity));
            }
        }
    }

    let mut result = CompareResult::default();
    for (key, wanted) in desired {
        let existing = index.get(&key).and_then(|&pos| slots[pos].take());
        match existing {
            Some(existing) => {
                let mut changed = differing_properties(descriptor, &existing, &wanted);
                if identity_key(descriptor, &existing) != identity_key(descriptor, &wanted) {
                    changed = descriptor
                        .property_names()
                        .into_iter()
                        .map(str::to_string)
                        .collect();
                }
                if changed.is_empty() {
                    result.kept.push(wanted);
                } else {
                    result.changed_properties.insert(key, changed);
                    result.updated.push(wanted);
                }
            }
            None => result.added.push(wanted),
        }
    }

    for (key, slot) in keys.into_iter().zip(slots) {
        if let Some(entity) = slot {
            log::trace!("{} 不在期望集合中，标记删除", key);
            result.deleted.push(entity);
        }
    }

    result.counts = CompareCounts {
        added: result.added.len(),
        updated: result.updated.len(),
        deleted: result.deleted.len(),
        kept: result.kept.len(),
    };
    result
}

/// 按身份键索引后比较；同一键重复出现时后者覆盖前者
pub fn compare_slices<T>(
    descriptor: &EntityDescriptor<T>,
    current: Vec<T>,
    desired: Vec<T>,
) -> CompareResult<T> {
    let current = keyed(descriptor, current);
    let desired = keyed(descriptor, desired);
    compare_entries(descriptor, current, desired)
}

/// 比较以身份键为键的两个映射
pub fn compare_maps<T>(
    descriptor: &EntityDescriptor<T>,
    current: HashMap<String, T>,
    desired: HashMap<String, T>,
) -> CompareResult<T> {
    compare_entries(
        descriptor,
        current.into_iter().collect(),
        desired.into_iter().collect(),
    )
}

fn keyed<T>(descriptor: &EntityDescriptor<T>, entities: Vec<T>) -> Vec<(String, T)> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(entities.len());
    let mut entries: Vec<(String, T)> = Vec::with_capacity(entities.len());
    for entity in entities {
        let key = identity_key(descriptor, &entity);
        match positions.get(&key) {
            Some(&pos) => entries[pos].1 = entity,
            None => {
                positions.insert(key.clone(), entries.len());
                entries.push((key, entity));
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Entity, Property};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Item {
        vid: String,
        qty: i64,
        label: String,
    }

    impl Entity for Item {
        fn describe() -> EntityDescriptor<Self> {
            EntityDescriptor::<Self>::new()
                .tag("item")
                .vid(|i| &i.vid, |i| &mut i.vid)
                .property(Property::new("qty"), |i| &i.qty, |i| &mut i.qty)
                .property(Property::new("label"), |i| &i.label, |i| &mut i.label)
        }
    }

    fn item(vid: &str, qty: i64) -> Item {
        Item {
            vid: vid.into(),
            qty,
            label: "x".into(),
        }
    }

    #[test]
    fn test_identical_sets_are_all_kept() {
        let d = Item::describe();
        let set = vec![item("a", 1), item("b", 2)];
        let result = compare_slices(&d, set.clone(), set);
        assert_eq!(
            result.counts,
            CompareCounts {
                kept: 2,
                ..CompareCounts::default()
            }
        );
        assert!(result.is_unchanged());
    }

    #[test]
    fn test_partition() {
        let d = Item::describe();
        let current = vec![item("a", 1), item("b", 2), item("c", 3)];
        let desired = vec![item("a", 1), item("b", 20), item("d", 4)];
        let result = compare_slices(&d, current, desired);
        assert_eq!(result.kept, vec![item("a", 1)]);
        assert_eq!(result.updated, vec![item("b", 20)]);
        assert_eq!(result.added, vec![item("d", 4)]);
        assert_eq!(result.deleted, vec![item("c", 3)]);
        assert_eq!(
            result.changed_properties.get("b"),
            Some(&vec!["qty".to_string()])
        );
        assert_eq!(result.summary(), "added 1, updated 1, deleted 1, kept 1");
    }

    #[test]
    fn test_single_field_difference_is_update() {
        let d = Item::describe();
        let mut other = item("a", 1);
        other.label = "y".into();
        assert!(!is_same_entity(&d, &item("a", 1), &other));
        let result = compare_slices(&d, vec![item("a", 1)], vec![other]);
        assert_eq!(result.counts.updated, 1);
        assert_eq!(result.counts.kept, 0);
    }

    #[test]
    fn test_duplicate_desired_key_last_wins() {
        let d = Item::describe();
        let result = compare_slices(&d, Vec::new(), vec![item("a", 1), item("a", 2)]);
        assert_eq!(result.added, vec![item("a", 2)]);
    }

    #[test]
    fn test_counts_only() {
        let d = Item::describe();
        let result = compare_slices(&d, vec![item("a", 1)], Vec::new()).into_counts_only();
        assert!(result.deleted.is_empty());
        assert_eq!(result.counts.deleted, 1);
    }

    #[test]
    fn test_compare_maps() {
        let d = Item::describe();
        let current: HashMap<String, Item> = [("a".to_string(), item("a", 1))].into_iter().collect();
        let desired: HashMap<String, Item> = [
            ("a".to_string(), item("a", 1)),
            ("b".to_string(), item("b", 1)),
        ]
        .into_iter()
        .collect();
        let result = compare_maps(&d, current, desired);
        assert_eq!(result.counts.kept, 1);
        assert_eq!(result.counts.added, 1);
    }
}
