//! 差异与对账
//!
//! 比较算法在 `compare.rs`；查询现有数据并分批执行变更的入口在
//! `api::reconcile_api`。

pub mod compare;

pub use compare::{
    compare_entries, compare_maps, compare_slices, differing_properties, is_same_entity,
    CompareCounts, CompareResult,
};
