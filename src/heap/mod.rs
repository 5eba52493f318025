//! 优先堆
//!
//! 带索引的最小堆：支持 push / pop_min / peek_min，以及按 key 任意删除和分数变化后的重新调整。
//! 调度器（按目标帧）和寻路（按 f 值）共用这一实现。

mod min_heap;

pub use min_heap::MinHeap;

use std::fmt::Debug;
use std::hash::Hash;

/// 可放入 [`MinHeap`] 的元素：提供稳定的 key 与当前分数。
///
/// key 在元素位于堆中期间不得改变；分数只能通过 [`MinHeap::update`] 修改。
pub trait HeapItem {
    type Key: Copy + Eq + Hash + Debug;
    type Score: Ord + Copy;

    fn key(&self) -> Self::Key;
    fn score(&self) -> Self::Score;
}
