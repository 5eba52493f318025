//! 调度事件
//!
//! 定义堆中的调度事件条目及其句柄。

use super::event::Event;
use super::time::Frame;
use crate::heap::HeapItem;

/// 调度事件句柄。只用于取消/查询，不持有事件本身。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// 调度事件，包含目标帧、回调与软取消标记。
///
/// 软取消时回调被清除，条目留在堆中，直到 tick 把它弹出丢弃。
pub struct ScheduledEvent {
    pub(crate) id: TimerId,
    pub(crate) at: Frame,
    pub(crate) ev: Option<Box<dyn Event>>,
    pub(crate) cancelled: bool,
}

impl ScheduledEvent {
    pub(crate) fn new(id: TimerId, at: Frame, ev: Box<dyn Event>) -> Self {
        Self {
            id,
            at,
            ev: Some(ev),
            cancelled: false,
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.cancelled = true;
        self.ev = None;
    }
}

// 同一帧的事件之间没有先后保证（堆的平局顺序不稳定）。
impl HeapItem for ScheduledEvent {
    type Key = TimerId;
    type Score = Frame;

    fn key(&self) -> TimerId {
        self.id
    }

    fn score(&self) -> Frame {
        self.at
    }
}
