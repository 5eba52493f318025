//! 事件调度器
//!
//! 维护当前帧号与按目标帧排序的事件堆。每次 tick 推进一帧，
//! 依次执行所有到期事件，然后调用世界的 think 阶段。
//!
//! 两种取消方式：
//! - [`Scheduler::cancel`]：软取消，只打标记并清除回调，条目等到被弹出时丢弃；
//! - [`Scheduler::hard_remove`]：立刻把条目从堆中摘除，句柄对应的槽位可马上复用。

use super::event::Event;
use super::scheduled_event::{ScheduledEvent, TimerId};
use super::time::{Frame, TickInterval};
use super::world::World;
use crate::config::SimConfig;
use crate::heap::MinHeap;
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

/// 非法的调度请求。
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScheduleError {
    #[error("frame count must be finite, got {0}")]
    NonFinite(f64),
    #[error("frame count must be positive, got {0}")]
    NonPositive(f64),
}

/// 帧驱动的事件调度器。
#[derive(Default)]
pub struct Scheduler {
    now: Frame,
    interval: TickInterval,
    next_id: u64,
    q: MinHeap<ScheduledEvent>,
    executed: u64,
}

impl Scheduler {
    pub fn new(interval: TickInterval) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    pub fn from_config(cfg: &SimConfig) -> Self {
        Self::new(TickInterval::from_millis(cfg.tick_interval_ms))
    }

    /// 获取当前帧号
    pub fn now(&self) -> Frame {
        self.now
    }

    pub fn tick_interval(&self) -> TickInterval {
        self.interval
    }

    /// 堆中条目数（含已软取消、尚未弹出的）。
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 累计执行过的事件数。
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// 调度事件在指定帧执行。
    ///
    /// `at` 不晚于当前帧时，事件会在本帧尚未结束的出队循环里执行（若正处于 tick 中），
    /// 否则在下一次 tick 执行。
    #[tracing::instrument(skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule_at<E: Event>(&mut self, at: Frame, ev: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        trace!(now = ?self.now, ?id, "调度事件");

        self.q.push(ScheduledEvent::new(id, at, Box::new(ev)));

        debug!(queue_size = self.q.len(), "事件已加入队列");
        id
    }

    /// 在 `frames` 帧之后执行（四舍五入，至少 1 帧）。
    ///
    /// 非有限或非正的帧数会被记录并拒绝，不产生句柄。
    pub fn schedule_after_frames<E: Event>(
        &mut self,
        frames: f64,
        ev: E,
    ) -> Result<TimerId, ScheduleError> {
        let frames = whole_frames(frames).inspect_err(|err| {
            warn!(%err, now = ?self.now, "拒绝非法调度请求");
        })?;
        Ok(self.schedule_in(frames, ev))
    }

    /// 在 `ms` 毫秒之后执行，按帧间隔换算。
    pub fn schedule_after_millis<E: Event>(
        &mut self,
        ms: f64,
        ev: E,
    ) -> Result<TimerId, ScheduleError> {
        self.schedule_after_frames(self.interval.frames_in_millis(ms), ev)
    }

    pub fn schedule_after_secs<E: Event>(
        &mut self,
        secs: f64,
        ev: E,
    ) -> Result<TimerId, ScheduleError> {
        self.schedule_after_frames(self.interval.frames_in_secs(secs), ev)
    }

    /// 已验证过的整帧延迟，至少 1 帧。
    pub(crate) fn schedule_in<E: Event>(&mut self, frames: u64, ev: E) -> TimerId {
        self.schedule_at(self.now.after(frames.max(1)), ev)
    }

    /// 软取消：清除回调并标记，条目留在堆中等待被弹出丢弃。
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let found = self.q.update(&id, ScheduledEvent::cancel);
        if found {
            trace!(?id, "事件已软取消");
        }
        found
    }

    /// 硬删除：立即把事件从堆中摘除。
    pub fn hard_remove(&mut self, id: TimerId) -> bool {
        let removed = self.q.remove(&id).is_some();
        if removed {
            trace!(?id, queue_size = self.q.len(), "事件已从队列移除");
        }
        removed
    }

    /// 事件仍在堆中且未被取消。
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.q.get(&id).is_some_and(|item| !item.cancelled)
    }

    /// 距离事件触发还剩多少帧；事件不在堆中或已取消时为 `None`。
    pub fn remaining_frames(&self, id: TimerId) -> Option<u64> {
        self.q
            .get(&id)
            .filter(|item| !item.cancelled)
            .map(|item| self.now.frames_until(item.at))
    }

    /// 推进一帧：执行所有到期事件，然后调用世界的 think 阶段。
    #[tracing::instrument(skip(self, world), fields(frame = self.now.0 + 1))]
    pub fn tick(&mut self, world: &mut dyn World) {
        self.now = self.now.next();
        let ran = self.run_due(world);
        trace!(ran, queue_size = self.q.len(), "到期事件执行完毕");
        world.on_tick(self);
    }

    /// 连续 tick 直到当前帧到达 `until`。
    pub fn run_until(&mut self, until: Frame, world: &mut dyn World) {
        info!(from = ?self.now, ?until, "▶️  开始推进帧");
        while self.now < until {
            self.tick(world);
        }
        info!(
            now = ?self.now,
            executed = self.executed,
            queue_size = self.q.len(),
            "✅ 推进完成"
        );
    }

    fn run_due(&mut self, world: &mut dyn World) -> usize {
        let mut ran = 0;
        while let Some(top) = self.q.peek_min() {
            if top.at > self.now {
                break;
            }
            let Some(item) = self.q.pop_min() else {
                break;
            };
            if item.cancelled {
                trace!(id = ?item.id, "丢弃已取消事件");
                continue;
            }
            match item.ev {
                Some(ev) => {
                    debug!(id = ?item.id, scheduled_at = ?item.at, "执行事件");
                    ev.execute(self, world);
                    self.executed += 1;
                    ran += 1;
                }
                None => {
                    error!(id = ?item.id, "事件回调已被清除却未标记取消，跳过执行");
                }
            }
        }
        ran
    }
}

fn whole_frames(frames: f64) -> Result<u64, ScheduleError> {
    if !frames.is_finite() {
        return Err(ScheduleError::NonFinite(frames));
    }
    if frames <= 0.0 {
        return Err(ScheduleError::NonPositive(frames));
    }
    Ok((frames.round() as u64).max(1))
}
