//! 定时锁
//!
//! 基于调度器的协作式“忙 N 帧”原语，用来节流攻击、移动、施法、回复等可重复动作。
//! 不阻塞线程：上锁期间动作只是不可执行，直到到期事件把锁释放。

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::event::Event;
use super::scheduled_event::TimerId;
use super::scheduler::Scheduler;
use super::time::Frame;
use super::world::World;
use tracing::{debug, trace};

type LockedCallback = Box<dyn FnMut(Frame) + Send>;
type UnlockedCallback = Box<dyn FnMut(&mut Scheduler, &mut dyn World) + Send>;

#[derive(Default)]
struct LockState {
    /// 当前唯一的到期事件
    timer: Option<TimerId>,
    /// 到期时需要再锁的帧数（"延长到至少" 语义）
    pending_extension: u64,
    on_locked: Option<LockedCallback>,
    on_unlocked: Option<UnlockedCallback>,
}

/// 定时锁：任一时刻最多持有一个到期事件。
///
/// 取消统一走硬删除，被取消的锁可以立刻重新上锁而不会留下第二个到期事件。
/// 持有者在丢弃锁之前应先 [`TimedLock::cancel`]，否则到期事件仍会触发解锁回调。
#[derive(Default)]
pub struct TimedLock {
    state: Arc<Mutex<LockState>>,
}

impl TimedLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册“变为上锁”回调，参数为上锁时的帧号。
    pub fn on_locked(self, f: impl FnMut(Frame) + Send + 'static) -> Self {
        self.state().on_locked = Some(Box::new(f));
        self
    }

    /// 注册“变为解锁”回调，在到期事件中调用。
    pub fn on_unlocked(
        self,
        f: impl FnMut(&mut Scheduler, &mut dyn World) + Send + 'static,
    ) -> Self {
        self.state().on_unlocked = Some(Box::new(f));
        self
    }

    pub fn is_locked(&self) -> bool {
        self.state().timer.is_some()
    }

    /// 距离解锁的总帧数（含待延长部分），未上锁时为 0。
    pub fn remaining_frames(&self, sim: &Scheduler) -> u64 {
        let st = self.state();
        st.timer
            .and_then(|timer| sim.remaining_frames(timer))
            .map_or(0, |left| left.saturating_add(st.pending_extension))
    }

    /// 上锁 `frames` 帧。
    ///
    /// 已上锁时不叠加：若剩余时间已不少于 `frames` 则不变，否则在当前事件到期后
    /// 补锁差值，使解锁恰好发生在本次调用之后 `frames` 帧。
    pub fn lock(&self, sim: &mut Scheduler, frames: u64) {
        if frames == 0 {
            return;
        }
        let mut st = self.state();

        if let Some(timer) = st.timer {
            let remaining = sim.remaining_frames(timer).unwrap_or(0);
            let effective = remaining.saturating_add(st.pending_extension);
            if frames <= effective {
                trace!(frames, effective, "剩余时间足够，锁不变");
                return;
            }
            st.pending_extension = frames - remaining;
            debug!(
                frames,
                remaining,
                extension = st.pending_extension,
                "锁将在到期后延长"
            );
            return;
        }

        let timer = sim.schedule_in(
            frames,
            LockExpired {
                state: Arc::clone(&self.state),
            },
        );
        st.timer = Some(timer);
        trace!(?timer, frames, "已上锁");

        let callback = st.on_locked.take();
        drop(st);
        if let Some(mut callback) = callback {
            callback(sim.now());
            self.state().on_locked.get_or_insert(callback);
        }
    }

    /// 立即释放：硬删除到期事件并清空待延长量，不触发解锁回调。
    pub fn cancel(&self, sim: &mut Scheduler) {
        let mut st = self.state();
        if let Some(timer) = st.timer.take() {
            sim.hard_remove(timer);
            trace!(?timer, "锁已取消");
        }
        st.pending_extension = 0;
    }

    fn state(&self) -> MutexGuard<'_, LockState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<LockState>) -> MutexGuard<'_, LockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 事件：锁的到期事件。有待延长量时补锁，否则解锁并调用回调。
struct LockExpired {
    state: Arc<Mutex<LockState>>,
}

impl Event for LockExpired {
    fn execute(self: Box<Self>, sim: &mut Scheduler, world: &mut dyn World) {
        let LockExpired { state } = *self;
        let mut st = lock_state(&state);
        st.timer = None;

        let extension = std::mem::take(&mut st.pending_extension);
        if extension > 0 {
            let timer = sim.schedule_in(
                extension,
                LockExpired {
                    state: Arc::clone(&state),
                },
            );
            st.timer = Some(timer);
            trace!(?timer, extension, "锁已延长");
            return;
        }

        let callback = st.on_unlocked.take();
        drop(st);
        trace!(now = ?sim.now(), "已解锁");
        if let Some(mut callback) = callback {
            callback(sim, world);
            lock_state(&state).on_unlocked.get_or_insert(callback);
        }
    }
}
