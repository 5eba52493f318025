//! 世界 trait
//!
//! 定义仿真世界接口。

use super::scheduler::Scheduler;
use std::any::Any;

/// 仿真世界：由业务层实现（例如区块图、角色等）。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 每帧在到期事件执行完后调用一次（角色的 think 阶段）。
    fn on_tick(&mut self, _sim: &mut Scheduler) {}
}
