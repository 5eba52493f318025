//! 事件 trait
//!
//! 定义可调度事件接口。

use super::scheduler::Scheduler;
use super::world::World;

/// 事件：可被调度执行。使用 `self: Box<Self>` 以支持 move/所有权转移。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Scheduler, world: &mut dyn World);
}

/// 把一次性闭包包装成事件。
pub struct FnEvent<F>(pub F);

impl<F> Event for FnEvent<F>
where
    F: FnOnce(&mut Scheduler, &mut dyn World) + Send + 'static,
{
    fn execute(self: Box<Self>, sim: &mut Scheduler, world: &mut dyn World) {
        let FnEvent(f) = *self;
        f(sim, world);
    }
}
