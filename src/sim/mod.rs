//! 仿真核心模块
//!
//! 此模块包含帧驱动仿真的核心组件：帧时间、事件、调度器、定时锁和世界接口。

// 子模块声明
mod event;
mod scheduled_event;
mod scheduler;
mod time;
mod timed_lock;
mod world;

// 重新导出公共接口
pub use event::{Event, FnEvent};
pub use scheduled_event::{ScheduledEvent, TimerId};
pub use scheduler::{ScheduleError, Scheduler};
pub use time::{Frame, TickInterval};
pub use timed_lock::TimedLock;
pub use world::World;
