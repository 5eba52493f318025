//! 仿真配置
//!
//! 帧间隔、世界尺寸与寻路参数。所有字段都有默认值，JSON 中可以只写需要覆盖的部分。

use serde::{Deserialize, Serialize};

use crate::path::PathConfig;
use crate::sim::TickInterval;
use crate::world::WorldConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// 每帧的墙钟时长（毫秒）
    pub tick_interval_ms: u64,
    pub world: WorldConfig,
    pub path: PathConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TickInterval::DEFAULT_MS,
            world: WorldConfig::default(),
            path: PathConfig::default(),
        }
    }
}
