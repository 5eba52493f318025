//! 场景描述
//!
//! 用 JSON 描述一张小地图和上面的角色，用来搭建 `GameWorld`（替代地图文件加载器）。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::SimConfig;
use crate::path::PathMode;
use crate::sim::Scheduler;
use crate::world::{Actor, ActorKind, GameWorld, Obstacle, Position, WorldError};

pub const DEFAULT_FRICTION: u32 = 150;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse scenario: {0}")]
    Json(#[from] serde_json::Error),
    #[error("build world: {0}")]
    World(#[from] WorldError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    #[serde(default)]
    pub config: SimConfig,
    pub floors: Vec<FloorSpec>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
    #[serde(default)]
    pub actors: Vec<ActorSpec>,
}

/// 一块矩形地面（含两端）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorSpec {
    pub from: Position,
    pub to: Position,
    #[serde(default = "default_friction")]
    pub friction: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub at: Position,
    pub obstacle: Obstacle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSpec {
    pub name: String,
    pub kind: ActorKind,
    pub at: Position,
    #[serde(default)]
    pub speed: Option<u32>,
    #[serde(default)]
    pub destination: Option<Position>,
    #[serde(default)]
    pub mode: Option<PathMode>,
}

fn default_friction() -> u32 {
    DEFAULT_FRICTION
}

impl ScenarioSpec {
    pub fn from_json(raw: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// 按描述铺地面、放障碍、生成角色，返回调度器与世界。
    pub fn build(&self) -> Result<(Scheduler, GameWorld), ScenarioError> {
        let sim = Scheduler::from_config(&self.config);
        let mut world = GameWorld::new(&self.config);

        for floor in &self.floors {
            world.chunks.fill_floor(floor.from, floor.to, floor.friction)?;
        }
        for spec in &self.obstacles {
            world.chunks.set_obstacle(spec.at, spec.obstacle)?;
        }
        for spec in &self.actors {
            let speed = spec.speed.unwrap_or(Actor::DEFAULT_SPEED);
            let id = world.spawn(spec.kind, spec.name.clone(), spec.at, speed)?;
            if let Some(target) = spec.destination {
                world.set_destination(id, target, spec.mode.unwrap_or(PathMode::Exact))?;
            }
        }

        info!(
            tiles = world.chunks.tile_count(),
            chunks = world.chunks.chunk_count(),
            actors = self.actors.len(),
            "场景已加载"
        );
        Ok((sim, world))
    }
}
