//! 寻路模块
//!
//! 在区块图暴露的 tile 邻接图上做受限 A* 搜索：搜索范围限制在起点与终点的视野窗口内，
//! 可通行性由调用方按角色类型给出。

mod occupancy;
mod pathfinder;
mod search_node;

pub use pathfinder::{PathConfig, PathMode, Pathfinder, SearchStats};
