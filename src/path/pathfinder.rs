//! A* 寻路
//!
//! 启发式为 `平均摩擦 × 曼哈顿距离`，取其计算便宜而非严格可采纳。
//! 邻居若同时落在起点和终点的视野窗口之外则直接剪掉：搜索只在"屏幕"附近进行，
//! 用全局完备性换取有界的开销。
//!
//! 返回的路径从目标一侧排向起点一侧，不含起点本身；下一步要走的 tile 是**最后一个**元素。
//! 起点即目标时返回 `[起点]`，找不到路时返回空。

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::search_node::{OpenTile, SearchNode};
use crate::heap::MinHeap;
use crate::world::{ChunkGraph, Tile, TileId};

/// 寻路参数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// 视野窗口水平半径（tile）
    pub viewport_x: u32,
    /// 视野窗口垂直半径（tile）
    pub viewport_y: u32,
    /// 启发式使用的平均摩擦
    pub average_friction: u32,
    /// 斜向移动的代价倍数
    pub diagonal_multiplier: u32,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            viewport_x: 8,
            viewport_y: 6,
            average_friction: 150,
            diagonal_multiplier: 3,
        }
    }
}

/// 成功条件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMode {
    /// 到达与目标相邻的任一 tile
    Adjacent,
    /// 只有到达目标本身才算成功
    Exact,
}

/// 自上次读取以来的累计搜索统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub searches: u64,
    pub expanded: u64,
}

#[derive(Debug, Default)]
pub struct Pathfinder {
    cfg: PathConfig,
    /// 按 tile id 索引的节点槽位
    nodes: Vec<SearchNode>,
    /// 本次搜索挂接过的 tile
    enabled: Vec<TileId>,
    open: MinHeap<OpenTile>,
    stats: SearchStats,
}

impl Pathfinder {
    pub fn new(cfg: PathConfig) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PathConfig {
        &self.cfg
    }

    /// 读取并清零统计。
    pub fn usage_stats(&mut self) -> SearchStats {
        std::mem::take(&mut self.stats)
    }

    /// 当前仍挂着搜索节点的 tile 数；两次搜索之间恒为 0。
    pub fn attached_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| n.enabled).count()
    }

    /// 从 `from` 搜索到 `to`。`is_occupied` 为真的邻居不可踏入。
    #[tracing::instrument(skip(self, graph, is_occupied))]
    pub fn search<F>(
        &mut self,
        graph: &ChunkGraph,
        is_occupied: F,
        from: TileId,
        to: TileId,
        mode: PathMode,
    ) -> Vec<TileId>
    where
        F: Fn(&Tile) -> bool,
    {
        self.stats.searches += 1;
        if self.nodes.len() < graph.tile_count() {
            self.nodes.resize(graph.tile_count(), SearchNode::default());
        }

        let path = match self.expand(graph, &is_occupied, from, to, mode) {
            Some(found) => self.reconstruct(from, found),
            None => Vec::new(),
        };
        debug!(
            len = path.len(),
            touched = self.enabled.len(),
            "搜索结束"
        );

        self.disable_all();
        path
    }

    fn expand<F>(
        &mut self,
        graph: &ChunkGraph,
        is_occupied: &F,
        from: TileId,
        to: TileId,
        mode: PathMode,
    ) -> Option<TileId>
    where
        F: Fn(&Tile) -> bool,
    {
        let origin = graph.tile(from).position();
        let goal = graph.tile(to).position();
        let (vx, vy) = (self.cfg.viewport_x, self.cfg.viewport_y);

        self.enable(graph, from, to);
        let start = &mut self.nodes[from.0];
        start.visited = true;
        start.open = true;
        let f = start.f;
        self.open.push(OpenTile { tile: from, f });

        while let Some(OpenTile { tile: current, .. }) = self.open.pop_min() {
            let node = &mut self.nodes[current.0];
            node.open = false;
            node.closed = true;
            let g = node.g;
            self.stats.expanded += 1;

            if self.is_goal(graph, current, to, mode) {
                trace!(?current, g, "到达目标");
                return Some(current);
            }

            let current_tile = graph.tile(current);
            for &next in current_tile.neighbours() {
                if !self.nodes[next.0].enabled {
                    self.enable(graph, next, to);
                }
                if self.nodes[next.0].closed {
                    continue;
                }

                let next_tile = graph.tile(next);
                let pos = next_tile.position();
                if !pos.is_within_view(origin, vx, vy) && !pos.is_within_view(goal, vx, vy) {
                    self.nodes[next.0].closed = true;
                    continue;
                }
                if is_occupied(next_tile) {
                    self.nodes[next.0].closed = true;
                    continue;
                }

                let cost = g.saturating_add(
                    next_tile.movement_weight(current_tile, self.cfg.diagonal_multiplier),
                );
                let node = &mut self.nodes[next.0];
                if node.visited && cost >= node.g {
                    continue;
                }

                node.parent = Some(current);
                node.g = cost;
                node.f = cost.saturating_add(node.h);
                let f = node.f;
                if node.visited {
                    self.open.update(&next, |entry| entry.f = f);
                } else {
                    node.visited = true;
                    node.open = true;
                    self.open.push(OpenTile { tile: next, f });
                }
            }
        }

        None
    }

    fn is_goal(&self, graph: &ChunkGraph, tile: TileId, to: TileId, mode: PathMode) -> bool {
        match mode {
            PathMode::Exact => tile == to,
            PathMode::Adjacent => {
                tile == to || graph.tile(tile).position().is_adjacent_to(graph.tile(to).position())
            }
        }
    }

    /// 挂接节点并计算启发值。
    fn enable(&mut self, graph: &ChunkGraph, tile: TileId, to: TileId) {
        let distance = graph.tile(tile).manhattan_distance_to(graph.tile(to));
        let h = u64::from(self.cfg.average_friction).saturating_mul(u64::from(distance));
        self.nodes[tile.0] = SearchNode::attach(h);
        self.enabled.push(tile);
    }

    fn disable_all(&mut self) {
        for tile in self.enabled.drain(..) {
            self.nodes[tile.0] = SearchNode::default();
        }
        self.open.clear();
    }

    fn reconstruct(&self, from: TileId, found: TileId) -> Vec<TileId> {
        let mut path = vec![found];
        let mut current = found;
        while let Some(parent) = self.nodes[current.0].parent {
            if parent == from {
                break;
            }
            path.push(parent);
            current = parent;
        }
        path
    }
}
