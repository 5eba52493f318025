//! 搜索节点
//!
//! 单次搜索期间挂在 tile 上的临时状态。节点槽位按 tile id 常驻复用，
//! 但每次搜索结束都必须全部禁用，不允许跨搜索残留。

use crate::heap::HeapItem;
use crate::world::TileId;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SearchNode {
    /// 本次搜索已挂接
    pub enabled: bool,
    pub parent: Option<TileId>,
    /// 起点到此的累计代价
    pub g: u64,
    /// 启发式估计
    pub h: u64,
    pub f: u64,
    /// 已进入过开放表
    pub visited: bool,
    pub open: bool,
    pub closed: bool,
}

impl SearchNode {
    pub(crate) fn attach(h: u64) -> Self {
        Self {
            enabled: true,
            h,
            f: h,
            ..Self::default()
        }
    }
}

/// 开放表条目：按 f 值排序。
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenTile {
    pub tile: TileId,
    pub f: u64,
}

impl HeapItem for OpenTile {
    type Key = TileId;
    type Score = u64;

    fn key(&self) -> TileId {
        self.tile
    }

    fn score(&self) -> u64 {
        self.f
    }
}
