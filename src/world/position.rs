//! 位置
//!
//! 世界网格上的坐标 (x, y, z)，z 为楼层。

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32) -> Position {
        Position { x, y, z }
    }

    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Position {
        Position::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.z.saturating_add(dz),
        )
    }

    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
            .saturating_add(self.z.abs_diff(other.z))
    }

    /// 同层且八邻接（不含自身）。
    pub fn is_adjacent_to(self, other: Position) -> bool {
        self.z == other.z
            && self != other
            && self.x.abs_diff(other.x) <= 1
            && self.y.abs_diff(other.y) <= 1
    }

    /// x 与 y 同时变化。
    pub fn is_diagonal_to(self, other: Position) -> bool {
        self.x != other.x && self.y != other.y
    }

    /// 是否落在以 `center` 为中心、半径 (rx, ry) 的同层视野窗口内。
    pub fn is_within_view(self, center: Position, rx: u32, ry: u32) -> bool {
        self.z == center.z && self.x.abs_diff(center.x) <= rx && self.y.abs_diff(center.y) <= ry
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
