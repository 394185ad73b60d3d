//! 通用类型定义：节点 ID、地理坐标与大圆距离

use serde::{Deserialize, Serialize};
use std::fmt;

/// 地球平均半径（米）
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// 节点 ID（图内稠密下标，按插入顺序分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// 作为数组下标使用
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 地理坐标（度）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// 与另一坐标之间的大圆距离（米）
    pub fn haversine(&self, other: &Coordinate) -> f64 {
        haversine_distance(*self, *other)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// haversine 公式计算两点大圆距离（米）
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero() {
        let p = Coordinate::new(37.94952, 23.678294);
        assert_eq!(p.haversine(&p), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        // 经线上 1 度约 111.195 km
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = haversine_distance(a, b);
        assert!((d - 111_194.93).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Coordinate::new(37.9495, 23.6783);
        let b = Coordinate::new(37.9612, 23.6901);
        assert!((a.haversine(&b) - b.haversine(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(7).to_string(), "#7");
        assert_eq!(NodeId::from(3).index(), 3);
    }
}
