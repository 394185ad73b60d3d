//! 引擎配置

use crate::algorithm::CapacityPolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 单次运行的主循环迭代上限，None 表示不限
    pub max_iterations: Option<u64>,
    /// 最大流的容量分配策略
    pub capacity_policy: CapacityPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: None,
            capacity_policy: CapacityPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// 设置迭代上限
    pub fn with_max_iterations(mut self, limit: u64) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    /// 设置容量策略
    pub fn with_capacity_policy(mut self, policy: CapacityPolicy) -> Self {
        self.capacity_policy = policy;
        self
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == Some(0) {
            return Err(Error::InvalidConfig("max_iterations 必须大于 0".to_string()));
        }
        self.capacity_policy.validate()
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_iterations, None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{"max_iterations": 500}"#).unwrap();
        assert_eq!(config.max_iterations, Some(500));
        assert_eq!(config.capacity_policy, CapacityPolicy::default());
    }

    #[test]
    fn test_policy_from_json() {
        let config = EngineConfig::from_json_str(
            r#"{"capacity_policy": {"kind": "inverse_distance", "min_capacity": 1.0, "max_capacity": 5.0}}"#,
        )
        .unwrap();
        assert_eq!(
            config.capacity_policy,
            CapacityPolicy::InverseDistance {
                min_capacity: 1.0,
                max_capacity: 5.0
            }
        );
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let err = EngineConfig::from_json_str(r#"{"max_iterations": 0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_inverted_capacity_range() {
        let config = EngineConfig::default().with_capacity_policy(CapacityPolicy::InverseDistance {
            min_capacity: 50.0,
            max_capacity: 10.0,
        });
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"capacity_policy": {"kind": "edge_weight"}}"#).unwrap();
        let config = EngineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.capacity_policy, CapacityPolicy::EdgeWeight);
    }
}
