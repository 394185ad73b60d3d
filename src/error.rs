//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("节点不存在: {0}")]
    UnknownNode(String),

    #[error("图数据格式错误: {0}")]
    MalformedGraph(String),

    #[error("超出迭代上限: {0}")]
    IterationLimit(u64),

    #[error("无效的配置: {0}")]
    InvalidConfig(String),

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    SerializationError(#[from] serde_json::Error),
}
