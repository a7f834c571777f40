use std::path::PathBuf;

use thiserror::Error;

/// 索引构建、持久化过程中的错误类型。
///
/// 查询阶段的字母表不匹配不会出现在这里：`search` 直接返回空结果。
#[derive(Debug, Error)]
pub enum FmError {
    /// 参考序列中出现了字母表之外的符号。
    #[error("symbol 0x{symbol:02x} at position {position} is not in the alphabet")]
    AlphabetMismatch { symbol: u8, position: usize },

    /// 字节 0 预留给哨兵 `$`，不能出现在输入中。
    #[error("byte 0x00 at position {position} is reserved for the sentinel")]
    ReservedSymbol { position: usize },

    /// 后缀数组使用 i32，序列（含哨兵）不得超过 i32::MAX。
    #[error("sequence has {len} symbols, the index supports at most {max}")]
    SequenceTooLong { len: usize, max: usize },

    #[error("duplicate sequence name {name:?}")]
    DuplicateSequence { name: String },

    /// 持久化流被截断、字段顺序不符或长度不一致。
    #[error("malformed index stream: {0}")]
    Decode(String),

    #[error("cannot encode index: {0}")]
    Encode(#[source] bincode::Error),

    #[error("cannot {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FmError>;
