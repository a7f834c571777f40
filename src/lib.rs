//! # bwt-search
//!
//! 基于 Burrows-Wheeler 变换与 FM 索引的精确子串搜索。
//!
//! 对每条命名参考序列（如染色体）预处理一次，之后任意长度为 m 的模式
//! 都能在 O(m) 时间内找到全部出现位置，与参考长度无关。
//!
//! - **字母表**：参考序列中出现的符号 + 哨兵 `$`（编码 0）
//! - **索引构建**：后缀数组 -> BWT -> C 表 / 稠密 O 表
//! - **反向搜索**：从模式末尾向前收窄 SA 区间
//! - **持久化**：多序列索引的定序二进制格式
//!
//! ## 快速示例
//!
//! ```rust
//! use bwt_search::index::{ExactSearch, FmIndex};
//!
//! let idx = FmIndex::build(b"mississippi").unwrap();
//! let mut hits: Vec<i32> = idx.search(b"is").collect();
//! hits.sort_unstable();
//! assert_eq!(hits, vec![1, 4]);
//!
//! // 字母表之外的符号不会报错，只是没有命中
//! assert_eq!(idx.search(b"xyz").count(), 0);
//! ```
//!
//! ## 模块说明
//!
//! - [`alphabet`] — 符号编码
//! - [`index`] — 后缀数组、BWT、C/O 表、FM 索引、多序列索引与持久化
//! - [`io`] — FASTA / FASTQ 解析与 SAM 输出
//! - [`error`] — 错误类型

pub mod alphabet;
pub mod error;
pub mod index;
pub mod io;

pub use alphabet::Alphabet;
pub use error::{FmError, Result};
pub use index::{ExactSearch, FmIndex, Matches, MultiIndex};
