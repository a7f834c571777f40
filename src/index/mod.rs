//! FM 索引：后缀数组 -> BWT -> C 表 / O 表 -> 反向搜索。

pub mod bwt;
pub mod ctab;
pub mod fm;
pub mod multi;
pub mod otab;
pub mod persist;
pub mod sa;

pub use fm::{ExactSearch, FmIndex, Matches};
pub use multi::{IndexMeta, MultiIndex};
pub use sa::{PrefixDoubling, SuffixArrayBuilder};
