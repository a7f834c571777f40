//! 索引核心之外的协作模块：参考序列与 reads 的解析，以及 SAM 输出。

pub mod fasta;
pub mod fastq;
pub mod sam;
