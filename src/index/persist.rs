//! 索引文件的二进制读写。
//!
//! 文件布局（bincode，定长小端整数，序列以 u64 长度开头）：
//!
//! ```text
//! magic "FMIX" | version u32 | meta | u64 序列数 | (name, FmIndex)*
//! FmIndex = alphabet(size, symbols) | sa: [i32] | ctab: [u32] | otab(nrow, ncol, [u32])
//! ```
//!
//! 读取时按同样顺序解码，并逐条校验各表的长度和取值是否彼此一致；
//! 任何截断、顺序错乱、长度或计数不符都视为 Decode 错误，不会返回部分索引。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bincode::Options;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::multi::MultiIndex;
use crate::error::{FmError, Result};

const MAGIC: [u8; 4] = *b"FMIX";
pub const FORMAT_VERSION: u32 = 1;
/// 预处理文件的默认扩展名。
pub const INDEX_EXT: &str = "fmidx";

#[derive(Serialize)]
struct IndexFileRef<'a> {
    magic: [u8; 4],
    version: u32,
    index: &'a MultiIndex,
}

#[derive(Deserialize)]
struct IndexFile {
    magic: [u8; 4],
    version: u32,
    index: MultiIndex,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// `genome.fa` -> `genome.fa.fmidx`
pub fn default_index_path(reference: impl AsRef<Path>) -> PathBuf {
    let mut s = reference.as_ref().as_os_str().to_owned();
    s.push(".");
    s.push(INDEX_EXT);
    PathBuf::from(s)
}

pub fn encode<W: Write>(writer: W, index: &MultiIndex) -> Result<()> {
    let file = IndexFileRef { magic: MAGIC, version: FORMAT_VERSION, index };
    codec().serialize_into(writer, &file).map_err(FmError::Encode)
}

pub fn to_bytes(index: &MultiIndex) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode(&mut buf, index)?;
    Ok(buf)
}

pub fn decode(bytes: &[u8]) -> Result<MultiIndex> {
    if bytes.len() < 8 || bytes[..4] != MAGIC {
        return Err(FmError::Decode("missing FMIX header, not an index file".to_string()));
    }
    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != FORMAT_VERSION {
        return Err(FmError::Decode(format!(
            "unsupported format version {} (expected {})",
            version, FORMAT_VERSION
        )));
    }

    let file: IndexFile = codec()
        .deserialize(bytes)
        .map_err(|e| FmError::Decode(e.to_string()))?;
    debug_assert!(file.magic == MAGIC && file.version == FORMAT_VERSION);

    for (name, idx) in file.index.sequences() {
        idx.check()
            .map_err(|why| FmError::Decode(format!("sequence {:?}: {}", name, why)))?;
    }
    Ok(file.index)
}

pub fn save(path: impl AsRef<Path>, index: &MultiIndex) -> Result<()> {
    let path = path.as_ref();
    let io_err = |action, source| FmError::Io { action, path: path.to_path_buf(), source };

    let f = File::create(path).map_err(|e| io_err("create", e))?;
    let mut w = BufWriter::new(f);
    encode(&mut w, index).map_err(|e| match e {
        FmError::Encode(inner) => match *inner {
            bincode::ErrorKind::Io(source) => io_err("write", source),
            other => FmError::Encode(Box::new(other)),
        },
        other => other,
    })?;
    w.flush().map_err(|e| io_err("write", e))?;

    info!(path = %path.display(), sequences = index.len(), "index saved");
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<MultiIndex> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| FmError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;
    let index = decode(&bytes)?;
    info!(path = %path.display(), sequences = index.len(), bytes = bytes.len(), "index loaded");
    Ok(index)
}
