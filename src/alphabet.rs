use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FmError, Result};

/// 哨兵 `$` 的编码，字典序小于所有真实符号。
pub const SENTINEL: u8 = 0;

/// 封闭字母表：输入字节 <-> 稠密编码 `0..size`。
///
/// 编码 0 预留给哨兵，真实符号按字节升序编码为 `1..size`，
/// 因此编码顺序与原始字节的字典序一致。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAlphabet", into = "RawAlphabet")]
pub struct Alphabet {
    /// symbols[code - 1] = 原始字节
    symbols: Vec<u8>,
    /// codes[byte] = 编码；0 表示不在字母表中
    codes: Box<[u8; 256]>,
}

/// 持久化形式：先写 size，再写按编码排列的符号表。
#[derive(Serialize, Deserialize)]
struct RawAlphabet {
    size: u32,
    symbols: Vec<u8>,
}

impl Alphabet {
    /// 用参考序列中出现过的所有字节构建字母表。
    pub fn from_text(text: &[u8]) -> Result<Self> {
        let mut seen = [false; 256];
        for (position, &b) in text.iter().enumerate() {
            if b == SENTINEL {
                return Err(FmError::ReservedSymbol { position });
            }
            seen[b as usize] = true;
        }
        let symbols = (1..=255u8).filter(|&b| seen[b as usize]).collect();
        Ok(Self::from_sorted(symbols))
    }

    /// 用显式给定的符号集合构建字母表（重复符号会被合并）。
    pub fn from_symbols(symbols: &[u8]) -> Result<Self> {
        Self::from_text(symbols)
    }

    fn from_sorted(symbols: Vec<u8>) -> Self {
        let mut codes = Box::new([0u8; 256]);
        for (i, &b) in symbols.iter().enumerate() {
            codes[b as usize] = (i + 1) as u8;
        }
        Self { symbols, codes }
    }

    /// 字母表大小（含哨兵）。
    #[inline]
    pub fn size(&self) -> usize {
        self.symbols.len() + 1
    }

    /// 真实符号，按编码顺序排列。
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    #[inline]
    pub fn code(&self, symbol: u8) -> Option<u8> {
        match self.codes[symbol as usize] {
            SENTINEL => None,
            c => Some(c),
        }
    }

    /// 编码对应的原始字节；哨兵与越界编码返回 None。
    pub fn symbol(&self, code: u8) -> Option<u8> {
        if code == SENTINEL {
            return None;
        }
        self.symbols.get(code as usize - 1).copied()
    }

    /// 编码整条序列，遇到字母表外的符号时报告其位置。
    pub fn encode(&self, text: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(text.len() + 1);
        for (position, &symbol) in text.iter().enumerate() {
            match self.code(symbol) {
                Some(c) => out.push(c),
                None => return Err(FmError::AlphabetMismatch { symbol, position }),
            }
        }
        Ok(out)
    }

    /// 编码并在末尾追加哨兵。
    pub fn encode_with_sentinel(&self, text: &[u8]) -> Result<Vec<u8>> {
        let mut out = self.encode(text)?;
        out.push(SENTINEL);
        Ok(out)
    }

    /// 查询模式的编码：任一符号不在字母表中时返回 None。
    pub fn encode_pattern(&self, pattern: &[u8]) -> Option<Vec<u8>> {
        pattern.iter().map(|&b| self.code(b)).collect()
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("size", &self.size())
            .field("symbols", &String::from_utf8_lossy(&self.symbols))
            .finish()
    }
}

impl From<Alphabet> for RawAlphabet {
    fn from(alpha: Alphabet) -> Self {
        Self { size: alpha.size() as u32, symbols: alpha.symbols }
    }
}

impl TryFrom<RawAlphabet> for Alphabet {
    type Error = FmError;

    fn try_from(raw: RawAlphabet) -> Result<Self> {
        if raw.size as usize != raw.symbols.len() + 1 {
            return Err(FmError::Decode(format!(
                "alphabet size {} does not match {} symbols",
                raw.size,
                raw.symbols.len()
            )));
        }
        if raw.symbols.first() == Some(&SENTINEL) || raw.symbols.windows(2).any(|w| w[0] >= w[1]) {
            return Err(FmError::Decode("alphabet symbols are not strictly ascending".to_string()));
        }
        Ok(Self::from_sorted(raw.symbols))
    }
}
