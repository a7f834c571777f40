use std::iter::FusedIterator;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bwt::build_bwt;
use super::ctab::CTable;
use super::otab::OTable;
use super::sa::{PrefixDoubling, SuffixArrayBuilder};
use crate::alphabet::Alphabet;
use crate::error::{FmError, Result};

/// 单条序列可索引的最大长度（不含哨兵），受 i32 后缀数组限制。
pub const MAX_SEQ_LEN: usize = i32::MAX as usize - 1;

/// 精确匹配的多态查询接口。
pub trait ExactSearch {
    /// 返回模式所有出现位置，按后缀数组顺序（不是按坐标排序）。
    fn search(&self, pattern: &[u8]) -> Matches<'_>;

    /// 回调形式：每个命中位置调用一次 f，未命中则一次也不调用。
    fn for_each_match<F: FnMut(i32)>(&self, pattern: &[u8], f: F)
    where
        Self: Sized,
    {
        self.search(pattern).for_each(f);
    }

    fn count(&self, pattern: &[u8]) -> usize {
        self.search(pattern).len()
    }
}

/// 单条参考序列的 FM 索引：字母表 + 完整 SA + C 表 + 稠密 O 表。
///
/// 构建后不可变，可在任意多个线程间共享查询。
/// 字段顺序即持久化顺序，不要调整。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FmIndex {
    alphabet: Alphabet,
    sa: Vec<i32>,
    ctab: CTable,
    otab: OTable,
}

impl FmIndex {
    /// 用参考序列自身的符号构建字母表，默认倍增法构建 SA。
    pub fn build(seq: &[u8]) -> Result<Self> {
        Self::build_with(seq, &PrefixDoubling)
    }

    pub fn build_with<B: SuffixArrayBuilder + ?Sized>(seq: &[u8], builder: &B) -> Result<Self> {
        let alphabet = Alphabet::from_text(seq)?;
        Self::build_with_alphabet(seq, alphabet, builder)
    }

    /// 使用给定字母表构建；参考中出现字母表外的符号时返回 AlphabetMismatch。
    pub fn build_with_alphabet<B: SuffixArrayBuilder + ?Sized>(
        seq: &[u8],
        alphabet: Alphabet,
        builder: &B,
    ) -> Result<Self> {
        if seq.len() > MAX_SEQ_LEN {
            return Err(FmError::SequenceTooLong { len: seq.len(), max: MAX_SEQ_LEN });
        }
        let text = alphabet.encode_with_sentinel(seq)?;
        let sigma = alphabet.size();

        let sa = builder.build_sa(&text, sigma)?;
        let bwt = build_bwt(&text, &sa);
        let ctab = CTable::build(&bwt, sigma);
        let otab = OTable::build(&bwt, sigma);
        debug!(n = text.len(), sigma, otab_entries = otab.as_slice().len(), "fm tables built");

        Ok(Self { alphabet, sa, ctab, otab })
    }

    /// 反向搜索：返回 SA 上的半开区间 [l, r)。
    /// 模式含字母表外符号或区间为空时返回 None；空模式返回整个 [0, n)。
    pub fn backward_search(&self, pattern: &[u8]) -> Option<Range<usize>> {
        let coded = self.alphabet.encode_pattern(pattern)?;
        self.backward_search_coded(&coded)
    }

    /// pattern 已编码，且不含哨兵。
    fn backward_search_coded(&self, pattern: &[u8]) -> Option<Range<usize>> {
        let mut l = 0usize;
        let mut r = self.sa.len();
        for &a in pattern.iter().rev() {
            let c0 = self.ctab.rank(a);
            l = c0 + self.otab.rank(a, l);
            r = c0 + self.otab.rank(a, r);
            if l >= r {
                return None;
            }
        }
        Some(l..r)
    }

    /// 取出 SA 区间对应的文本位置；区间越界时返回 None。
    pub fn sa_interval_positions(&self, range: Range<usize>) -> Option<&[i32]> {
        self.sa.get(range)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn suffix_array(&self) -> &[i32] {
        &self.sa
    }

    pub fn ctab(&self) -> &CTable {
        &self.ctab
    }

    pub fn otab(&self) -> &OTable {
        &self.otab
    }

    /// 编码序列长度 n（含哨兵）。
    pub fn len(&self) -> usize {
        self.sa.len()
    }

    /// 原始参考序列长度（不含哨兵）。
    pub fn text_len(&self) -> usize {
        self.sa.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.text_len() == 0
    }

    /// 校验反序列化得到的各表是否彼此一致。
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        let n = self.sa.len();
        let sigma = self.alphabet.size();
        if n == 0 {
            return Err("suffix array is empty".to_string());
        }
        let mut seen = vec![false; n];
        for &p in &self.sa {
            match usize::try_from(p) {
                Ok(i) if i < n && !seen[i] => seen[i] = true,
                _ => return Err(format!("suffix array is not a permutation of 0..{}", n)),
            }
        }
        if self.sa[0] as usize != n - 1 {
            return Err("suffix array does not start with the sentinel suffix".to_string());
        }
        self.ctab.check(sigma, n)?;
        self.otab.check(sigma, n)?;

        // C(a+1) - C(a) 必须等于 a 在整个 BWT 中的次数，哨兵恰好一个
        let c = self.ctab.as_slice();
        if sigma == 1 {
            return if n == 1 { Ok(()) } else { Err(format!("empty alphabet but {} suffixes", n)) };
        }
        if c[1] != 1 {
            return Err(format!("c-table counts {} sentinels, expected 1", c[1]));
        }
        for a in 1..sigma {
            let end = c.get(a + 1).map_or(n, |&next| next as usize);
            let count = self.otab.rank(a as u8, n);
            if c[a] as usize + count != end {
                return Err(format!(
                    "c-table entry {} (= {}) plus {} occurrences does not reach {}",
                    a, c[a], count, end
                ));
            }
        }
        Ok(())
    }
}

impl ExactSearch for FmIndex {
    fn search(&self, pattern: &[u8]) -> Matches<'_> {
        match self.backward_search(pattern) {
            Some(range) => Matches { inner: self.sa[range].iter() },
            None => Matches::empty(),
        }
    }
}

/// 一次查询的命中位置；有限且不可重启，重新搜索即可再次获得。
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    inner: std::slice::Iter<'a, i32>,
}

impl Matches<'_> {
    fn empty() -> Self {
        Matches { inner: <&[i32]>::default().iter() }
    }
}

impl Iterator for Matches<'_> {
    type Item = i32;

    #[inline]
    fn next(&mut self) -> Option<i32> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Matches<'_> {}

impl FusedIterator for Matches<'_> {}
