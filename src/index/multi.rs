use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::fm::{ExactSearch, FmIndex};
use super::sa::SuffixArrayBuilder;
use crate::alphabet::Alphabet;
use crate::error::{FmError, Result};

/// 索引构建信息，随索引一起持久化。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub reference_file: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 多条命名参考序列的索引集合：name -> FmIndex。
///
/// 各序列相互独立，没有跨序列状态；迭代顺序按名称排序，但调用方不应依赖它。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiIndex {
    meta: IndexMeta,
    sequences: BTreeMap<String, FmIndex>,
}

impl MultiIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为每条序列构建一个 FM 索引；不同序列在 rayon 线程池上并行构建。
    ///
    /// alphabet 为 None 时每条序列使用自身出现过的符号。
    pub fn build<N, S, B>(sequences: Vec<(N, S)>, alphabet: Option<&Alphabet>, builder: &B) -> Result<Self>
    where
        N: Into<String> + Send,
        S: AsRef<[u8]> + Send,
        B: SuffixArrayBuilder + ?Sized,
    {
        let named: Vec<(String, S)> = sequences.into_iter().map(|(n, s)| (n.into(), s)).collect();
        let mut names = HashSet::with_capacity(named.len());
        for (name, _) in &named {
            if !names.insert(name.as_str()) {
                return Err(FmError::DuplicateSequence { name: name.clone() });
            }
        }

        let built = named
            .into_par_iter()
            .map(|(name, seq)| {
                let seq = seq.as_ref();
                let idx = match alphabet {
                    Some(alpha) => FmIndex::build_with_alphabet(seq, alpha.clone(), builder)?,
                    None => FmIndex::build_with(seq, builder)?,
                };
                info!(sequence = %name, len = seq.len(), sigma = idx.alphabet().size(), "indexed sequence");
                Ok::<_, FmError>((name, idx))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { meta: IndexMeta::default(), sequences: built.into_iter().collect() })
    }

    /// 插入一条索引，返回被替换的旧索引（若名称已存在）。
    pub fn insert(&mut self, name: impl Into<String>, index: FmIndex) -> Option<FmIndex> {
        self.sequences.insert(name.into(), index)
    }

    pub fn get(&self, name: &str) -> Option<&FmIndex> {
        self.sequences.get(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FmIndex> {
        self.sequences.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    pub fn set_meta(&mut self, meta: IndexMeta) {
        self.meta = meta;
    }

    /// 所有序列的总长度（不含哨兵）。
    pub fn total_len(&self) -> usize {
        self.sequences.values().map(FmIndex::text_len).sum()
    }

    /// 将同一个模式分发到每条序列，产出 (序列名, 位置)。
    pub fn search_all<'a>(&'a self, pattern: &'a [u8]) -> impl Iterator<Item = (&'a str, i32)> + 'a {
        self.sequences
            .iter()
            .flat_map(move |(name, idx)| idx.search(pattern).map(move |pos| (name.as_str(), pos)))
    }

    pub(crate) fn sequences(&self) -> &BTreeMap<String, FmIndex> {
        &self.sequences
    }
}

impl<'a> IntoIterator for &'a MultiIndex {
    type Item = (&'a String, &'a FmIndex);
    type IntoIter = btree_map::Iter<'a, String, FmIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::sa::PrefixDoubling;

    fn genome() -> Vec<(&'static str, &'static [u8])> {
        vec![
            ("chr1", b"ACGTACGTTTGACA".as_slice()),
            ("chr2", b"TTTTACGAAA".as_slice()),
            ("chrM", b"GGGGGG".as_slice()),
        ]
    }

    #[test]
    fn builds_one_index_per_sequence() {
        let multi = MultiIndex::build(genome(), None, &PrefixDoubling).unwrap();
        assert_eq!(multi.len(), 3);
        assert_eq!(multi.names().collect::<Vec<_>>(), vec!["chr1", "chr2", "chrM"]);
        assert_eq!(multi.total_len(), 14 + 10 + 6);
        assert_eq!(multi.get("chrM").unwrap().alphabet().size(), 2);
        assert!(multi.get("chrX").is_none());
    }

    #[test]
    fn search_fans_out_across_sequences() {
        let multi = MultiIndex::build(genome(), None, &PrefixDoubling).unwrap();
        let mut hits: Vec<(&str, i32)> = multi.search_all(b"ACG").collect();
        hits.sort_unstable();
        assert_eq!(hits, vec![("chr1", 0), ("chr1", 4), ("chr2", 4)]);

        // chrM 的字母表里没有 A，直接短路为空
        assert_eq!(multi.get("chrM").unwrap().search(b"GA").count(), 0);
        let ga: Vec<_> = multi.search_all(b"GA").collect();
        assert_eq!(ga, vec![("chr1", 10), ("chr2", 6)]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let seqs = vec![("chr1", b"ACGT".to_vec()), ("chr1", b"TTTT".to_vec())];
        let err = MultiIndex::build(seqs, None, &PrefixDoubling).unwrap_err();
        assert!(matches!(err, FmError::DuplicateSequence { ref name } if name == "chr1"));
    }

    #[test]
    fn shared_alphabet_errors_abort_the_build() {
        let alpha = Alphabet::from_symbols(b"ACGT").unwrap();
        let seqs = vec![("ok", b"ACGT".to_vec()), ("bad", b"ACNT".to_vec())];
        let err = MultiIndex::build(seqs, Some(&alpha), &PrefixDoubling).unwrap_err();
        assert!(matches!(err, FmError::AlphabetMismatch { symbol: b'N', position: 2 }));
    }

    #[test]
    fn insert_replaces_existing() {
        let mut multi = MultiIndex::new();
        assert!(multi.is_empty());
        assert!(multi.insert("a", FmIndex::build(b"AC").unwrap()).is_none());
        let old = multi.insert("a", FmIndex::build(b"GT").unwrap()).unwrap();
        assert_eq!(old.text_len(), 2);
        assert_eq!(multi.get("a").unwrap().search(b"GT").collect::<Vec<_>>(), vec![0]);
        assert_eq!((&multi).into_iter().count(), 1);
    }
}
