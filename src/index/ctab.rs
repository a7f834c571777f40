use serde::{Deserialize, Serialize};

/// C 表：cum_sum[a] = BWT 中严格小于 a 的字母数量。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CTable {
    cum_sum: Vec<u32>,
}

impl CTable {
    /// 先统计直方图，再按编码升序求排他前缀和。
    pub fn build(bwt: &[u8], sigma: usize) -> Self {
        let mut cum_sum = vec![0u32; sigma];
        for &ch in bwt {
            cum_sum[ch as usize] += 1;
        }
        let mut acc = 0u32;
        for slot in cum_sum.iter_mut() {
            let count = *slot;
            *slot = acc;
            acc += count;
        }
        Self { cum_sum }
    }

    /// a 必须是合法编码，越界时 panic。
    #[inline]
    pub fn rank(&self, a: u8) -> usize {
        self.cum_sum[a as usize] as usize
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.cum_sum
    }

    pub fn len(&self) -> usize {
        self.cum_sum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cum_sum.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_raw(cum_sum: Vec<u32>) -> Self {
        Self { cum_sum }
    }

    /// 检查反序列化得到的表：首项为 0、单调不减、不超过 n。
    pub(crate) fn check(&self, sigma: usize, n: usize) -> Result<(), String> {
        if self.cum_sum.len() != sigma {
            return Err(format!("c-table has {} entries, alphabet has {}", self.cum_sum.len(), sigma));
        }
        if self.cum_sum.first().is_some_and(|&c| c != 0) {
            return Err("c-table does not start at 0".to_string());
        }
        if self.cum_sum.windows(2).any(|w| w[0] > w[1]) {
            return Err("c-table is not non-decreasing".to_string());
        }
        if self.cum_sum.last().is_some_and(|&c| c as usize > n) {
            return Err(format!("c-table exceeds sequence length {}", n));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctab_of_aab() {
        let ctab = CTable::build(&[2, 0, 1, 1], 3);
        assert_eq!(ctab.as_slice(), &[0, 1, 3]);
        assert_eq!(ctab.rank(0), 0);
        assert_eq!(ctab.rank(1), 1);
        assert_eq!(ctab.rank(2), 3);
    }

    #[test]
    fn ctab_totals_match_length() {
        let bwt = [3u8, 1, 0, 2, 2, 1, 3, 3];
        let ctab = CTable::build(&bwt, 4);
        let last_count = bwt.iter().filter(|&&c| c == 3).count();
        assert_eq!(ctab.rank(3) + last_count, bwt.len());
        assert!(ctab.as_slice().windows(2).all(|w| w[0] <= w[1]));
        assert!(ctab.check(4, bwt.len()).is_ok());
    }

    #[test]
    fn unused_symbols_repeat_previous_sum() {
        let ctab = CTable::build(&[0, 3, 3], 4);
        assert_eq!(ctab.as_slice(), &[0, 1, 1, 1]);
    }

    #[test]
    fn check_rejects_bad_tables() {
        let ctab = CTable { cum_sum: vec![0, 3, 2] };
        assert!(ctab.check(3, 4).is_err());
        let ctab = CTable { cum_sum: vec![1, 2, 3] };
        assert!(ctab.check(3, 4).is_err());
        let ctab = CTable { cum_sum: vec![0, 1, 9] };
        assert!(ctab.check(3, 4).is_err());
        assert!(CTable::build(&[2, 0, 1, 1], 3).check(2, 4).is_err());
    }
}
