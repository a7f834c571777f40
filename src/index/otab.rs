use serde::{Deserialize, Serialize};

use crate::alphabet::SENTINEL;

/// O 表（rank 表）：O(a, i) = bwt[0..i) 中字母 a 的出现次数。
///
/// 稠密存储为 (sigma-1) × n 的行优先矩阵：
/// - 不存哨兵所在的行（查询从不统计 $）；
/// - 不存 i = 0 这一列（恒为 0），读取时特判。
///
/// 空间 O(sigma × n)，换取 O(1) 的 rank 查询。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OTable {
    nrow: usize,
    ncol: usize,
    table: Vec<u32>,
}

impl OTable {
    pub fn build(bwt: &[u8], sigma: usize) -> Self {
        let nrow = sigma.saturating_sub(1);
        let ncol = bwt.len();
        let mut otab = Self { nrow, ncol, table: vec![0; nrow * ncol] };
        if ncol == 0 {
            return otab;
        }

        // 第 1 列：只有 bwt[0] 对应的行为 1
        if bwt[0] != SENTINEL {
            otab.set(bwt[0], 1, 1);
        }

        // 其余列：复制上一列，遇到本行字母时加一
        for a in 1..sigma {
            let a = a as u8;
            for i in 2..=ncol {
                let prev = otab.get(a, i - 1);
                otab.set(a, i, prev + u32::from(bwt[i - 1] == a));
            }
        }
        otab
    }

    #[inline]
    fn offset(&self, a: u8, i: usize) -> usize {
        // 行号减一：不存哨兵；列号减一：不存第 0 列
        self.ncol * (a as usize - 1) + (i - 1)
    }

    #[inline]
    fn get(&self, a: u8, i: usize) -> u32 {
        self.table[self.offset(a, i)]
    }

    #[inline]
    fn set(&mut self, a: u8, i: usize, val: u32) {
        let off = self.offset(a, i);
        self.table[off] = val;
    }

    /// 返回 bwt[0..i) 中 a 的出现次数。a 不能是哨兵。
    #[inline]
    pub fn rank(&self, a: u8, i: usize) -> usize {
        debug_assert!(a != SENTINEL, "the sentinel has no row in the o-table");
        if i == 0 {
            return 0;
        }
        self.get(a, i) as usize
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// 行优先展平后的矩阵。
    pub fn as_slice(&self) -> &[u32] {
        &self.table
    }

    pub(crate) fn check(&self, sigma: usize, n: usize) -> Result<(), String> {
        if self.nrow != sigma.saturating_sub(1) {
            return Err(format!("o-table has {} rows, expected {}", self.nrow, sigma.saturating_sub(1)));
        }
        if self.ncol != n {
            return Err(format!("o-table has {} columns, expected {}", self.ncol, n));
        }
        if self.nrow.checked_mul(self.ncol) != Some(self.table.len()) {
            return Err(format!(
                "o-table holds {} entries, expected {} x {}",
                self.table.len(),
                self.nrow,
                self.ncol
            ));
        }
        if self.ncol == 0 {
            return Ok(());
        }

        // 每行从 0 或 1 开始，逐列最多加一
        let mut col_sum = vec![0usize; self.ncol];
        for (r, row) in self.table.chunks_exact(self.ncol).enumerate() {
            let mut prev = 0u32;
            for (i, &v) in row.iter().enumerate() {
                if v < prev || v - prev > 1 {
                    return Err(format!("o-table row {} jumps from {} to {} at column {}", r + 1, prev, v, i + 1));
                }
                prev = v;
                col_sum[i] += v as usize;
            }
        }

        // 每个 BWT 位置至多一个字母，且全表只有一个位置留给哨兵
        let mut prev = 0usize;
        for (i, &sum) in col_sum.iter().enumerate() {
            let i = i + 1;
            if sum < prev || sum - prev > 1 || sum + 1 < i {
                return Err(format!("o-table column {} sums to {}, expected {} or {}", i, sum, i - 1, i));
            }
            prev = sum;
        }
        Ok(())
    }
}
