use crate::error::Result;

/// 后缀数组构建能力。
///
/// text 为以哨兵 0 结尾的编码序列，sigma 为字母表大小（含哨兵）。
/// 返回 0..n 的一个排列，sa[i] 为字典序第 i 小的后缀起点。
/// 任何正确的实现都可以替换默认的倍增法。
pub trait SuffixArrayBuilder: Sync {
    fn build_sa(&self, text: &[u8], sigma: usize) -> Result<Vec<i32>>;
}

/// 倍增法构建后缀数组，O(n log^2 n)。
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixDoubling;

impl SuffixArrayBuilder for PrefixDoubling {
    fn build_sa(&self, text: &[u8], _sigma: usize) -> Result<Vec<i32>> {
        Ok(build_sa(text))
    }
}

/// 倍增法：每轮按 (rank[i], rank[i+k]) 排序，直到所有 rank 互不相同。
pub fn build_sa(text: &[u8]) -> Vec<i32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i32> = text.iter().map(|&b| i32::from(b)).collect();
    let mut tmp: Vec<i32> = vec![0; n];

    let mut k = 1usize;
    loop {
        let key = |i: usize| (rank[i], if i + k < n { rank[i + k] } else { -1 });
        sa.sort_unstable_by_key(|&i| key(i));

        tmp[sa[0]] = 0;
        for w in 1..n {
            let (a, b) = (sa[w - 1], sa[w]);
            tmp[b] = tmp[a] + i32::from(key(a) != key(b));
        }
        rank.copy_from_slice(&tmp);

        if rank[sa[n - 1]] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }

    sa.into_iter().map(|x| x as i32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_sa(text: &[u8]) -> Vec<i32> {
        let mut idx: Vec<usize> = (0..text.len()).collect();
        idx.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
        idx.into_iter().map(|i| i as i32).collect()
    }

    fn make_text(len: usize, sigma: u32) -> Vec<u8> {
        let mut x: u32 = 1_234_567;
        let mut v = Vec::with_capacity(len + 1);
        for _ in 0..len {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            v.push(((x >> 16) % sigma) as u8 + 1);
        }
        v.push(0);
        v
    }

    #[test]
    fn sa_basic() {
        // a a b $ -> 1 1 2 0
        let sa = build_sa(&[1, 1, 2, 0]);
        assert_eq!(sa, vec![3, 0, 1, 2]);
    }

    #[test]
    fn sentinel_suffix_ranks_first() {
        let text = make_text(50, 4);
        let sa = build_sa(&text);
        assert_eq!(sa[0] as usize, text.len() - 1);
    }

    #[test]
    fn sa_matches_naive_on_small_random_texts() {
        for len in 0..=40 {
            for sigma in [1, 2, 4] {
                let text = make_text(len, sigma);
                assert_eq!(build_sa(&text), naive_sa(&text), "mismatch on len={} sigma={}", len, sigma);
            }
        }
    }

    #[test]
    fn builder_trait_delegates() {
        let text = make_text(17, 3);
        let sa = PrefixDoubling.build_sa(&text, 4).unwrap();
        assert_eq!(sa, naive_sa(&text));
    }
}
