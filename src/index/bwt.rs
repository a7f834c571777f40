use crate::alphabet::SENTINEL;

/// 根据后缀数组构建 BWT。
/// text 为以哨兵结尾的编码序列，sa 为同一序列的后缀数组。
/// bwt[i] = text[sa[i] - 1]，sa[i] == 0 时为哨兵。
pub fn build_bwt(text: &[u8], sa: &[i32]) -> Vec<u8> {
    sa.iter()
        .map(|&p| match p as usize {
            0 => SENTINEL,
            i => text[i - 1],
        })
        .collect()
}
