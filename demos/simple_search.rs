//! 演示如何在 library 模式下构建多序列索引、保存、加载并查询。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_search
//! ```

use bwt_search::index::{persist, ExactSearch, MultiIndex, PrefixDoubling};

fn main() -> anyhow::Result<()> {
    // 1. 参考序列
    let genome = vec![
        ("chr1", b"ACGTACGTAGCTGATCGTAGCTAGCTAGCTGATCGTAG".to_vec()),
        ("chr2", b"TTGATCGTAGGGCTAGAAAT".to_vec()),
    ];

    // 2. 构建并保存
    let multi = MultiIndex::build(genome, None, &PrefixDoubling)?;
    let path = std::env::temp_dir().join("simple_search.fmidx");
    persist::save(&path, &multi)?;
    println!("索引已保存: {} ({} 条序列)", path.display(), multi.len());

    // 3. 加载并查询
    let loaded = persist::load(&path)?;
    for pattern in [&b"GATCGTAG"[..], b"CTAG", b"NNNN"] {
        let label = String::from_utf8_lossy(pattern);
        for (name, idx) in &loaded {
            let mut hits: Vec<i32> = idx.search(pattern).collect();
            hits.sort_unstable();
            println!("{:<10} {:<5} {:?}", label, name, hits);
        }
    }

    std::fs::remove_file(&path).ok();
    Ok(())
}
