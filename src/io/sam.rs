//! SAM 输出：`@SQ` 头与精确命中记录，以及把整份 FASTQ 映射到多序列索引的主循环。

use std::borrow::Cow;
use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::info;

use super::fastq::FastqReader;
use crate::index::{ExactSearch, MultiIndex};

/// 一次映射的计数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapStats {
    pub reads: usize,
    pub skipped: usize,
    pub hits: usize,
}

/// 单条参考序列的 `@SQ` 头行。
pub fn write_sq_header<W: Write>(out: &mut W, name: &str, len: usize) -> Result<()> {
    writeln!(out, "@SQ\tSN:{}\tLN:{}", name, len)?;
    Ok(())
}

/// 一条精确命中：正链、全长匹配、1-based 坐标、MAPQ 为 0。
pub fn write_exact_hit<W: Write>(
    out: &mut W,
    qname: &str,
    rname: &str,
    offset: i32,
    seq: &[u8],
    qual: &[u8],
) -> Result<()> {
    let qual = if qual.is_empty() { Cow::Borrowed("*") } else { String::from_utf8_lossy(qual) };
    writeln!(
        out,
        "{}\t0\t{}\t{}\t0\t{}M\t*\t0\t0\t{}\t{}",
        qname,
        rname,
        offset + 1,
        seq.len(),
        String::from_utf8_lossy(seq),
        qual,
    )?;
    Ok(())
}

/// 先为每条序列写 `@SQ` 头，再逐条读取 reads，对每条序列的每个命中写一行记录。
///
/// 长度为 0 的 read 会命中全部后缀（含哨兵），直接跳过。
pub fn map_reads<R: BufRead, W: Write>(multi: &MultiIndex, reads: FastqReader<R>, out: &mut W) -> Result<MapStats> {
    for (name, idx) in multi {
        write_sq_header(out, name, idx.text_len())?;
    }

    let mut stats = MapStats::default();
    for rec in reads {
        let rec = rec?;
        stats.reads += 1;
        if rec.seq.is_empty() {
            stats.skipped += 1;
            continue;
        }
        for (rname, idx) in multi {
            for pos in idx.search(&rec.seq) {
                write_exact_hit(out, &rec.name, rname, pos, &rec.seq, &rec.qual)?;
                stats.hits += 1;
            }
        }
    }
    out.flush()?;

    info!(reads = stats.reads, skipped = stats.skipped, hits = stats.hits, "mapping finished");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::PrefixDoubling;

    fn genome() -> MultiIndex {
        let seqs = vec![("chr1", b"ACGTACGTTTGACA".to_vec()), ("chr2", b"TTTTACGAAA".to_vec())];
        MultiIndex::build(seqs, None, &PrefixDoubling).unwrap()
    }

    fn map_text(multi: &MultiIndex, fastq: &str) -> (MapStats, Vec<String>) {
        let reader = FastqReader::new(std::io::Cursor::new(fastq.as_bytes().to_vec()));
        let mut out = Vec::new();
        let stats = map_reads(multi, reader, &mut out).unwrap();
        let lines = String::from_utf8(out).unwrap().lines().map(str::to_string).collect();
        (stats, lines)
    }

    #[test]
    fn formats_header_and_hit() {
        let mut out = Vec::new();
        write_sq_header(&mut out, "chr1", 11).unwrap();
        write_exact_hit(&mut out, "read1", "chr1", 4, b"ISSI", b"IIII").unwrap();
        write_exact_hit(&mut out, "read2", "chr1", 0, b"M", b"").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "@SQ\tSN:chr1\tLN:11");
        assert_eq!(lines[1], "read1\t0\tchr1\t5\t0\t4M\t*\t0\t0\tISSI\tIIII");
        assert_eq!(lines[2], "read2\t0\tchr1\t1\t0\t1M\t*\t0\t0\tM\t*");
    }

    #[test]
    fn empty_read_writes_no_records() {
        let multi = genome();
        let (stats, lines) = map_text(&multi, "@empty\n\n+\n\n");
        assert_eq!(stats, MapStats { reads: 1, skipped: 1, hits: 0 });
        assert_eq!(lines, vec!["@SQ\tSN:chr1\tLN:14", "@SQ\tSN:chr2\tLN:10"]);
    }

    #[test]
    fn read_hitting_two_sequences_gives_one_record_each() {
        let multi = genome();
        // TACG：chr1 偏移 3，chr2 偏移 3
        let (stats, lines) = map_text(&multi, "@r1\nTACG\n+\nIIII\n@r2\nCCCC\n+\nIIII\n");
        assert_eq!(stats, MapStats { reads: 2, skipped: 0, hits: 2 });
        assert_eq!(
            &lines[2..],
            &["r1\t0\tchr1\t4\t0\t4M\t*\t0\t0\tTACG\tIIII", "r1\t0\tchr2\t4\t0\t4M\t*\t0\t0\tTACG\tIIII"]
        );
    }

    #[test]
    fn malformed_fastq_stops_mapping() {
        let multi = genome();
        let reader = FastqReader::new(std::io::Cursor::new(b"not fastq\n".to_vec()));
        assert!(map_reads(&multi, reader, &mut Vec::<u8>::new()).is_err());
    }
}
