use anyhow::{bail, Context, Result};
use std::io::BufRead;
use std::path::Path;

/// 一条带名字的参考序列。除去换行和空白外原样保留字节，字母表据此取得真实符号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub name: String,
    pub seq: Vec<u8>,
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    line: Vec<u8>,
    pending_header: Option<String>,
    line_no: usize,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: Vec::new(), pending_header: None, line_no: 0 }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        let n = self.reader.read_until(b'\n', &mut self.line)?;
        self.line_no += 1;
        Ok(n > 0)
    }

    /// 记录名取 header 中第一个空白分隔的词。
    fn header_name(&self) -> Result<String> {
        let header = String::from_utf8_lossy(&self.line[1..]);
        match header.split_whitespace().next() {
            Some(name) => Ok(name.to_string()),
            None => bail!("line {}: FASTA header without a name", self.line_no),
        }
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        let name = match self.pending_header.take() {
            Some(h) => h,
            None => loop {
                if !self.read_line()? {
                    return Ok(None);
                }
                if self.line.starts_with(b">") {
                    break self.header_name()?;
                }
                if !self.line.iter().all(u8::is_ascii_whitespace) {
                    bail!("line {}: sequence data before the first FASTA header", self.line_no);
                }
            },
        };

        let mut seq = Vec::new();
        while self.read_line()? {
            if self.line.starts_with(b">") {
                self.pending_header = Some(self.header_name()?);
                break;
            }
            seq.extend(self.line.iter().copied().filter(|b| !b.is_ascii_whitespace()));
        }
        Ok(Some(FastaRecord { name, seq }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// 读取参考 FASTA 文件中的全部记录。
pub fn read_reference(path: impl AsRef<Path>) -> Result<Vec<FastaRecord>> {
    let path = path.as_ref();
    let fh = std::fs::File::open(path)
        .with_context(|| format!("cannot open reference FASTA '{}'", path.display()))?;
    FastaReader::new(std::io::BufReader::new(fh))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("cannot parse reference FASTA '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(data: &[u8]) -> Result<Vec<FastaRecord>> {
        FastaReader::new(Cursor::new(data)).collect()
    }

    #[test]
    fn parse_multi_record_fasta() {
        let recs = parse(b">chr1 first chromosome\nACgT\nNNAC\n>chr2\nAAA\n").unwrap();
        assert_eq!(
            recs,
            vec![
                FastaRecord { name: "chr1".into(), seq: b"ACgTNNAC".to_vec() },
                FastaRecord { name: "chr2".into(), seq: b"AAA".to_vec() },
            ]
        );
    }

    #[test]
    fn crlf_blank_lines_and_no_trailing_newline() {
        let recs = parse(b"\n\n>chr1\r\nAC G\r\n\r\n TT\r\n>chr2\nGG").unwrap();
        assert_eq!(recs[0].seq, b"ACGTT");
        assert_eq!(recs[1].name, "chr2");
        assert_eq!(recs[1].seq, b"GG");
    }

    #[test]
    fn empty_record_is_kept() {
        let recs = parse(b">empty\n>full\nACGT\n").unwrap();
        assert_eq!(recs.len(), 2);
        assert!(recs[0].seq.is_empty());
    }

    #[test]
    fn data_before_header_is_an_error() {
        assert!(parse(b"ACGT\n>chr1\nAC\n").is_err());
        assert!(parse(b">\nAC\n").is_err());
    }
}
