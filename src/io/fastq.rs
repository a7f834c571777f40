use anyhow::{bail, Result};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub name: String,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

/// 四行格式的 FASTQ 读取器（不支持序列折行）。
pub struct FastqReader<R: BufRead> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: Vec::new(), line_no: 0 }
    }

    fn line(&mut self) -> Result<Option<Vec<u8>>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            self.buf.pop();
        }
        Ok(Some(self.buf.clone()))
    }

    fn required_line(&mut self, what: &str) -> Result<Vec<u8>> {
        match self.line()? {
            Some(l) => Ok(l),
            None => bail!("unexpected EOF after line {}: missing {}", self.line_no, what),
        }
    }

    pub fn next_record(&mut self) -> Result<Option<FastqRecord>> {
        let header = loop {
            match self.line()? {
                None => return Ok(None),
                Some(l) if l.is_empty() => continue,
                Some(l) => break l,
            }
        };
        if header.first() != Some(&b'@') {
            bail!("line {}: FASTQ header not starting with '@'", self.line_no);
        }
        let name = String::from_utf8_lossy(&header[1..])
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_string();

        let seq = self.required_line("sequence")?;
        let plus = self.required_line("'+' separator")?;
        if plus.first() != Some(&b'+') {
            bail!("line {}: expected '+' separator", self.line_no);
        }
        let qual = self.required_line("quality")?;
        if qual.len() != seq.len() {
            bail!(
                "line {}: read '{}' has {} bases but {} quality values",
                self.line_no,
                name,
                seq.len(),
                qual.len()
            );
        }
        Ok(Some(FastqRecord { name, seq, qual }))
    }
}

impl<R: BufRead> Iterator for FastqReader<R> {
    type Item = Result<FastqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
