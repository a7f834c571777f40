use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bwt_search::index::{persist, IndexMeta, MultiIndex, PrefixDoubling};
use bwt_search::io::{fasta, fastq::FastqReader, sam};
use bwt_search::Alphabet;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "bwt-search", author, version, about = "Exact read mapping with a BWT/FM index", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Preprocess a reference FASTA into an FM index
    Index {
        /// Reference FASTA file
        reference: PathBuf,
        /// Output index path (default: <reference>.fmidx)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Worker threads for building sequences in parallel (0 = all cores)
        #[arg(short = 't', long = "threads", default_value_t = 0)]
        threads: usize,
        /// Fixed symbol set shared by every sequence, e.g. ACGTN
        #[arg(long)]
        alphabet: Option<String>,
    },
    /// Map FASTQ reads exactly against every reference sequence, writing SAM
    Map {
        /// Reference FASTA that was preprocessed with `index`
        genome: PathBuf,
        /// Reads FASTQ file
        reads: PathBuf,
        /// Path to the index (default: <genome>.fmidx)
        #[arg(short = 'i', long = "index")]
        index: Option<PathBuf>,
        /// Output SAM path (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print every occurrence of the given patterns
    Search {
        /// Path to the index
        #[arg(short = 'i', long = "index")]
        index: PathBuf,
        #[arg(required = true)]
        patterns: Vec<String>,
    },
}

struct IndexOpt {
    threads: usize,
    alphabet: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Index { reference, output, threads, alphabet } => {
            let output = output.unwrap_or_else(|| persist::default_index_path(&reference));
            run_index(&reference, &output, IndexOpt { threads, alphabet })
        }
        Commands::Map { genome, reads, index, out } => {
            let index = index.unwrap_or_else(|| persist::default_index_path(&genome));
            run_map(&index, &reads, out.as_deref())
        }
        Commands::Search { index, patterns } => run_search(&index, &patterns),
    }
}

fn run_index(reference: &Path, output: &Path, opt: IndexOpt) -> Result<()> {
    let records = fasta::read_reference(reference)?;
    if records.is_empty() {
        anyhow::bail!("FASTA file '{}' contains no sequences", reference.display());
    }
    let n_seqs = records.len();
    let total_len: usize = records.iter().map(|r| r.seq.len()).sum();

    rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .build_global()
        .context("cannot start the build thread pool")?;

    let alphabet = opt
        .alphabet
        .as_deref()
        .map(|s| Alphabet::from_symbols(s.as_bytes()))
        .transpose()
        .context("invalid --alphabet")?;

    let seqs: Vec<(String, Vec<u8>)> = records.into_iter().map(|r| (r.name, r.seq)).collect();
    let mut multi = MultiIndex::build(seqs, alphabet.as_ref(), &PrefixDoubling)
        .with_context(|| format!("cannot index '{}'", reference.display()))?;
    multi.set_meta(IndexMeta {
        reference_file: Some(reference.display().to_string()),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
    });

    println!("reference: {}", reference.display());
    println!("sequences: {}", n_seqs);
    println!("total_len: {}", total_len);

    persist::save(output, &multi)?;
    println!("FM index saved: {}", output.display());
    Ok(())
}

fn load_index(path: &Path) -> Result<MultiIndex> {
    persist::load(path).with_context(|| {
        format!("cannot load index '{}', did you remember to preprocess?", path.display())
    })
}

fn run_map(index_path: &Path, reads_path: &Path, out_path: Option<&Path>) -> Result<()> {
    let multi = load_index(index_path)?;

    let fq = std::fs::File::open(reads_path)
        .with_context(|| format!("cannot open reads FASTQ '{}'", reads_path.display()))?;
    let reader = FastqReader::new(std::io::BufReader::new(fq));

    let mut out: Box<dyn Write> = match out_path {
        Some(p) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(p).with_context(|| format!("cannot create '{}'", p.display()))?,
        )),
        None => Box::new(std::io::BufWriter::new(std::io::stdout())),
    };

    sam::map_reads(&multi, reader, &mut out)
        .with_context(|| format!("cannot map reads from '{}'", reads_path.display()))?;
    Ok(())
}

fn run_search(index_path: &Path, patterns: &[String]) -> Result<()> {
    let multi = load_index(index_path)?;
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    write_search_hits(&multi, patterns, &mut out)?;
    out.flush()?;
    Ok(())
}

/// One `name<TAB>offset` line per occurrence, patterns in the order given.
fn write_search_hits<W: Write>(multi: &MultiIndex, patterns: &[String], out: &mut W) -> Result<usize> {
    let mut n_hits = 0;
    for pattern in patterns {
        for (name, pos) in multi.search_all(pattern.as_bytes()) {
            writeln!(out, "{}\t{}", name, pos)?;
            n_hits += 1;
        }
    }
    info!(patterns = patterns.len(), hits = n_hits, "search finished");
    Ok(n_hits)
}
