use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use anyhow::{anyhow, bail, Context, Result};
use bio::alphabets::dna;
use bio::io::fasta;
use flate2::read::GzDecoder;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{bytes, Regex};
use serde::Deserialize;

/// Name of the target table expected inside a target directory
pub const META_TARGETS_FILE: &str = "meta_targets.tsv";

lazy_static! {
    static ref NUCLEOTIDES: bytes::Regex = bytes::Regex::new(r"^[ACGTNacgtn]*$").unwrap();
    static ref UNSAFE_NAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

/// Which strand of a target is analysed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    /// Label used in target files and output tables
    pub fn label(&self) -> &'static str {
        match self {
            Strand::Forward => "sequence",
            Strand::Reverse => "sequence_rc",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequence" | "forward" | "+" => Ok(Strand::Forward),
            "sequence_rc" | "reverse" | "-" => Ok(Strand::Reverse),
            _ => Err(anyhow!(
                "Unknown strand '{}', expected 'sequence' or 'sequence_rc'",
                s
            )),
        }
    }
}

/// A named sequence of the selected strand
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub name: String,
    pub sequence: Vec<u8>,
}

impl Target {
    fn new(name: &str, sequence: Vec<u8>) -> Self {
        if !NUCLEOTIDES.is_match(&sequence) {
            warn!(
                "Target '{}' contains characters other than A, C, G, T and N; they count as non-GC",
                name
            );
        }
        Target {
            name: sanitize_name(name),
            sequence,
        }
    }
}

// JSON target file, only the selected strand has to be present
#[derive(Deserialize)]
struct TargetFile {
    sequence: Option<String>,
    sequence_rc: Option<String>,
}

// One row of meta_targets.tsv, other columns are ignored
#[derive(Deserialize)]
struct MetaTarget {
    gene: String,
    seq: String,
    rc_seq: String,
}

enum InputKind {
    Json,
    Fasta,
}

/// Loads all targets from `path` for the given strand.
///
/// `path` is either a JSON target file, a FASTA file (both optionally gzip
/// compressed), or a directory containing a `meta_targets.tsv` table.
pub fn load_targets(path: &Path, strand: Strand) -> Result<Vec<Target>> {
    if path.is_dir() {
        return read_meta_targets(&path.join(META_TARGETS_FILE), strand);
    }

    match input_kind(path)? {
        InputKind::Json => Ok(vec![read_json_target(path, strand)?]),
        InputKind::Fasta => read_fasta_targets(path, strand),
    }
}

fn input_kind(path: &Path) -> Result<InputKind> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid input path {:?}", path))?;
    let name = name.strip_suffix(".gz").unwrap_or(name);

    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("json") => Ok(InputKind::Json),
        Some("fa" | "fasta" | "fna") => Ok(InputKind::Fasta),
        _ => bail!(
            "Unsupported input {:?}: expected .json, .fa/.fasta/.fna or a directory with {}",
            path,
            META_TARGETS_FILE
        ),
    }
}

/// File name without `.gz` and the format extension
fn target_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

fn read_json_target(path: &Path, strand: Strand) -> Result<Target> {
    let reader = MaybeCompressedReader::new(path)?;
    let data: TargetFile = serde_json::from_reader(reader)
        .with_context(|| format!("Error loading input json file {:?}", path))?;

    debug!("Using {} strand of {:?}", strand, path);
    let sequence = match strand {
        Strand::Forward => data.sequence,
        Strand::Reverse => data.sequence_rc,
    }
    .ok_or_else(|| anyhow!("{:?} has no '{}' field", path, strand.label()))?;
    Ok(Target::new(&target_name(path), sequence.into_bytes()))
}

fn read_fasta_targets(path: &Path, strand: Strand) -> Result<Vec<Target>> {
    let reader = MaybeCompressedReader::new(path)?;

    let mut targets = Vec::new();
    for record in fasta::Reader::new(reader).records() {
        let record = record.with_context(|| format!("Error reading FASTA file {:?}", path))?;
        let sequence = match strand {
            Strand::Forward => record.seq().to_vec(),
            Strand::Reverse => dna::revcomp(record.seq()),
        };
        targets.push(Target::new(record.id(), sequence));
    }

    if targets.is_empty() {
        bail!("FASTA file {:?} has no records", path);
    }
    Ok(targets)
}

fn read_meta_targets(path: &Path, strand: Strand) -> Result<Vec<Target>> {
    let reader = MaybeCompressedReader::new(path)?;
    let mut tsv = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(reader);

    let mut targets = Vec::new();
    for row in tsv.deserialize() {
        let row: MetaTarget = row.with_context(|| format!("Error parsing {:?}", path))?;
        let sequence = match strand {
            Strand::Forward => row.seq,
            Strand::Reverse => row.rc_seq,
        };
        targets.push(Target::new(&row.gene, sequence.into_bytes()));
    }

    if targets.is_empty() {
        bail!("{:?} contains no targets", path);
    }
    Ok(targets)
}

/// Makes a target name usable as a file name stem
pub fn sanitize_name(name: &str) -> String {
    let name = UNSAFE_NAME_CHARS.replace_all(name.trim(), "_");
    if name.is_empty() {
        "target".to_string()
    } else {
        name.into_owned()
    }
}

/// Appends the first `window_len` bases of a circular sequence to its end,
/// so windows starting near the end wrap around to the start.
/// The analysis then yields `sequence.len() + 1` windows; the last one
/// covers the same bases as the first.
pub fn circularize(sequence: &[u8], window_len: usize) -> Vec<u8> {
    let mut circular = Vec::with_capacity(sequence.len() + window_len);
    circular.extend_from_slice(sequence);
    // sequences shorter than the window wrap more than once
    circular.extend(sequence.iter().cycle().take(window_len));
    circular
}

/// Reader for a file that could be gz compressed or not
struct MaybeCompressedReader;

impl MaybeCompressedReader {
    /// Checks if the file is gz compressed by looking at the extension,
    /// and returns the correct Reader
    fn new(path: &Path) -> Result<Box<dyn BufRead>> {
        let file = File::open(path).with_context(|| format!("Cannot open {:?}", path))?;
        match path.extension() {
            Some(ext) if ext == "gz" => Ok(Box::new(BufReader::new(GzDecoder::new(file)))),
            _ => Ok(Box::new(BufReader::new(file))),
        }
    }
}
