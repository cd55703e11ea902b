use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};

use crate::gc_content::Region;
use crate::targets::Strand;

pub const REGION_REPORT_HEADER: &str = "start, end";

/// Writes one CSV row per window:
/// `sub_sequence,target_start,offset,strand,window_length,GC_%`.
///
/// `offset` is the position of the first window in the caller's coordinate
/// system and increases by one per row. For circular sequences it wraps back
/// to 0 once it passes `sequence.len() - window_len`.
pub fn write_gc_csv(
    path: &Path,
    sequence: &[u8],
    values: &[f64],
    window_len: usize,
    strand: Strand,
    offset: usize,
    circular: bool,
) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Cannot create {:?}", path))?;
    write_gc_rows(&mut writer, sequence, values, window_len, strand, offset, circular)?;
    writer.flush()?;
    Ok(())
}

fn write_gc_rows<W: Write>(
    writer: &mut csv::Writer<W>,
    sequence: &[u8],
    values: &[f64],
    window_len: usize,
    strand: Strand,
    mut offset: usize,
    circular: bool,
) -> Result<()> {
    writer.write_record(&[
        "sub_sequence",
        "target_start",
        "offset",
        "strand",
        "window_length",
        "GC_%",
    ])?;

    let last_start = sequence.len().saturating_sub(window_len);
    let window_len_field = window_len.to_string();
    for (target_start, gc) in values.iter().enumerate() {
        if circular && offset > last_start {
            offset = 0;
        }
        let end = (target_start + window_len).min(sequence.len());
        let sub_sequence = String::from_utf8_lossy(&sequence[target_start.min(end)..end]);

        let target_start = target_start.to_string();
        let offset_field = offset.to_string();
        let gc = format!("{:.1}", gc);
        writer.write_record(&[
            &*sub_sequence,
            target_start.as_str(),
            offset_field.as_str(),
            strand.label(),
            window_len_field.as_str(),
            gc.as_str(),
        ])?;
        offset += 1;
    }
    Ok(())
}

/// Writes the clustered regions as `start, end` lines below a literal
/// `start, end` header line.
pub fn write_region_report(path: &Path, regions: &[Region]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Cannot create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    write_regions(&mut writer, regions)?;
    writer.flush()?;
    Ok(())
}

fn write_regions<W: Write>(writer: &mut W, regions: &[Region]) -> Result<()> {
    writeln!(writer, "{}", REGION_REPORT_HEADER)?;
    for region in regions {
        writeln!(writer, "{}, {}", region.start, region.end)?;
    }
    Ok(())
}
