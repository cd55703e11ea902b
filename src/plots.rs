use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use crate::targets::Strand;

// Rust really needs a better plotting library...
pub fn plot_gc_profile(
    path: &Path,
    values: &[f64],
    sequence: &[u8],
    window_len: usize,
    strand: Strand,
    threshold: f64,
) -> Result<()> {
    let figure = SVGBackend::new(path, (1000, 400)).into_drawing_area();

    figure.fill(&WHITE)?;

    let preview = String::from_utf8_lossy(&sequence[..sequence.len().min(20)]);
    let caption = format!(
        "GC profile of '{}...' with window size = {}",
        preview, window_len
    );

    let mut chart = ChartBuilder::on(&figure)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .caption(caption, ("Source Sans Pro", 16))
        .build_cartesian_2d(0..values.len().max(1), 0f64..100f64)?;

    // configure labels, axes, etc.
    chart
        .configure_mesh()
        .x_desc(strand.label())
        .y_desc("GC percentage %")
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            values.iter().copied().enumerate(),
            ygb_color(0.8),
        ))?
        .label(format!("{} bp windows", window_len))
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], ygb_color(0.8).filled()));

    // horizontal line at the high-GC threshold
    let threshold_color = RGBColor(200, 60, 60);
    chart
        .draw_series(LineSeries::new(
            [(0, threshold), (values.len().max(1), threshold)],
            threshold_color,
        ))?
        .label(format!("threshold {}%", threshold))
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - 1), (x + 10, y + 1)], threshold_color.filled())
        });

    // configure the legend
    chart
        .configure_series_labels()
        .margin(5)
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.filled())
        .border_style(&BLACK)
        .draw()?;

    figure.present()?;
    Ok(())
}

fn ygb_color(idx: f64) -> RGBColor {
    let color = colorous::YELLOW_GREEN_BLUE.eval_continuous(idx).as_tuple();
    RGBColor(color.0, color.1, color.2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gc_content::compute_gc_profile;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn profile_is_rendered_as_svg() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("profile.svg");
        let seq = b"GGGCCCAATTATGCGCGCATATATGGGCCC";
        let profile = compute_gc_profile(seq, 5, 60.0)?;

        plot_gc_profile(&path, &profile.values, seq, 5, Strand::Forward, 60.0)?;

        let svg = fs::read_to_string(&path)?;
        assert!(svg.contains("<svg"));
        Ok(())
    }
}
