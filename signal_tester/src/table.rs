use brightness_signal::pipeline::SignalReport;
use brightness_signal::{BOUNDARY_FRACTION, Balance, Signal};
use std::io::{self, Write};

const RULE_WIDTH: usize = 78;
const LISTED_BOUNDARIES: usize = 10;

/// Prints the first `max_rows` points, then statistics, features, boundaries and probes.
pub fn write_report<W: Write>(out: &mut W, report: &SignalReport, max_rows: usize) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    let thin_rule = "-".repeat(RULE_WIDTH);

    writeln!(out, "TABLE OF y(x) = mu1(x) (first {max_rows} rows)")?;
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "{:^8} {:^10} {:^12} {:^26} {:^8} {:^8}",
        "index", "x", "y(x)", "reading", "boundary", "valley"
    )?;
    writeln!(out, "{thin_rule}")?;
    for (index, (point, contrast)) in report
        .signal
        .points()
        .iter()
        .zip(report.contrasts())
        .take(max_rows)
        .enumerate()
    {
        let marker = |indices: &[usize]| if indices.contains(&index) { "yes" } else { "" };
        writeln!(
            out,
            "{:^8} {:^10.1} {:^12} {:^26} {:^8} {:^8}",
            index,
            point.center,
            point.value,
            contrast.describe(),
            marker(report.features.boundaries.as_slice()),
            marker(report.features.valleys.as_slice())
        )?;
    }
    if report.signal.len() > max_rows {
        writeln!(out, "... ({} more rows)", report.signal.len() - max_rows)?;
    }

    writeln!(out)?;
    writeln!(out, "SIGNAL STATISTICS")?;
    match &report.summary {
        Some(summary) => {
            writeln!(out, "points:    {}", summary.count)?;
            writeln!(out, "x range:   [{:.1} - {:.1}]", summary.first_center, summary.last_center)?;
            writeln!(out, "min y:     {}", summary.min)?;
            writeln!(out, "max y:     {}", summary.max)?;
            writeln!(out, "mean y:    {:.0}", summary.mean)?;
            writeln!(out, "std dev:   {:.0}", summary.std_dev)?;
        }
        None => writeln!(out, "no window fits the image, the signal is empty")?,
    }

    let features = &report.features;
    writeln!(out)?;
    writeln!(out, "SIGNAL FEATURES")?;
    writeln!(out, "{thin_rule}")?;
    writeln!(out, "zero crossings:      {}", features.zero_crossings)?;
    writeln!(out, "local maxima:        {}", features.local_maxima.len())?;
    writeln!(out, "local minima:        {}", features.local_minima.len())?;
    writeln!(out, "significant (>1.5s): {}", features.significant_points)?;
    let balance = match features.balance {
        Balance::Balanced => "brightness is balanced between window halves",
        Balance::RightDominant => "right halves are brighter overall",
        Balance::LeftDominant => "left halves are brighter overall",
    };
    writeln!(out, "balance:             {balance}")?;
    if features.is_complex {
        writeln!(out, "frequent zero crossings: the image has complex structure")?;
    }

    writeln!(out)?;
    writeln!(out, "BOUNDARIES (threshold {BOUNDARY_FRACTION})")?;
    writeln!(out, "{thin_rule}")?;
    writeln!(out, "boundaries found:    {}", features.boundaries.len())?;
    writeln!(out, "valleys found:       {}", features.valleys.len())?;
    if !features.boundaries.is_empty() {
        let points = report.signal.points();
        let listed: Vec<String> = features
            .boundaries
            .iter()
            .take(LISTED_BOUNDARIES)
            .map(|&i| format!("{:.1}", points[i].center))
            .collect();
        writeln!(out, "boundary x:          {}", listed.join(", "))?;
        if features.boundaries.len() > LISTED_BOUNDARIES {
            writeln!(out, "... and {} more", features.boundaries.len() - LISTED_BOUNDARIES)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "SAMPLE WINDOWS")?;
    writeln!(out, "{thin_rule}")?;
    for probe in &report.probes {
        writeln!(
            out,
            "x={:<6} left [{}-{}) sum {:<10} right [{}-{}) sum {:<10} y = {}",
            probe.center,
            probe.left.start,
            probe.left.end,
            probe.left_sum,
            probe.right.start,
            probe.right.end,
            probe.right_sum,
            probe.value
        )?;
    }
    Ok(())
}

/// Writes every point as `x:\t|\ty`, one per line.
pub fn write_table<W: Write>(out: &mut W, signal: &Signal) -> io::Result<()> {
    for point in signal {
        writeln!(out, "{}:\t|\t{}", point.center, point.value)?;
    }
    Ok(())
}
