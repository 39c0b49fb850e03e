mod table;

use anyhow::{Context, Result, bail};
use brightness_signal::pipeline::{AnalysisSession, PipelineConfig};
use brightness_signal::{OversizePolicy, ValidationPolicy, WidthPolicy};
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_PREVIEW_ROWS: usize = 15;
const USAGE: &str = "Usage: signal_tester <image_path> <window_width> <stride> \
[--policy even|four|round] [--reject-oversize] [--table <path>] [--rows <n>] [--parallel]";

#[derive(Debug, PartialEq)]
struct Options {
    image_path: PathBuf,
    config: PipelineConfig,
    table_path: Option<PathBuf>,
    preview_rows: usize,
    parallel: bool,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut positional = Vec::new();
    let mut policy = ValidationPolicy::default();
    let mut table_path = None;
    let mut preview_rows = DEFAULT_PREVIEW_ROWS;
    let mut parallel = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--policy" => {
                let value = iter.next().context("--policy needs a value")?;
                policy.width = match value.as_str() {
                    "even" => WidthPolicy::Even,
                    "four" => WidthPolicy::MultipleOfFour,
                    "round" => WidthPolicy::RoundDownToMultipleOfFour,
                    other => bail!("unknown width policy `{other}`"),
                };
            }
            "--reject-oversize" => policy.oversize = OversizePolicy::Reject,
            "--table" => {
                let value = iter.next().context("--table needs a path")?;
                table_path = Some(PathBuf::from(value));
            }
            "--rows" => {
                let value = iter.next().context("--rows needs a number")?;
                preview_rows = value
                    .parse()
                    .with_context(|| format!("invalid row count `{value}`"))?;
            }
            "--parallel" => parallel = true,
            flag if flag.starts_with("--") => bail!("unknown flag `{flag}`\n{USAGE}"),
            _ => positional.push(arg),
        }
    }

    let [image_path, width, stride] = positional.as_slice() else {
        bail!("{USAGE}");
    };
    let window_width = width
        .parse()
        .with_context(|| format!("window width must be a non-negative integer, got `{width}`"))?;
    let stride = stride
        .parse()
        .with_context(|| format!("stride must be a non-negative integer, got `{stride}`"))?;

    Ok(Options {
        image_path: PathBuf::from(image_path.as_str()),
        config: PipelineConfig {
            window_width,
            stride,
            policy,
            ..Default::default()
        },
        table_path,
        preview_rows,
        parallel,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Logging & Argument Parsing ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(&args)?;

    // --- 2. Session Setup & Image Loading ---
    let mut session = AnalysisSession::new(options.config.clone())?;
    session
        .load_image(&options.image_path)
        .with_context(|| format!("could not analyse {}", options.image_path.display()))?;

    // --- 3. Extraction ---
    let spec = *session.extractor().spec();
    let report = if options.parallel {
        session.extract_parallel().await?
    } else {
        session.extract()?
    };
    info!(
        window_width = spec.width(),
        stride = spec.stride(),
        points = report.signal.len(),
        "signal extracted"
    );

    // --- 4. Presentation ---
    let stdout = io::stdout();
    let mut out = stdout.lock();
    table::write_report(&mut out, report, options.preview_rows)?;
    out.flush()?;

    if let Some(path) = &options.table_path {
        let file = File::create(path).with_context(|| format!("could not create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        table::write_table(&mut writer, &report.signal)?;
        writer.flush()?;
        info!(path = %path.display(), "full table written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn positional_arguments() {
        let options = parse_args(&args("photo.png 16 2")).unwrap();
        assert_eq!(options.image_path, PathBuf::from("photo.png"));
        assert_eq!(options.config.window_width, 16);
        assert_eq!(options.config.stride, 2);
        assert_eq!(options.config.policy, ValidationPolicy::default());
        assert_eq!(options.preview_rows, DEFAULT_PREVIEW_ROWS);
        assert!(options.table_path.is_none());
        assert!(!options.parallel);
    }

    #[test]
    fn flags_anywhere() {
        let options =
            parse_args(&args("--policy four photo.png --table out.txt 8 --reject-oversize 3 --rows 5 --parallel"))
                .unwrap();
        assert_eq!(options.config.policy, ValidationPolicy::strict());
        assert_eq!(options.config.window_width, 8);
        assert_eq!(options.config.stride, 3);
        assert_eq!(options.table_path, Some(PathBuf::from("out.txt")));
        assert_eq!(options.preview_rows, 5);
        assert!(options.parallel);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_args(&args("photo.png 16")).is_err());
        assert!(parse_args(&args("photo.png sixteen 2")).is_err());
        assert!(parse_args(&args("photo.png 16 -1")).is_err());
        assert!(parse_args(&args("photo.png 16 2 --policy odd")).is_err());
        assert!(parse_args(&args("photo.png 16 2 --verbose")).is_err());
    }
}
