use anyhow::Context;
use clap::{ArgAction, Parser};
use mp4meta::{Mp4Summary, WalkOptions, read_aggregate};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "MP4 media info: media types, codecs, resolution, duration")]
struct Args {
    /// MP4/ISOBMFF file path
    path: PathBuf,

    /// Output the summary as JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Output every decoded record as JSON
    #[arg(long, conflicts_with = "json")]
    detail: bool,

    /// Limit box nesting depth
    #[arg(long, default_value_t = WalkOptions::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let f = File::open(&args.path).with_context(|| format!("opening {}", args.path.display()))?;
    let size = f.metadata()?.len();
    let mut reader = BufReader::new(f);

    let options = WalkOptions::default().with_max_depth(args.max_depth);
    let agg = read_aggregate(&mut reader, size, &options)
        .with_context(|| format!("reading boxes of {}", args.path.display()))?;

    if args.detail {
        println!("{}", serde_json::to_string_pretty(&agg)?);
        return Ok(());
    }

    let summary = agg.summary().context("summarizing")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_human(&summary);
    }

    Ok(())
}

fn join(tags: &[mp4meta::FourCC]) -> String {
    tags.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}

fn print_human(s: &Mp4Summary) {
    println!("Media types: [{}]", join(&s.media_types));
    println!("Codecs: [{}]", join(&s.codecs));
    println!("Video resolution: {}x{}", s.video_width, s.video_height);
    println!("Duration: {:.2}s", s.duration_seconds);
}
