#![forbid(unsafe_code)]

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use folio_surface::SurfaceConfig;
use folio_web::replay_jsonl;

struct Args {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn print_usage() {
    eprintln!(
        "Usage: folio_replay --input <log.jsonl> [--output <frames.jsonl>] [--config <config.json>]\n\
         \n\
         Replays a recorded input log headlessly and writes one JSON frame per line.\n\
         Frames go to stdout when --output is omitted. Build with the `tracing-json`\n\
         feature and set RUST_LOG=debug for engine logs on stderr."
    );
}

fn parse_args() -> Result<Args, String> {
    let mut args = env::args().skip(1);
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--input requires a value".to_string())?;
                input = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--output requires a value".to_string())?;
                output = Some(PathBuf::from(value));
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--config requires a value".to_string())?;
                config = Some(PathBuf::from(value));
            }
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other if input.is_none() && !other.starts_with('-') => {
                input = Some(PathBuf::from(other));
            }
            other => return Err(format!("unexpected argument {other}")),
        }
    }

    Ok(Args {
        input: input.ok_or_else(|| "missing --input".to_string())?,
        output,
        config,
    })
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args().inspect_err(|_| {
        print_usage();
    })?;

    #[cfg(feature = "tracing-json")]
    folio_core::logging::init_json().map_err(|err| -> Box<dyn Error> { err })?;

    let config = match &args.config {
        Some(path) => serde_json::from_str::<SurfaceConfig>(&fs::read_to_string(path)?)?,
        None => SurfaceConfig::default(),
    };
    let log = fs::read_to_string(&args.input)?;
    let frames = replay_jsonl(config, &log)?;

    let mut out = String::new();
    for frame in &frames {
        out.push_str(&serde_json::to_string(frame)?);
        out.push('\n');
    }
    match &args.output {
        Some(path) => fs::write(path, out)?,
        None => print!("{out}"),
    }
    folio_core::info!(frames = frames.len(), "replay finished");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("folio_replay error: {err}");
        std::process::exit(1);
    }
}
