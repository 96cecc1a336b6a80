use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod concat;
mod error;
mod ffmpeg;
mod options;
mod overlay;
mod samples;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: options::Args = clap::Parser::parse();

    match args.command {
        options::Command::Concatenate(args) => {
            let output = concat::concatenate(&args)?;
            println!("Merged into {}", output.display());
        }
        options::Command::Overlay(args) => {
            let output = overlay::overlay(&args)?;
            println!("Wrote {}", output.display());
        }
        options::Command::Samples(args) => {
            let dir = samples::generate(args.kind, args.dir)?;
            println!("Samples written to {}", dir.display());
        }
    }

    Ok(())
}
