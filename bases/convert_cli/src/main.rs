// bases/convert_cli/src/main.rs
mod args;

use args::Args;
use clap::Parser;
use color_eyre::Result;
use media_fetch::Converter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(error) = run(&args).await {
        eprintln!("Error: {}", error);
        if args.verbose {
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: &Args) -> Result<()> {
    let converter = Converter::locate(args.ffmpeg.as_deref())?
        .with_bitrate(&args.bitrate)
        .with_overwrite(args.force);

    let output_dir = args.output_dir();
    tracing::debug!(video = %args.video.display(), output_dir = %output_dir.display(), "converting");

    let audio = converter.extract_audio(&args.video, &output_dir).await?;
    println!("Audio file successfully created: {}", audio.display());
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "grab_convert=debug,media_fetch=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
