//! # PixelDisplay Preview
//!
//! Command-line entry point.

use std::io;

use clap::Parser;
use pixel_preview::{run_compile, run_render, run_trace, CliArgs, Command, PreviewConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("pixel_preview=info,pixel_renderer=info,pixel_core=info")
    });

    // Logs go to stderr so `trace` output stays clean
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true);

    // Use JSON format when RUST_LOG_FORMAT=json
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    tracing::debug!("Parsed arguments: {:?}", args);

    match args.command {
        Command::Render {
            input,
            output,
            display,
        } => {
            let config = PreviewConfig::from(display);
            tracing::info!(
                "Display config: {}x{}, assets in {}",
                config.width,
                config.height,
                config.assets.display()
            );
            run_render(&input, &output, &config)?;
        }
        Command::Compile {
            input,
            output,
            screen,
        } => {
            run_compile(&input, &output, screen.as_deref())?;
        }
        Command::Trace { input, assets } => {
            let stdout = io::stdout();
            run_trace(&input, &assets, &mut stdout.lock())?;
        }
    }

    Ok(())
}
