//! # PixelDisplay Preview
//!
//! Host-side tool for PixelDisplay240 scenes.
//!
//! ## Usage
//!
//! ```bash
//! # Render a design (JSON or P240) to a PNG
//! pixel-preview render project.json --output frame.png --assets ./data
//!
//! # Compile a design to the P240 stream the device plays back
//! pixel-preview compile project.json --output project.p240
//!
//! # Print the TFT call sequence
//! pixel-preview trace project.p240
//! ```
//!
//! Display size and asset directory also read `PIXEL_WIDTH`,
//! `PIXEL_HEIGHT` and `PIXEL_ASSETS`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use pixel_core::{encode_project, encode_screen, AssetStore, SceneDocument, MAGIC};
use pixel_renderer::{
    DirAssetStore, Framebuffer, GraphicsSurface, ImageDecoder, JpegDecoder, RecordingSurface,
    RenderOutcome, Renderer, Surface,
};

/// Command-line arguments for pixel-preview.
#[derive(Debug, Clone, Parser)]
#[command(name = "pixel-preview")]
#[command(about = "Render, compile and trace PixelDisplay240 scenes")]
#[command(version)]
pub struct CliArgs {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render a scene to a PNG image.
    Render {
        /// Scene file, JSON or P240.
        input: PathBuf,
        /// PNG file to write.
        #[arg(short, long)]
        output: PathBuf,
        /// Display options.
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Compile a JSON design to a P240 stream.
    Compile {
        /// JSON design file.
        input: PathBuf,
        /// P240 file to write.
        #[arg(short, long)]
        output: PathBuf,
        /// Encode only this screen instead of the whole project.
        #[arg(long)]
        screen: Option<String>,
    },
    /// Print the primitive call sequence for a scene.
    Trace {
        /// Scene file, JSON or P240.
        input: PathBuf,
        /// Directory holding `<name>.jpg` assets
        #[arg(long, env = "PIXEL_ASSETS", default_value = ".")]
        assets: PathBuf,
    },
}

/// Display options shared by rendering commands.
#[derive(Debug, Clone, Args)]
pub struct DisplayArgs {
    /// Display width in pixels
    #[arg(long, env = "PIXEL_WIDTH", default_value_t = 240,
          value_parser = clap::value_parser!(u32).range(1..=4096))]
    pub width: u32,

    /// Display height in pixels
    #[arg(long, env = "PIXEL_HEIGHT", default_value_t = 240,
          value_parser = clap::value_parser!(u32).range(1..=4096))]
    pub height: u32,

    /// Directory holding `<name>.jpg` assets
    #[arg(long, env = "PIXEL_ASSETS", default_value = ".")]
    pub assets: PathBuf,
}

/// Preview configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
    /// Asset directory, standing in for the device filesystem root.
    pub assets: PathBuf,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewConfig {
    /// Configuration for the 240x240 panel with assets in the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 240,
            height: 240,
            assets: PathBuf::from("."),
        }
    }
}

impl From<DisplayArgs> for PreviewConfig {
    fn from(args: DisplayArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            assets: args.assets,
        }
    }
}

/// Encoding of a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Design-tool JSON.
    Json,
    /// P240 binary stream.
    Binary,
}

impl InputFormat {
    /// Detect the encoding from the leading bytes.
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&MAGIC) {
            Self::Binary
        } else {
            Self::Json
        }
    }
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Draw a scene file's bytes with any renderer.
///
/// # Errors
///
/// Returns an error if the input is neither valid JSON nor a valid P240
/// stream.
pub fn render_input<S, A, D>(
    renderer: &mut Renderer<S, A, D>,
    bytes: &[u8],
) -> anyhow::Result<RenderOutcome>
where
    S: Surface,
    A: AssetStore,
    D: ImageDecoder,
{
    let format = InputFormat::detect(bytes);
    tracing::debug!(?format, len = bytes.len(), "Rendering input");

    let outcome = match format {
        InputFormat::Binary => renderer
            .render_binary(bytes)
            .context("Invalid P240 stream")?,
        InputFormat::Json => {
            let scene = SceneDocument::from_slice(bytes).context("Invalid scene document")?;
            renderer.render_scene(&scene)
        }
    };

    if !outcome.is_rendered() {
        tracing::warn!(?outcome, "Scene drew nothing");
    }
    Ok(outcome)
}

/// Render a scene file to a PNG.
///
/// # Errors
///
/// Returns an error if the input cannot be read or decoded, or the PNG
/// cannot be written.
pub fn run_render(
    input: &Path,
    output: &Path,
    config: &PreviewConfig,
) -> anyhow::Result<RenderOutcome> {
    let bytes = read_input(input)?;

    let surface = GraphicsSurface::new(Framebuffer::new(config.width, config.height));
    let mut renderer = Renderer::new(
        surface,
        DirAssetStore::new(&config.assets),
        JpegDecoder::new(),
    );
    let outcome = render_input(&mut renderer, &bytes)?;

    let frame = renderer.into_surface().into_inner();
    image::save_buffer_with_format(
        output,
        &frame.to_rgb8(),
        frame.width(),
        frame.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        "Rendered {} to {} ({}x{})",
        input.display(),
        output.display(),
        frame.width(),
        frame.height()
    );
    Ok(outcome)
}

/// Print one line per primitive call to `out`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or decoded, or `out`
/// cannot be written.
pub fn run_trace(
    input: &Path,
    assets: &Path,
    out: &mut impl Write,
) -> anyhow::Result<RenderOutcome> {
    let bytes = read_input(input)?;

    let mut renderer = Renderer::new(
        RecordingSurface::new(),
        DirAssetStore::new(assets),
        JpegDecoder::new(),
    );
    let outcome = render_input(&mut renderer, &bytes)?;

    for call in renderer.surface_mut().take_calls() {
        writeln!(out, "{call}")?;
    }
    Ok(outcome)
}

/// Compile a JSON design to P240. Returns the number of bytes written.
///
/// # Errors
///
/// Returns an error if the input is not a JSON design, the requested screen
/// does not exist, the design exceeds the format's limits, or the output
/// cannot be written.
pub fn run_compile(input: &Path, output: &Path, screen: Option<&str>) -> anyhow::Result<usize> {
    let bytes = read_input(input)?;
    if InputFormat::detect(&bytes) == InputFormat::Binary {
        bail!("{} is already a P240 stream", input.display());
    }

    let scene = SceneDocument::from_slice(&bytes).context("Invalid scene document")?;
    let encoded = match screen {
        Some(id) => {
            let screen = scene
                .screen(id)
                .with_context(|| format!("No screen with id {id:?}"))?;
            encode_screen(screen)?
        }
        None => encode_project(&scene)?,
    };

    fs::write(output, &encoded)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        "Compiled {} to {} ({} bytes)",
        input.display(),
        output.display(),
        encoded.len()
    );
    Ok(encoded.len())
}
