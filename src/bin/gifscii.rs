use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gifscii::{AsciiOptions, CompositedFrame, Disposal, GifSource, ascii, composite_all};

#[derive(Parser, Debug)]
#[command(name = "gifscii", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every frame of an animated GIF as ASCII art.
    Frames(FramesArgs),
    /// Render a still image as ASCII art.
    Image(ImageArgs),
    /// Print per-frame metadata for an animated GIF as JSON.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input GIF path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Emit HTML color spans instead of plain characters.
    #[arg(long)]
    color: bool,

    /// Keep zero-delay preparation frames in the output.
    #[arg(long)]
    keep_zero_delay: bool,

    /// Downscale frames wider than this before rendering.
    #[arg(long)]
    max_width: Option<u32>,
}

#[derive(Parser, Debug)]
struct ImageArgs {
    /// Input image path (anything the `image` crate can open).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Emit HTML color spans instead of plain characters.
    #[arg(long)]
    color: bool,

    /// Downscale images wider than this before rendering.
    #[arg(long)]
    max_width: Option<u32>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input GIF path.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(serde::Serialize, Debug)]
struct FrameInfo {
    index: usize,
    width: u32,
    height: u32,
    delay_cs: u16,
    disposal: Disposal,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Image(args) => cmd_image(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn open_gif(path: &Path) -> anyhow::Result<GifSource<BufReader<File>>> {
    let f = File::open(path).with_context(|| format!("open gif '{}'", path.display()))?;
    Ok(GifSource::new(BufReader::new(f))?)
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let mut source = open_gif(&args.in_path)?;
    let frames = composite_all(&mut source)?;
    let opts = AsciiOptions { color: args.color };

    for (index, frame) in frames.iter().enumerate() {
        // Zero-delay frames are canvas preparation, not display frames;
        // they stay in the decoded sequence and get filtered here.
        if frame.delay_cs == 0 && !args.keep_zero_delay {
            continue;
        }
        let (rgba8, width, height) = frame_pixels(frame, args.max_width)?;
        let text = ascii::render(&rgba8, width, height, &opts)?;
        println!("frame {index} ({} ms)", u32::from(frame.delay_cs) * 10);
        print!("{text}");
    }
    Ok(())
}

fn cmd_image(args: ImageArgs) -> anyhow::Result<()> {
    let img = image::open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?;
    let rgba = downscale(img.to_rgba8(), args.max_width);
    let (width, height) = rgba.dimensions();
    let text = ascii::render(rgba.as_raw(), width, height, &AsciiOptions { color: args.color })?;
    print!("{text}");
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let mut source = open_gif(&args.in_path)?;
    let frames = composite_all(&mut source)?;
    let infos: Vec<FrameInfo> = frames
        .iter()
        .enumerate()
        .map(|(index, frame)| FrameInfo {
            index,
            width: frame.width,
            height: frame.height,
            delay_cs: frame.delay_cs,
            disposal: frame.disposal,
        })
        .collect();
    serde_json::to_writer_pretty(std::io::stdout().lock(), &infos)
        .context("write frame info JSON")?;
    println!();
    Ok(())
}

fn frame_pixels(
    frame: &CompositedFrame,
    max_width: Option<u32>,
) -> anyhow::Result<(Vec<u8>, u32, u32)> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba8.clone())
        .context("composited frame buffer does not match its dimensions")?;
    let img = downscale(img, max_width);
    let (width, height) = img.dimensions();
    Ok((img.into_raw(), width, height))
}

fn downscale(img: image::RgbaImage, max_width: Option<u32>) -> image::RgbaImage {
    let (width, height) = img.dimensions();
    match max_width {
        Some(max) if max > 0 && width > max => {
            let new_height = ((u64::from(height) * u64::from(max)) / u64::from(width)).max(1) as u32;
            image::imageops::resize(&img, max, new_height, image::imageops::FilterType::Triangle)
        }
        _ => img,
    }
}
