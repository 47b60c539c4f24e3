use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Generate a slideshow of random rectangles and sine tones (requires `ffmpeg` on PATH).
#[derive(Parser, Debug)]
#[command(name = "torso", version)]
struct Cli {
    /// Slide width in pixels.
    #[arg(short = 'w', long = "width", default_value_t = 640)]
    width: u32,

    /// Slide height in pixels.
    #[arg(short = 't', long = "height", default_value_t = 360)]
    height: u32,

    /// Number of slides.
    #[arg(short = 'n', long = "num_slides", visible_alias = "num-slides", default_value_t = 10)]
    num_slides: u32,

    /// Seconds each slide is shown.
    #[arg(
        short = 'd',
        long = "slide_duration",
        visible_alias = "slide-duration",
        default_value_t = 1.0
    )]
    slide_duration: f64,

    /// Caption font file (TrueType/OpenType).
    #[arg(long = "font", default_value = "arial.ttf")]
    font: PathBuf,

    /// Caption font size.
    #[arg(long = "font_size", visible_alias = "font-size", default_value_t = 24)]
    font_size: u32,

    /// File name shown in each caption.
    #[arg(
        short = 'f',
        long = "displayed_file_name",
        visible_alias = "displayed-file-name",
        default_value = "aqua.flv"
    )]
    displayed_file_name: String,

    /// Lowest tone frequency in Hz.
    #[arg(long = "min_freq", visible_alias = "min-freq", default_value_t = 400)]
    min_freq: u32,

    /// Highest tone frequency in Hz.
    #[arg(long = "max_freq", visible_alias = "max-freq", default_value_t = 1000)]
    max_freq: u32,

    /// Output MP4 path.
    #[arg(
        short = 'o',
        long = "file_name",
        visible_alias = "file-name",
        default_value = "torso_output.mp4"
    )]
    file_name: PathBuf,

    /// Output frame rate.
    #[arg(long = "fps", default_value_t = 25)]
    fps: u32,

    /// Seed for reproducible output; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Also write every slide as `slide_NNNN.png` into this directory.
    #[arg(long = "frames-dir")]
    frames_dir: Option<PathBuf>,

    /// Print the resolved configuration as JSON and exit.
    #[arg(long = "print-config", default_value_t = false)]
    print_config: bool,
}

impl Cli {
    fn video_spec(&self) -> torso::VideoSpec {
        torso::VideoSpec {
            width: self.width,
            height: self.height,
            num_slides: self.num_slides,
            slide_duration: self.slide_duration,
            font: self.font.clone(),
            font_size: self.font_size,
            displayed_file_name: self.displayed_file_name.clone(),
            min_freq: f64::from(self.min_freq),
            max_freq: f64::from(self.max_freq),
            file_name: self.file_name.clone(),
            fps: self.fps,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "torso=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let spec = cli.video_spec();

    if cli.print_config {
        println!("{}", spec.to_json_pretty()?);
        return Ok(());
    }

    let opts = torso::GenerateOpts {
        frames_dir: cli.frames_dir.clone(),
    };
    let report = torso::generate_video_to_file(&spec, cli.seed, &opts)?;
    tracing::info!(
        slides = report.slides,
        frames = report.stats.frames_written,
        "done"
    );

    println!("Video saved as {}", report.output.display());
    Ok(())
}
