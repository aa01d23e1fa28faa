use clap::{Parser, ValueEnum};
use fast_corner::{fast, ring, score, util, ArcLength, FastConfig, FastPoint, NonMaximalSuppression};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum NonMax {
    Off,
    MaxThreshold,
    SumAbsolute,
}

impl From<NonMax> for NonMaximalSuppression {
    fn from(v: NonMax) -> Self {
        match v {
            NonMax::Off => NonMaximalSuppression::Off,
            NonMax::MaxThreshold => NonMaximalSuppression::MaxThreshold,
            NonMax::SumAbsolute => NonMaximalSuppression::SumAbsolute,
        }
    }
}

/// Detect FAST corners in an image and draw them.
#[derive(Parser, Debug)]
#[command(name = "fast_corner", version)]
struct Cli {
    /// Input image, converted to grey.
    input: PathBuf,

    /// Annotated output image.
    #[arg(long, default_value = "/tmp/output.png")]
    output: PathBuf,

    /// JSON configuration, flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Barrier the intensity difference must exceed.
    #[arg(long)]
    threshold: Option<i32>,

    /// Count of consecutive ring pixels, 7 to 12.
    #[arg(long, value_parser = parse_arc_length)]
    count: Option<ArcLength>,

    /// Non maximal suppression.
    #[arg(long, value_enum)]
    nonmax: Option<NonMax>,

    /// Write the corners and their scores as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Also draw the detections before suppression, in green.
    #[arg(long)]
    raw: bool,

    /// Write a raster of the sampling ring, scaled by `--ring-scale`.
    #[arg(long)]
    ring_image: Option<PathBuf>,

    #[arg(long, default_value_t = 16)]
    ring_scale: u32,
}

fn parse_arc_length(s: &str) -> Result<ArcLength, String> {
    let n: u8 = s.parse().map_err(|e| format!("{e}"))?;
    ArcLength::new(n).map_err(|e| e.to_string())
}

#[derive(Serialize)]
struct CornerRecord {
    x: u32,
    y: u32,
    score: i32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FastConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => FastConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    if let Some(count) = cli.count {
        config.count = count;
    }
    if let Some(nonmax) = cli.nonmax {
        config.non_maximal_suppression = nonmax.into();
    }
    log::info!("config: {config:?}");

    if let Some(path) = &cli.ring_image {
        ring::ring_image(cli.ring_scale).save(path)?;
        log::info!("ring raster written to {}", path.display());
    }

    let luma_view = image::open(&cli.input)
        .map_err(|e| format!("could not load image at {:?}: {e}", cli.input))?
        .to_luma8();
    log::info!("image size: {}x{}", luma_view.width(), luma_view.height());

    let start = std::time::Instant::now();
    let keypoints: Vec<FastPoint> = fast_corner::detector(&luma_view, &config)?;
    log::info!(
        "took: {:?}, found {} keypoints",
        start.elapsed(),
        keypoints.len()
    );

    let mut rgb_owned = if cli.raw {
        let raw = fast::detect(&luma_view, config.threshold, config.count)?;
        log::info!("{} keypoints before suppression", raw.len());
        util::draw_corners(&luma_view, &raw, util::GREEN)
    } else {
        util::draw_corners(&luma_view, &[], util::RED)
    };
    util::draw_points(&mut rgb_owned, &keypoints, util::RED);
    rgb_owned.save(&cli.output)?;
    log::info!("annotated image written to {}", cli.output.display());

    if let Some(json_path) = &cli.json {
        let scores =
            score::score_all(&luma_view, &keypoints, ArcLength::N9, config.threshold)?;
        let records: Vec<CornerRecord> = keypoints
            .iter()
            .zip(scores)
            .map(|(p, score)| CornerRecord {
                x: p.x,
                y: p.y,
                score,
            })
            .collect();
        std::fs::write(json_path, serde_json::to_string_pretty(&records)?)?;
        log::info!("corners written to {}", json_path.display());
    }

    Ok(())
}
