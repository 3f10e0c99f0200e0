use gaussian_features::config::{load_config, Operation, ToolConfig};
use gaussian_features::image::io::{load_grayscale_image, save_normalized_png, write_json_file};
use gaussian_features::image::{FloatImage, Image};
use gaussian_features::{
    Differentiator, Edges, Hessian, Laplacian, Smoother, Statistics, StatisticsReport, Structure,
};
use log::info;
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let mut gray = load_grayscale_image(&config.input)?;
    if let Some(aspects) = config.aspects {
        gray.set_aspects(aspects);
    }
    let dims = gray.dimensions();
    info!("Loaded {} ({dims})", config.input.display());

    let start = Instant::now();
    let (images, statistics) = apply(&config, &gray)?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let mut outputs = Vec::with_capacity(images.len());
    for (suffix, img) in &images {
        let path = output_path(&config, suffix, "png");
        save_normalized_png(img, &path)?;
        println!("Saved {} to {}", img.name(), path.display());
        outputs.push(OutputSummary {
            name: img.name().to_string(),
            path: path.clone(),
            minimum: img.extrema().map_or(0.0, |(lo, _)| lo),
            maximum: img.extrema().map_or(0.0, |(_, hi)| hi),
        });
    }

    let summary = RunSummary {
        input: config.input.clone(),
        width: dims.x,
        height: dims.y,
        operation: config.operation.kind(),
        elapsed_ms,
        outputs,
        statistics,
    };
    let json_path = output_path(&config, "summary", "json");
    write_json_file(&json_path, &summary)?;
    println!("Saved summary to {}", json_path.display());
    Ok(())
}

type Outputs = (Vec<(String, FloatImage)>, Option<StatisticsReport>);

fn apply(config: &ToolConfig, gray: &Image<u8>) -> Result<Outputs, String> {
    let settings = config.settings;
    let kind = config.operation.kind();
    let single = |img: FloatImage| -> Result<Outputs, String> {
        Ok((vec![(kind.to_string(), img)], None))
    };
    let ranked = |imgs: Vec<FloatImage>| -> Result<Outputs, String> {
        let ranks: &[&str] = if imgs.len() == 2 {
            &["largest", "smallest"]
        } else {
            &["largest", "middle", "smallest"]
        };
        let named = ranks
            .iter()
            .zip(imgs)
            .map(|(rank, img)| (format!("{kind}_{rank}"), img))
            .collect();
        Ok((named, None))
    };

    match config.operation {
        Operation::Smooth { scale } => Smoother::with_settings(settings)
            .gauss(gray, scale)
            .map_err(|e| e.to_string())
            .and_then(|w| single(w.into_image())),
        Operation::Derivative {
            scale,
            xorder,
            yorder,
            zorder,
        } => Differentiator::with_settings(settings)
            .run(gray, scale, xorder, yorder, zorder)
            .map_err(|e| e.to_string())
            .and_then(|w| single(w.into_image())),
        Operation::Edges { scale, nonmaxsup } => Edges::with_settings(settings)
            .run(gray, scale, nonmaxsup)
            .map_err(|e| e.to_string())
            .and_then(|w| single(w.into_image())),
        Operation::Laplacian { scale } => Laplacian::with_settings(settings)
            .run(gray, scale)
            .map_err(|e| e.to_string())
            .and_then(|w| single(w.into_image())),
        Operation::Hessian { scale, absolute } => Hessian::with_settings(settings)
            .run(gray, scale, absolute)
            .map_err(|e| e.to_string())
            .and_then(ranked),
        Operation::Structure { sscale, iscale } => Structure::with_settings(settings)
            .run(gray, sscale, iscale)
            .map_err(|e| e.to_string())
            .and_then(ranked),
        Operation::Statistics => {
            let mut stats = Statistics::with_settings(settings);
            let report = *stats.run(gray).map_err(|e| e.to_string())?;
            Ok((Vec::new(), Some(report)))
        }
    }
}

fn output_path(config: &ToolConfig, suffix: &str, extension: &str) -> PathBuf {
    config
        .output
        .directory
        .join(format!("{}_{suffix}.{extension}", config.output.prefix))
}

fn usage() -> String {
    "Usage: features <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputSummary {
    name: String,
    path: PathBuf,
    minimum: f32,
    maximum: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary {
    input: PathBuf,
    width: usize,
    height: usize,
    operation: &'static str,
    elapsed_ms: f64,
    outputs: Vec<OutputSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<StatisticsReport>,
}
