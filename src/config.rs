//! Tunable constants of the engine and the JSON configuration of the
//! `features` command-line tool.
use crate::image::Aspects;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Kernel truncation radius in units of the effective scale, per order class.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct KernelRadius {
    /// Order 0.
    pub smoothing: f64,
    /// Orders 1 and 2.
    pub low_order: f64,
    /// Orders 3 and above.
    pub high_order: f64,
}

impl Default for KernelRadius {
    fn default() -> Self {
        Self {
            smoothing: 3.0,
            low_order: 4.0,
            high_order: 5.0,
        }
    }
}

impl KernelRadius {
    pub fn for_order(&self, order: usize) -> f64 {
        match order {
            0 => self.smoothing,
            1 | 2 => self.low_order,
            _ => self.high_order,
        }
    }
}

/// Engine-wide settings shared by all operators.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Interpolation offset along the gradient direction during
    /// non-maximum suppression, in samples.
    pub nms_step: f64,
    /// Histogram resolution used for the median and mode estimates.
    pub histogram_bins: usize,
    pub kernel_radius: KernelRadius,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nms_step: 0.7,
            histogram_bins: 100_000,
            kernel_radius: KernelRadius::default(),
        }
    }
}

/// Operation run by the `features` tool.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Operation {
    Smooth {
        scale: f64,
    },
    Derivative {
        scale: f64,
        #[serde(default)]
        xorder: usize,
        #[serde(default)]
        yorder: usize,
        #[serde(default)]
        zorder: usize,
    },
    Edges {
        scale: f64,
        #[serde(default)]
        nonmaxsup: bool,
    },
    Hessian {
        scale: f64,
        #[serde(default)]
        absolute: bool,
    },
    Laplacian {
        scale: f64,
    },
    Structure {
        sscale: f64,
        iscale: f64,
    },
    Statistics,
}

impl Operation {
    /// Tag used in the JSON form and in output file names.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Smooth { .. } => "smooth",
            Operation::Derivative { .. } => "derivative",
            Operation::Edges { .. } => "edges",
            Operation::Hessian { .. } => "hessian",
            Operation::Laplacian { .. } => "laplacian",
            Operation::Structure { .. } => "structure",
            Operation::Statistics => "statistics",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    "features".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub struct ToolConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub aspects: Option<Aspects>,
    #[serde(default)]
    pub settings: Settings,
    pub operation: Operation,
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<ToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(json: &str) -> Result<ToolConfig, serde_json::Error> {
    serde_json::from_str(json)
}
