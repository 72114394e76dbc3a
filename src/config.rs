//! JSON runtime configuration for the `retina_analysis` binary.
//!
//! ```json
//! {
//!   "input": "fundus.jpg",
//!   "templates_dir": "templates/",
//!   "output": { "annotated_image": "out/roi.png", "json_report": "out/report.json" },
//!   "params": { "working_width": 700, "drusen": { "opening_ksize": 2 } }
//! }
//! ```
use crate::error::{AnalysisError, Result};
use crate::pipeline::AnalyzerParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    pub annotated_image: Option<PathBuf>,
    pub json_report: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input: PathBuf,
    /// Directory of reference optic-disc crops.
    pub templates_dir: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub params: AnalyzerParams,
}

impl RuntimeConfig {
    /// Resolve relative paths against `base` (usually the config's folder).
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.input);
        join(&mut self.templates_dir);
        if let Some(p) = self.output.annotated_image.as_mut() {
            join(p);
        }
        if let Some(p) = self.output.json_report.as_mut() {
            join(p);
        }
        self
    }
}

pub fn parse_config(json: &str) -> Result<RuntimeConfig> {
    serde_json::from_str(json)
        .map_err(|e| AnalysisError::InputError(format!("failed to parse config: {e}")))
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        AnalysisError::InputError(format!("failed to read config {}: {e}", path.display()))
    })?;
    let config = parse_config(&contents).map_err(|e| {
        AnalysisError::InputError(format!("{} ({})", e, path.display()))
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.resolve_relative_to(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config(r#"{"input": "a.png", "templates_dir": "t"}"#).unwrap();
        assert_eq!(cfg.input, PathBuf::from("a.png"));
        assert!(cfg.output.annotated_image.is_none());
        assert_eq!(cfg.params, AnalyzerParams::default());
    }

    #[test]
    fn nested_params_override_single_fields() {
        let cfg = parse_config(
            r#"{
                "input": "a.png",
                "templates_dir": "t",
                "output": {"json_report": "r.json"},
                "params": {"drusen": {"opening_ksize": 3}, "disc": {"window_size": 64}}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.params.drusen.opening_ksize, 3);
        assert_eq!(cfg.params.drusen.illumination_median_ksize, 71);
        assert_eq!(cfg.params.disc.window_size, 64);
        assert_eq!(cfg.output.json_report, Some(PathBuf::from("r.json")));
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let cfg = parse_config(r#"{"input": "a.png", "templates_dir": "/abs/t"}"#)
            .unwrap()
            .resolve_relative_to(Path::new("/data/run"));
        assert_eq!(cfg.input, PathBuf::from("/data/run/a.png"));
        assert_eq!(cfg.templates_dir, PathBuf::from("/abs/t"));
    }

    #[test]
    fn missing_input_is_an_error() {
        assert!(matches!(
            parse_config(r#"{"templates_dir": "t"}"#),
            Err(AnalysisError::InputError(_))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/config.json")).is_err());
    }
}
