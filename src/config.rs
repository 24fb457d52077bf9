//! JSON runtime configuration for the demo binaries.
use crate::OmrParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputConfig {
    pub json_out: Option<PathBuf>,
    pub overlay_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub params: OmrParams,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(contents: &str) -> Result<RuntimeConfig, serde_json::Error> {
    serde_json::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Clef;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config(r#"{"inputPath":"page.png"}"#).unwrap();
        assert_eq!(cfg.input_path, PathBuf::from("page.png"));
        assert!(cfg.output.json_out.is_none());
        assert!(cfg.output.overlay_out.is_none());
        assert_eq!(cfg.params.clef, Clef::Treble);
    }

    #[test]
    fn full_config_round_trips_fields() {
        let cfg = parse_config(
            r#"{
                "inputPath": "scores/a.png",
                "output": {"jsonOut": "out/a.json", "overlayOut": "out/a_overlay.png"},
                "params": {"clef": "bass", "threshold": 0.5, "notes": {"maxStaves": null}}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.output.json_out, Some(PathBuf::from("out/a.json")));
        assert_eq!(cfg.output.overlay_out, Some(PathBuf::from("out/a_overlay.png")));
        assert_eq!(cfg.params.clef, Clef::Bass);
        assert_eq!(cfg.params.threshold, Some(0.5));
        assert_eq!(cfg.params.notes.max_staves, None);
    }

    #[test]
    fn missing_input_path_is_rejected() {
        assert!(parse_config(r#"{"params":{}}"#).is_err());
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/omr_config.json")).unwrap_err();
        assert!(err.contains("/nonexistent/omr_config.json"));
    }
}
