//! YAML configuration: starting parameters, sample count and extra presets.

use crate::error::{AppError, AppResult};
use fin_solver::{DEFAULT_SAMPLE_COUNT, FinParameters, ParameterUpdate, Preset, builtin_presets};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinConfig {
    /// Overrides applied on top of the default parameters.
    #[serde(default)]
    pub parameters: ParameterUpdate,
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    /// Extra presets; an id matching a built-in replaces it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<Preset>,
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

impl Default for FinConfig {
    fn default() -> Self {
        Self {
            parameters: ParameterUpdate::default(),
            sample_count: DEFAULT_SAMPLE_COUNT,
            presets: Vec::new(),
        }
    }
}

impl FinConfig {
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn initial_parameters(&self) -> FinParameters {
        let mut params = FinParameters::default();
        self.parameters.apply_to(&mut params);
        params
    }

    /// Built-in presets followed by config-only ones, overrides applied.
    pub fn presets(&self) -> Vec<Preset> {
        let mut all = builtin_presets();
        for preset in &self.presets {
            match all.iter_mut().find(|p| p.id == preset.id) {
                Some(slot) => *slot = preset.clone(),
                None => all.push(preset.clone()),
            }
        }
        all
    }

    pub fn find_preset(&self, id: &str) -> AppResult<Preset> {
        self.presets()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::UnknownPreset(id.to_string()))
    }
}

pub fn load_yaml(path: &Path) -> AppResult<FinConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config = FinConfig::from_yaml_str(&content)?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &FinConfig) -> AppResult<()> {
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content).map_err(|source| AppError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = FinConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg, FinConfig::default());
        assert_eq!(cfg.initial_parameters(), FinParameters::default());
    }

    #[test]
    fn partial_parameters_use_short_names() {
        let cfg = FinConfig::from_yaml_str(
            "parameters:\n  k: 200.0\n  L: 0.05\n  Tinf: 300.0\nsample_count: 50\n",
        )
        .unwrap();
        let p = cfg.initial_parameters();
        assert_eq!(p.k, 200.0);
        assert_eq!(p.length, 0.05);
        assert_eq!(p.t_inf, 300.0);
        assert_eq!(p.h, 120.0);
        assert_eq!(cfg.sample_count, 50);
    }

    #[test]
    fn config_presets_extend_and_override() {
        let cfg = FinConfig::from_yaml_str(
            r#"
presets:
  - id: copper
    name: Copper fin
    update:
      k: 400.0
  - id: thick-long
    update:
      t: 0.008
"#,
        )
        .unwrap();
        let presets = cfg.presets();
        assert_eq!(presets.len(), builtin_presets().len() + 1);
        assert_eq!(cfg.find_preset("copper").unwrap().update.k, Some(400.0));
        let thick = cfg.find_preset("thick-long").unwrap();
        assert_eq!(thick.update.thickness, Some(0.008));
        assert_eq!(thick.update.length, None);
    }

    #[test]
    fn unknown_preset_is_reported() {
        let err = FinConfig::default().find_preset("nope").unwrap_err();
        assert!(matches!(err, AppError::UnknownPreset(id) if id == "nope"));
    }

    #[test]
    fn rejects_unparsable_yaml() {
        assert!(matches!(
            FinConfig::from_yaml_str("sample_count: [1, 2"),
            Err(AppError::Yaml(_))
        ));
    }
}
