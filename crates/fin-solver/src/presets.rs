//! Named parameter presets. Each one touches only the fields it names.

use crate::params::{FinParameters, ParameterUpdate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub update: ParameterUpdate,
}

impl Preset {
    pub fn new(id: &str, name: &str, update: ParameterUpdate) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            update,
        }
    }
}

pub fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new(
            "baseline",
            "Baseline (k=15, h=120, t=3mm, b=10mm, L=30mm, Tb=900K, Tinf=600K)",
            ParameterUpdate::full(&FinParameters::default()),
        ),
        Preset::new(
            "high-convection",
            "High convection (h=300) + thinner fin (t=2mm)",
            ParameterUpdate {
                h: Some(300.0),
                thickness: Some(0.002),
                ..ParameterUpdate::default()
            },
        ),
        Preset::new(
            "thick-long",
            "Thick fin (t=5mm) + long (L=50mm)",
            ParameterUpdate {
                thickness: Some(0.005),
                length: Some(0.050),
                ..ParameterUpdate::default()
            },
        ),
        Preset::new(
            "cool-ambient",
            "Cool ambient (Tinf=500K) + hot base (Tb=1000K)",
            ParameterUpdate {
                t_base: Some(1000.0),
                t_inf: Some(500.0),
                ..ParameterUpdate::default()
            },
        ),
    ]
}

pub fn find_builtin(id: &str) -> Option<Preset> {
    builtin_presets().into_iter().find(|p| p.id == id)
}
