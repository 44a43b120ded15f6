//! Engine tunables.
//!
//! Loaded from an optional JSON file; every field falls back to its default
//! so a file only needs to name what it overrides.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::mindmap::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_total_nodes: usize,
    pub layout: LayoutConfig,
    pub camera: CameraConfig,
    pub history: HistoryConfig,
    pub categories: BTreeMap<Category, CategoryStyle>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_total_nodes: 150,
            layout: LayoutConfig::default(),
            camera: CameraConfig::default(),
            history: HistoryConfig::default(),
            categories: default_categories(),
        }
    }
}

/// Spoke spacing and the label width estimate used before any text is
/// measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub base_radius: f32,
    pub boundary_gap: f32,
    pub char_width: f32,
    pub label_padding: f32,
    pub min_label_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_radius: 250.0,
            boundary_gap: 80.0,
            char_width: 12.0,
            label_padding: 32.0,
            min_label_width: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Multiplier applied per wheel notch; its inverse zooms out.
    pub wheel_zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.2,
            max_zoom: 3.0,
            wheel_zoom_step: 1.1,
        }
    }
}

impl CameraConfig {
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub depth: usize,
    /// Collapse undo history to the saved state after every save.
    pub clear_on_save: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            depth: 100,
            clear_on_save: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub label: String,
    pub color: [u8; 3],
}

fn default_categories() -> BTreeMap<Category, CategoryStyle> {
    Category::ALL
        .into_iter()
        .map(|category| (category, default_style(category)))
        .collect()
}

fn default_style(category: Category) -> CategoryStyle {
    let (label, color) = match category {
        Category::Derivatives => ("Derivatives", [97, 175, 239]),
        Category::Synonyms => ("Synonyms", [120, 200, 120]),
        Category::Antonyms => ("Antonyms", [232, 108, 108]),
        Category::Collocations => ("Collocations", [236, 178, 84]),
        Category::Idioms => ("Idioms", [198, 120, 221]),
        Category::Root => ("Root", [150, 130, 100]),
        Category::Prefix => ("Prefix", [86, 182, 194]),
        Category::Suffix => ("Suffix", [229, 140, 180]),
        Category::TopicRelated => ("Topic", [170, 170, 90]),
    };

    CategoryStyle {
        label: label.to_owned(),
        color,
    }
}

impl EngineConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default().validated());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config JSON in {}", path.display()))?;
        info!(path = %path.display(), "loaded engine config");

        Ok(config.validated())
    }

    /// Repairs values the engine cannot work with instead of failing later.
    pub fn validated(mut self) -> Self {
        let camera = &mut self.camera;
        let defaults = CameraConfig::default();
        if !(camera.min_zoom > 0.0) {
            warn!(min_zoom = camera.min_zoom, "min_zoom must be positive, using default");
            camera.min_zoom = defaults.min_zoom;
        }
        if !(camera.max_zoom > 0.0) {
            warn!(max_zoom = camera.max_zoom, "max_zoom must be positive, using default");
            camera.max_zoom = defaults.max_zoom;
        }
        // Both bounds are positive from here on.
        if camera.max_zoom < camera.min_zoom {
            warn!(
                min_zoom = camera.min_zoom,
                max_zoom = camera.max_zoom,
                "zoom bounds inverted, swapping"
            );
            std::mem::swap(&mut camera.min_zoom, &mut camera.max_zoom);
        }
        if !(camera.wheel_zoom_step > 1.0) {
            camera.wheel_zoom_step = defaults.wheel_zoom_step;
        }

        let layout = &mut self.layout;
        layout.base_radius = layout.base_radius.max(0.0);
        layout.boundary_gap = layout.boundary_gap.max(0.0);
        layout.char_width = layout.char_width.max(0.0);
        layout.label_padding = layout.label_padding.max(0.0);
        layout.min_label_width = layout.min_label_width.max(1.0);

        self.max_total_nodes = self.max_total_nodes.max(1);
        self.history.depth = self.history.depth.max(1);

        for category in Category::ALL {
            self.categories
                .entry(category)
                .or_insert_with(|| default_style(category));
        }

        self
    }

    pub fn category_style(&self, category: Category) -> CategoryStyle {
        self.categories
            .get(&category)
            .cloned()
            .unwrap_or_else(|| default_style(category))
    }
}
