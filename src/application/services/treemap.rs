//! Treemap shaping service
//!
//! Turns a validated dataset into what a treemap renderer consumes: one tile
//! per leaf with id, value, intensity and fill color, plus a legend.

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    split_label, AnnotatedTree, CategoryIntensityMapper, ColorSource, OrdinalPalette,
    OutputRange, Rgb, Rgba, TreeAnnotator, TreeNode, ValueFormat,
};

/// Render-ready data for one leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub id: String,
    pub name: String,
    /// Category used for the intensity range
    pub category: String,
    /// Key that selected the base color (category or parent name)
    pub color_key: String,
    pub value: f64,
    pub display_value: String,
    /// None when intensity is disabled
    pub intensity: Option<f64>,
    pub fill: Rgba,
    /// Label lines for the tile text
    pub label: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub key: String,
    pub color: Rgb,
}

/// Output of one shaping pass.
#[derive(Debug)]
pub struct TreemapModel {
    pub tree: AnnotatedTree,
    pub mapper: Option<CategoryIntensityMapper>,
    pub tiles: Vec<Tile>,
    pub legend: Vec<LegendEntry>,
}

/// Service composing annotation, intensity mapping and palette lookup.
#[derive(Debug, Clone)]
pub struct TreemapService {
    annotator: TreeAnnotator,
    palette: Vec<Rgb>,
    output: Option<OutputRange>,
    color_source: ColorSource,
    value_format: ValueFormat,
}

impl TreemapService {
    /// Create a service from validated settings.
    pub fn new(settings: &Settings) -> ApplicationResult<Self> {
        let output = if settings.intensity.enabled {
            Some(settings.output_range()?)
        } else {
            None
        };
        Ok(Self {
            annotator: TreeAnnotator::new().with_sort_siblings(settings.sort_siblings),
            palette: settings.palette_colors()?,
            output,
            color_source: settings.color_source,
            value_format: settings.value_format,
        })
    }

    /// Annotate only.
    pub fn annotate(&self, root: &TreeNode) -> ApplicationResult<AnnotatedTree> {
        Ok(self.annotator.annotate(root)?)
    }

    /// Run the full pass: annotate, build category ranges, shade every leaf.
    ///
    /// An unknown category aborts the whole pass; no partial model is returned.
    #[instrument(level = "debug", skip(self, root), fields(root = root.name()))]
    pub fn shape(&self, root: &TreeNode) -> ApplicationResult<TreemapModel> {
        let tree = self.annotate(root)?;
        let mapper = self
            .output
            .map(|output| CategoryIntensityMapper::from_tree(&tree, output));

        let mut palette = OrdinalPalette::new(self.palette.clone())
            .ok_or_else(|| ApplicationError::InvalidColor("empty palette".to_string()))?;

        let mut tiles = Vec::new();
        for (idx, leaf) in tree.leaves() {
            let parent = tree.parent_name(idx).unwrap_or(&leaf.data.name);
            let category = tree.category_of(idx).unwrap_or(parent).to_string();
            let color_key = match self.color_source {
                ColorSource::Category => category.clone(),
                ColorSource::Parent => parent.to_string(),
            };
            let value = leaf.data.aggregate_value;

            let intensity = match &mapper {
                Some(mapper) => Some(mapper.intensity_of(&category, value)?),
                None => None,
            };
            let fill = palette
                .color(&color_key)
                .with_alpha(intensity.unwrap_or(1.0));

            tiles.push(Tile {
                id: leaf.data.id.clone(),
                name: leaf.data.name.clone(),
                category,
                color_key,
                value,
                display_value: self.value_format.format(value),
                intensity,
                fill,
                label: split_label(&leaf.data.name),
            });
        }

        let legend = tiles
            .iter()
            .map(|tile| tile.color_key.as_str())
            .unique()
            .map(|key| LegendEntry {
                key: key.to_string(),
                color: palette.color(key),
            })
            .collect::<Vec<_>>();

        debug!(tiles = tiles.len(), legend = legend.len(), "shaped treemap");
        Ok(TreemapModel {
            tree,
            mapper,
            tiles,
            legend,
        })
    }
}

