use crate::{
    alignment::{grid::GridConfig, groups::GroupConfig},
    flatten::tree::FlattenConfig,
    metrics::component::ComponentConfig,
    foundation::error::{LayoutError, LayoutResult},
    matching::assignment::MatchThreshold,
    structure::signature::SignatureMode,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Options for element matching.
pub struct MatchConfig {
    /// Minimum overlap for an assigned pair to count as matched.
    pub threshold: MatchThreshold,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Every tunable of a full evaluation. Missing JSON fields take their defaults.
pub struct EvalConfig {
    /// Tree flattening.
    pub flatten: FlattenConfig,
    /// Element matching.
    pub matching: MatchConfig,
    /// Text-aware component matching.
    pub components: ComponentConfig,
    /// Alignment-group detection.
    pub groups: GroupConfig,
    /// Grid and sibling alignment.
    pub grid: GridConfig,
    /// Signature mode of the primary hierarchy comparison.
    pub signature_mode: SignatureMode,
}

impl EvalConfig {
    /// Parse a JSON config.
    pub fn from_json_str(s: &str) -> LayoutResult<Self> {
        serde_json::from_str(s).map_err(|e| LayoutError::serde(format!("eval config: {e}")))
    }

    /// Parse a JSON config from a reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> LayoutResult<Self> {
        serde_json::from_reader(reader).map_err(|e| LayoutError::serde(format!("eval config: {e}")))
    }

    /// Reject values no evaluation can run with.
    pub fn validate(&self) -> LayoutResult<()> {
        let f = &self.flatten;
        if !(0.0..=1.0).contains(&f.min_opacity) {
            return Err(LayoutError::config("flatten.min_opacity must be in [0, 1]"));
        }

        if let MatchThreshold::AtLeast(t) = self.matching.threshold
            && !(0.0..=1.0).contains(&t)
        {
            return Err(LayoutError::config("matching.threshold must be in [0, 1]"));
        }

        let c = &self.components;
        for (name, w) in [
            ("components.text_weight", c.text_weight),
            ("components.position_weight", c.position_weight),
            ("components.min_block_iou", c.min_block_iou),
        ] {
            if !(0.0..=1.0).contains(&w) {
                return Err(LayoutError::config(format!("{name} must be in [0, 1]")));
            }
        }

        let g = &self.groups;
        if !(g.tolerance.is_finite() && g.tolerance > 0.0) {
            return Err(LayoutError::config("groups.tolerance must be > 0"));
        }
        if g.min_group_size == 0 {
            return Err(LayoutError::config("groups.min_group_size must be >= 1"));
        }

        let grid = &self.grid;
        if grid.col_clusters == 0 || grid.row_clusters == 0 {
            return Err(LayoutError::config(
                "grid.col_clusters and grid.row_clusters must be >= 1",
            ));
        }
        if grid.max_elements < grid.min_elements {
            return Err(LayoutError::config(
                "grid.max_elements must be >= grid.min_elements",
            ));
        }
        if !(grid.norm_epsilon.is_finite() && grid.norm_epsilon >= 0.0) {
            return Err(LayoutError::config("grid.norm_epsilon must be >= 0"));
        }
        if !(grid.error_ceiling.is_finite() && grid.error_ceiling > 0.0) {
            return Err(LayoutError::config("grid.error_ceiling must be > 0"));
        }

        let k = &grid.kmeans;
        if k.n_init == 0 || k.max_iter == 0 {
            return Err(LayoutError::config(
                "grid.kmeans.n_init and grid.kmeans.max_iter must be >= 1",
            ));
        }
        if !(k.tol.is_finite() && k.tol >= 0.0) {
            return Err(LayoutError::config("grid.kmeans.tol must be >= 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
