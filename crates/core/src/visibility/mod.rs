use crate::{LayerKind, Stage};

/// Returns whether `layer` has appeared by `stage`.
///
/// The preplate is the only layer that disappears again: once the plate
/// splits it is absorbed into the marginal zone, subplate and cortical plate,
/// so it is matched by equality rather than by threshold.
pub fn is_visible(stage: Stage, layer: LayerKind) -> bool {
    match layer {
        LayerKind::PiaMater => true,
        LayerKind::Preplate => stage == Stage::PreplateFormed,
        LayerKind::MarginalZone | LayerKind::CorticalPlate | LayerKind::Subplate => {
            stage >= Stage::PlateSplitting
        }
        LayerKind::LayerVI => stage >= Stage::LayerVIFormation,
        LayerKind::LayerV => stage >= Stage::LayerVFormation,
        LayerKind::LayerIV => stage >= Stage::LayerIVFormation,
        LayerKind::LayerIII => stage >= Stage::LayerIIIFormation,
        LayerKind::LayerII => stage >= Stage::LayerIIFormation,
    }
}

/// Layers visible at `stage`, in catalog order.
pub fn visible_layers(stage: Stage) -> Vec<LayerKind> {
    LayerKind::ALL
        .into_iter()
        .filter(|layer| is_visible(stage, *layer))
        .collect()
}
