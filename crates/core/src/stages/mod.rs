use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::CortexError;

/// One of the nine ordered stages of corticogenesis.
///
/// Ordering follows the declaration order, which is also the stage index, so
/// `a < b` holds exactly when `a.index() < b.index()`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    #[default]
    Neuroepithelium,
    PreplateFormed,
    PlateSplitting,
    LayerVIFormation,
    LayerVFormation,
    LayerIVFormation,
    LayerIIIFormation,
    LayerIIFormation,
    FinalStructure,
}

/// Number of stages in the catalog.
pub const STAGE_COUNT: usize = 9;

/// Index of the last stage.
pub const LAST_STAGE_INDEX: usize = STAGE_COUNT - 1;

impl Stage {
    pub const ALL: [Stage; STAGE_COUNT] = [
        Stage::Neuroepithelium,
        Stage::PreplateFormed,
        Stage::PlateSplitting,
        Stage::LayerVIFormation,
        Stage::LayerVFormation,
        Stage::LayerIVFormation,
        Stage::LayerIIIFormation,
        Stage::LayerIIFormation,
        Stage::FinalStructure,
    ];

    pub const FIRST: Stage = Stage::Neuroepithelium;
    pub const LAST: Stage = Stage::FinalStructure;

    /// Looks up a stage by index. Anything outside `[0, 8]` resolves to the
    /// initial stage instead of failing.
    pub fn from_index(index: usize) -> Stage {
        Self::ALL.get(index).copied().unwrap_or(Stage::FIRST)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_before(self, other: Stage) -> bool {
        self < other
    }

    pub fn next(self) -> Option<Stage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Stage> {
        self.index().checked_sub(1).map(Stage::from_index)
    }

    pub fn record(self) -> &'static StageRecord {
        &STAGES[self.index()]
    }

    pub fn title(self) -> &'static str {
        self.record().title
    }

    pub fn description(self) -> &'static str {
        self.record().description
    }

    /// Short camelCase identifier, e.g. `layerVIFormation`.
    pub fn id(self) -> &'static str {
        self.record().id
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Parses either a stage identifier (`plateSplitting`) or a 1-based stage
/// number as shown in the titles (`3`).
impl FromStr for Stage {
    type Err = CortexError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Ok(number) = trimmed.parse::<usize>() {
            return match number {
                1..=STAGE_COUNT => Ok(Stage::ALL[number - 1]),
                _ => Err(CortexError::UnknownStage(value.to_string())),
            };
        }

        Stage::ALL
            .into_iter()
            .find(|stage| stage.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CortexError::UnknownStage(value.to_string()))
    }
}

/// Display text for a stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

static STAGES: [StageRecord; STAGE_COUNT] = [
    StageRecord {
        stage: Stage::Neuroepithelium,
        id: "neuroepithelium",
        title: "Stage 1: Neuroepithelium",
        description: "The wall of the early telencephalon is a single sheet of \
            neuroepithelial progenitor cells lying beneath the pia mater. These cells \
            divide symmetrically to expand the progenitor pool before any neurons are \
            born, so no cortical layers exist yet.",
    },
    StageRecord {
        stage: Stage::PreplateFormed,
        id: "preplateFormed",
        title: "Stage 2: Preplate Formation",
        description: "The first postmitotic neurons leave the ventricular zone and \
            settle just under the pia mater, forming the preplate. It contains \
            Cajal-Retzius cells and the pioneer neurons that will later become the \
            subplate.",
    },
    StageRecord {
        stage: Stage::PlateSplitting,
        id: "plateSplitting",
        title: "Stage 3: Preplate Splitting",
        description: "A new wave of migrating neurons invades the preplate and \
            splits it in two. The superficial part becomes the marginal zone, the \
            deep part becomes the subplate, and the cortical plate begins to form \
            between them.",
    },
    StageRecord {
        stage: Stage::LayerVIFormation,
        id: "layerVIFormation",
        title: "Stage 4: Inside-Out Layering (Layer VI)",
        description: "The earliest-born cortical plate neurons settle in the \
            deepest position, just above the subplate, and form Layer VI. Every \
            later cohort will migrate past them, establishing the inside-out \
            pattern of cortical development.",
    },
    StageRecord {
        stage: Stage::LayerVFormation,
        id: "layerVFormation",
        title: "Stage 5: Inside-Out Layering (Layer V)",
        description: "Newly born neurons climb along radial glial fibres, bypass \
            Layer VI, and stop beneath the marginal zone to form Layer V. Reelin \
            released by Cajal-Retzius cells signals them to detach and settle.",
    },
    StageRecord {
        stage: Stage::LayerIVFormation,
        id: "layerIVFormation",
        title: "Stage 6: Inside-Out Layering (Layer IV)",
        description: "The next cohort migrates past Layers VI and V to form \
            Layer IV, the granular layer that will receive most of the input \
            arriving from the thalamus once the subplate hands over its guidance \
            role.",
    },
    StageRecord {
        stage: Stage::LayerIIIFormation,
        id: "layerIIIFormation",
        title: "Stage 7: Inside-Out Layering (Layer III)",
        description: "Later-born neurons travel even further, passing all the \
            deeper layers to form Layer III. Its pyramidal cells will send \
            connections to other cortical areas, including the opposite hemisphere.",
    },
    StageRecord {
        stage: Stage::LayerIIFormation,
        id: "layerIIFormation",
        title: "Stage 8: Inside-Out Layering (Layer II)",
        description: "The last-born neurons complete the longest migration and \
            form Layer II, directly beneath the marginal zone. With this final \
            cohort in place, neurogenesis in the cortex draws to a close.",
    },
    StageRecord {
        stage: Stage::FinalStructure,
        id: "finalStructure",
        title: "Stage 9: The Mature Six-Layered Cortex",
        description: "The marginal zone matures into Layer I and the transient \
            subplate begins to thin out beneath the six-layered neocortex. The \
            deepest layers are the oldest and the most superficial are the \
            youngest, the signature of inside-out development.",
    },
];

/// The fixed stage catalog in order.
pub fn stages() -> &'static [StageRecord] {
    &STAGES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_contiguous_and_ordered() {
        assert_eq!(stages().len(), STAGE_COUNT);
        for (index, record) in stages().iter().enumerate() {
            assert_eq!(record.stage.index(), index);
            assert!(record.title.starts_with(&format!("Stage {}:", index + 1)));
        }
    }

    #[test]
    fn ordering_is_strict_by_index() {
        assert!(Stage::PreplateFormed.is_before(Stage::PlateSplitting));
        assert!(!Stage::PlateSplitting.is_before(Stage::PreplateFormed));
        assert!(!Stage::LayerVFormation.is_before(Stage::LayerVFormation));
        for pair in Stage::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn out_of_range_index_falls_back_to_first_stage() {
        assert_eq!(Stage::from_index(3), Stage::LayerVIFormation);
        assert_eq!(Stage::from_index(9), Stage::FIRST);
        assert_eq!(Stage::from_index(usize::MAX), Stage::FIRST);
    }

    #[test]
    fn neighbours_stop_at_the_ends() {
        assert_eq!(Stage::FIRST.previous(), None);
        assert_eq!(Stage::LAST.next(), None);
        assert_eq!(Stage::PlateSplitting.next(), Some(Stage::LayerVIFormation));
        assert_eq!(Stage::PlateSplitting.previous(), Some(Stage::PreplateFormed));
    }

    #[test]
    fn parses_ids_and_numbers() {
        assert_eq!("4".parse::<Stage>().unwrap(), Stage::LayerVIFormation);
        assert_eq!(
            "layerIIIFormation".parse::<Stage>().unwrap(),
            Stage::LayerIIIFormation
        );
        assert_eq!("FINALSTRUCTURE".parse::<Stage>().unwrap(), Stage::LAST);

        let err = "0".parse::<Stage>().unwrap_err();
        assert!(format!("{err}").contains('0'));
        assert!("gastrulation".parse::<Stage>().is_err());
    }

    #[test]
    fn serde_uses_stage_ids() {
        for stage in Stage::ALL {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.id()));
        }
    }
}
