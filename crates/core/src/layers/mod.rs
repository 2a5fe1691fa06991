use std::fmt;

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color. `a` lives in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Composites this color over an opaque `background` and returns the
    /// resulting opaque color. Terminals have no alpha channel, so bands are
    /// flattened before drawing.
    pub fn over(self, background: Rgba) -> Rgba {
        let alpha = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            (f32::from(fg) * alpha + f32::from(bg) * (1.0 - alpha)).round() as u8
        };
        Rgba::new(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
            1.0,
        )
    }
}

/// Identifies one entry of the layer catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    PiaMater,
    Preplate,
    MarginalZone,
    Subplate,
    CorticalPlate,
    LayerVI,
    LayerV,
    LayerIV,
    LayerIII,
    LayerII,
}

impl LayerKind {
    /// Every layer in catalog order.
    pub const ALL: [LayerKind; 10] = [
        LayerKind::PiaMater,
        LayerKind::Preplate,
        LayerKind::MarginalZone,
        LayerKind::Subplate,
        LayerKind::CorticalPlate,
        LayerKind::LayerVI,
        LayerKind::LayerV,
        LayerKind::LayerIV,
        LayerKind::LayerIII,
        LayerKind::LayerII,
    ];

    /// Numbered cortical layers in formation order (deepest first).
    pub const CORTICAL: [LayerKind; 5] = [
        LayerKind::LayerVI,
        LayerKind::LayerV,
        LayerKind::LayerIV,
        LayerKind::LayerIII,
        LayerKind::LayerII,
    ];

    pub fn descriptor(self) -> &'static LayerDescriptor {
        &LAYERS[self as usize]
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().name)
    }
}

/// Display metadata for a single layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDescriptor {
    pub kind: LayerKind,
    pub name: &'static str,
    pub color: Rgba,
    pub description: &'static str,
}

static LAYERS: [LayerDescriptor; 10] = [
    LayerDescriptor {
        kind: LayerKind::PiaMater,
        name: "Pia Mater",
        color: Rgba::new(236, 112, 99, 0.35),
        description: "Delicate membrane covering the brain surface",
    },
    LayerDescriptor {
        kind: LayerKind::Preplate,
        name: "Preplate",
        color: Rgba::new(175, 122, 197, 0.45),
        description: "First postmitotic neurons (Cajal-Retzius and subplate cells)",
    },
    LayerDescriptor {
        kind: LayerKind::MarginalZone,
        name: "Marginal Zone",
        color: Rgba::new(93, 173, 226, 0.4),
        description: "Future Layer I, home of Cajal-Retzius cells secreting Reelin",
    },
    LayerDescriptor {
        kind: LayerKind::Subplate,
        name: "Subplate",
        color: Rgba::new(88, 214, 141, 0.4),
        description: "Transient layer guiding thalamocortical axons",
    },
    LayerDescriptor {
        kind: LayerKind::CorticalPlate,
        name: "Cortical Plate",
        color: Rgba::new(244, 208, 63, 0.3),
        description: "Neurons migrating between the marginal zone and subplate",
    },
    LayerDescriptor {
        kind: LayerKind::LayerVI,
        name: "Layer VI",
        color: Rgba::new(211, 84, 0, 0.95),
        description: "Multiform layer, corticothalamic projection neurons",
    },
    LayerDescriptor {
        kind: LayerKind::LayerV,
        name: "Layer V",
        color: Rgba::new(230, 126, 34, 0.85),
        description: "Internal pyramidal layer, subcortical projection neurons",
    },
    LayerDescriptor {
        kind: LayerKind::LayerIV,
        name: "Layer IV",
        color: Rgba::new(241, 196, 15, 0.75),
        description: "Internal granular layer, receives thalamic input",
    },
    LayerDescriptor {
        kind: LayerKind::LayerIII,
        name: "Layer III",
        color: Rgba::new(39, 174, 96, 0.65),
        description: "External pyramidal layer, corticocortical connections",
    },
    LayerDescriptor {
        kind: LayerKind::LayerII,
        name: "Layer II",
        color: Rgba::new(41, 128, 185, 0.55),
        description: "External granular layer, small pyramidal and stellate cells",
    },
];

/// The fixed layer catalog in display order.
pub fn layers() -> &'static [LayerDescriptor] {
    &LAYERS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_matches_kinds() {
        assert_eq!(layers().len(), 10);
        for (descriptor, kind) in layers().iter().zip(LayerKind::ALL) {
            assert_eq!(descriptor.kind, kind);
            assert_eq!(kind.descriptor().name, descriptor.name);
        }
    }

    #[test]
    fn cortical_layers_are_more_opaque_than_outer_structures() {
        let outer_max = [
            LayerKind::PiaMater,
            LayerKind::Preplate,
            LayerKind::MarginalZone,
            LayerKind::Subplate,
            LayerKind::CorticalPlate,
        ]
        .iter()
        .map(|kind| kind.descriptor().color.a)
        .fold(0.0_f32, f32::max);

        for kind in LayerKind::CORTICAL {
            assert!(kind.descriptor().color.a > outer_max, "{kind} too faint");
        }

        let alphas: Vec<f32> = LayerKind::CORTICAL
            .iter()
            .map(|kind| kind.descriptor().color.a)
            .collect();
        assert!(alphas.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn colors_are_distinct() {
        for (i, a) in layers().iter().enumerate() {
            for b in &layers()[i + 1..] {
                assert_ne!(
                    (a.color.r, a.color.g, a.color.b),
                    (b.color.r, b.color.g, b.color.b),
                    "{} and {} share a color",
                    a.name,
                    b.name
                );
            }
        }
    }

    #[test]
    fn compositing_respects_alpha() {
        let white = Rgba::new(255, 255, 255, 1.0);
        assert_eq!(white.over(Rgba::BLACK), white);

        let half = Rgba::new(200, 100, 0, 0.5).over(Rgba::BLACK);
        assert_eq!((half.r, half.g, half.b), (100, 50, 0));
        assert_eq!(half.a, 1.0);
    }
}
