use std::fmt::Write as _;

use serde::Serialize;

use crate::{
    visibility::is_visible, LayerKind, PlaybackState, Rgba, Stage, Transport, LAST_STAGE_INDEX,
};

/// A single colored, labelled band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerBand {
    pub layer: LayerKind,
    pub label: &'static str,
    pub description: &'static str,
    pub color: Rgba,
}

impl LayerBand {
    fn new(layer: LayerKind) -> Self {
        let descriptor = layer.descriptor();
        Self {
            layer,
            label: descriptor.name,
            description: descriptor.description,
            color: descriptor.color,
        }
    }
}

/// Node of the vertical band stack, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BandNode {
    Layer(LayerBand),
    /// The cortical plate: a backdrop grouping the numbered layers, newest on
    /// top.
    Container {
        band: LayerBand,
        children: Vec<LayerBand>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonKind {
    JumpToStart,
    StepBack,
    PlayPause,
    StepForward,
    JumpToEnd,
}

impl ButtonKind {
    pub const ALL: [ButtonKind; 5] = [
        ButtonKind::JumpToStart,
        ButtonKind::StepBack,
        ButtonKind::PlayPause,
        ButtonKind::StepForward,
        ButtonKind::JumpToEnd,
    ];

    /// Transport action triggered by pressing this button.
    pub fn action(self) -> Transport {
        match self {
            ButtonKind::JumpToStart => Transport::JumpToStart,
            ButtonKind::StepBack => Transport::StepBack,
            ButtonKind::PlayPause => Transport::TogglePlay,
            ButtonKind::StepForward => Transport::StepForward,
            ButtonKind::JumpToEnd => Transport::JumpToEnd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    pub kind: ButtonKind,
    pub label: &'static str,
    pub icon: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SliderView {
    pub value: usize,
    pub max: usize,
}

impl SliderView {
    /// Thumb position in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        self.value as f64 / self.max as f64
    }
}

/// Everything the front-end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageView {
    pub stage: Stage,
    pub title: &'static str,
    pub description: &'static str,
    pub bands: Vec<BandNode>,
    pub slider: SliderView,
    /// One button per [`ButtonKind`], in [`ButtonKind::ALL`] order.
    pub buttons: [ButtonView; 5],
    pub is_playing: bool,
}

impl StageView {
    pub fn button(&self, kind: ButtonKind) -> &ButtonView {
        &self.buttons[kind as usize]
    }

    /// All layers drawn in this view, top to bottom, containers included.
    pub fn visible_layers(&self) -> Vec<LayerKind> {
        let mut layers = Vec::new();
        for node in &self.bands {
            match node {
                BandNode::Layer(band) => layers.push(band.layer),
                BandNode::Container { band, children } => {
                    layers.push(band.layer);
                    layers.extend(children.iter().map(|child| child.layer));
                }
            }
        }
        layers
    }
}

/// Builds the view for `state`.
pub fn render(state: &PlaybackState) -> StageView {
    let stage = state.stage;
    let index = stage.index();

    let buttons = ButtonKind::ALL.map(|kind| {
        let (label, icon, enabled) = match kind {
            ButtonKind::JumpToStart => ("Start", "|<", index > 0),
            ButtonKind::StepBack => ("Back", "<", index > 0),
            ButtonKind::PlayPause if state.is_playing => ("Pause", "||", true),
            ButtonKind::PlayPause => ("Play", "▶", true),
            ButtonKind::StepForward => ("Forward", ">", index < LAST_STAGE_INDEX),
            ButtonKind::JumpToEnd => ("End", ">|", index < LAST_STAGE_INDEX),
        };
        ButtonView {
            kind,
            label,
            icon,
            enabled,
        }
    });

    StageView {
        stage,
        title: stage.title(),
        description: stage.description(),
        bands: band_stack(stage),
        slider: SliderView {
            value: index,
            max: LAST_STAGE_INDEX,
        },
        buttons,
        is_playing: state.is_playing,
    }
}

fn band_stack(stage: Stage) -> Vec<BandNode> {
    let visible = |layer| is_visible(stage, layer);
    let mut bands = vec![BandNode::Layer(LayerBand::new(LayerKind::PiaMater))];

    if visible(LayerKind::Preplate) {
        bands.push(BandNode::Layer(LayerBand::new(LayerKind::Preplate)));
    }
    if visible(LayerKind::MarginalZone) {
        bands.push(BandNode::Layer(LayerBand::new(LayerKind::MarginalZone)));
    }
    if visible(LayerKind::CorticalPlate) {
        let children = LayerKind::CORTICAL
            .into_iter()
            .rev()
            .filter(|layer| visible(*layer))
            .map(LayerBand::new)
            .collect();
        bands.push(BandNode::Container {
            band: LayerBand::new(LayerKind::CorticalPlate),
            children,
        });
    }
    if visible(LayerKind::Subplate) {
        bands.push(BandNode::Layer(LayerBand::new(LayerKind::Subplate)));
    }

    bands
}

/// Keeps the last rendered view and only hands out a new one when the state
/// actually changed the picture.
#[derive(Debug, Default)]
pub struct RenderGraph {
    last: Option<StageView>,
}

impl RenderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-renders `state`, returning the view if it differs from the previous
    /// one.
    pub fn update(&mut self, state: &PlaybackState) -> Option<&StageView> {
        let view = render(state);
        if self.last.as_ref() == Some(&view) {
            return None;
        }
        self.last = Some(view);
        self.last.as_ref()
    }

    pub fn current(&self) -> Option<&StageView> {
        self.last.as_ref()
    }

    /// Forgets the cached view so the next update always redraws, e.g. after
    /// a terminal resize.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

/// Plain-text rendering of a view.
pub fn outline(view: &StageView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", view.description);
    let _ = writeln!(out);

    for node in &view.bands {
        match node {
            BandNode::Layer(band) => {
                let _ = writeln!(out, "[{}] {}", band.label, band.description);
            }
            BandNode::Container { band, children } => {
                let _ = writeln!(out, "[{}] {}", band.label, band.description);
                for child in children {
                    let _ = writeln!(out, "  [{}] {}", child.label, child.description);
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "stage {}/{}", view.slider.value + 1, view.slider.max + 1);
    let controls: Vec<String> = view
        .buttons
        .iter()
        .map(|button| {
            if button.enabled {
                format!("[{}]", button.icon)
            } else {
                format!("({})", button.icon)
            }
        })
        .collect();
    let _ = writeln!(out, "{}", controls.join(" "));
    out
}
