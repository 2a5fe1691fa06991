//! Core library for the corticogenesis stage animation.
//!
//! The crate holds everything that does not depend on a terminal or an async
//! runtime: the layer and stage catalogs, the visibility rule, the playback
//! controller with its timer abstraction, and the view tree the front-end
//! draws from.

pub mod config;
pub mod error;
pub mod layers;
pub mod mapping;
pub mod render;
pub mod stages;
pub mod timeline;
pub mod visibility;

pub use config::{AppConfig, DisplayConfig, PlaybackConfig};
pub use error::{CortexError, Result};
pub use layers::{layers, LayerDescriptor, LayerKind, Rgba};
pub use mapping::{KeyBindings, QUIT_KEYS};
pub use render::{
    outline, render, BandNode, ButtonKind, ButtonView, LayerBand, RenderGraph, SliderView,
    StageView,
};
pub use stages::{stages, Stage, StageRecord, LAST_STAGE_INDEX, STAGE_COUNT};
pub use timeline::{
    PlaybackController, PlaybackState, TickOutcome, TimerSource, Transport,
    DEFAULT_TICK_INTERVAL,
};
pub use visibility::{is_visible, visible_layers};
