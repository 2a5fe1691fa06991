use corticogenesis_core::{
    AppConfig, DisplayConfig, KeyBindings, PlaybackController, RenderGraph, Result, TickOutcome,
    Transport, QUIT_KEYS, STAGE_COUNT,
};
use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::{
    timer::{AppEvent, IntervalTimer},
    ui::{self, HitAreas},
};

/// Interactive session: playback state, cached view and input routing.
#[derive(Debug)]
pub struct App {
    playback: PlaybackController<IntervalTimer>,
    graph: RenderGraph,
    keys: KeyBindings,
    display: DisplayConfig,
    hint: String,
    hit: HitAreas,
    should_quit: bool,
}

impl App {
    /// Builds the session from `config`. Must run inside a tokio runtime when
    /// autoplay is enabled, since the timer task is spawned immediately.
    pub fn new(config: &AppConfig, events: UnboundedSender<AppEvent>) -> Self {
        let mut playback = PlaybackController::with_period(
            IntervalTimer::new(events),
            config.playback.tick_interval(),
        );
        playback.set_stage_index(config.playback.start_stage.index());
        if config.playback.autoplay {
            playback.toggle_play_pause();
        }

        let keys = config.key_bindings();
        let hint = controls_hint(&keys);
        Self {
            playback,
            graph: RenderGraph::new(),
            keys,
            display: config.display.clone(),
            hint,
            hit: HitAreas::default(),
            should_quit: false,
        }
    }

    pub fn playback(&self) -> &PlaybackController<IntervalTimer> {
        &self.playback
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Runs until the user quits. Terminal input and timer ticks are handled
    /// one at a time on this task.
    pub async fn run<B: Backend>(
        mut self,
        terminal: &mut Terminal<B>,
        mut events: UnboundedReceiver<AppEvent>,
    ) -> Result<()> {
        let mut input = EventStream::new();
        self.redraw(terminal)?;

        while !self.should_quit() {
            tokio::select! {
                maybe_event = input.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_terminal_event(event),
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                },
                Some(event) = events.recv() => self.handle_app_event(event),
            }
            self.redraw(terminal)?;
        }

        self.playback.stop();
        tracing::info!(stage = self.playback().stage().index(), "leaving animation");
        Ok(())
    }

    /// Draws the current state if it changed since the last frame.
    pub fn redraw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let Some(view) = self.graph.update(&self.playback.state()) else {
            return Ok(());
        };
        let mut hit = HitAreas::default();
        terminal.draw(|frame| hit = ui::draw(frame, view, &self.display, &self.hint))?;
        self.hit = hit;
        Ok(())
    }

    pub fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(..) => self.graph.invalidate(),
            _ => {}
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick(generation) => match self.playback.on_tick(generation) {
                TickOutcome::Advanced(stage) => {
                    tracing::debug!(stage = stage.index(), "auto-advanced");
                }
                TickOutcome::Finished | TickOutcome::Ignored => {}
            },
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let Some(name) = key_name(key.code) else {
            return;
        };
        if QUIT_KEYS.contains(&name.as_str()) {
            self.should_quit = true;
        } else if let Some(action) = self.keys.resolve(&name) {
            self.apply(action);
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(kind) = self.hit.button_at(mouse.column, mouse.row) {
                    let enabled = self
                        .graph
                        .current()
                        .map(|view| view.button(kind).enabled)
                        .unwrap_or(false);
                    if enabled {
                        self.apply(kind.action());
                    }
                } else if let Some(value) = self.hit.slider_value(mouse.column, mouse.row) {
                    self.apply(Transport::Scrub(value));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(value) = self.hit.slider_value(mouse.column, mouse.row) {
                    self.apply(Transport::Scrub(value));
                }
            }
            _ => {}
        }
    }

    fn apply(&mut self, action: Transport) {
        tracing::trace!(?action, "transport");
        self.playback.apply(action);
    }
}

/// Name used by [`KeyBindings`] for a key, if it can be bound.
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Esc => "esc".to_string(),
        _ => return None,
    };
    Some(name)
}

fn controls_hint(keys: &KeyBindings) -> String {
    let mut parts = Vec::new();
    for (action, label) in [
        (Transport::JumpToStart, "start"),
        (Transport::StepBack, "back"),
        (Transport::TogglePlay, "play/pause"),
        (Transport::StepForward, "forward"),
        (Transport::JumpToEnd, "end"),
    ] {
        let bound = keys.keys_for(action);
        if !bound.is_empty() {
            parts.push(format!("{} {label}", bound.join("/")));
        }
    }

    let stage_keys: Vec<&str> = (0..STAGE_COUNT)
        .flat_map(|index| keys.keys_for(Transport::Scrub(index as f32)))
        .collect();
    let digits: Vec<String> = (1..=STAGE_COUNT).map(|number| number.to_string()).collect();
    if stage_keys == digits {
        parts.push(format!("1-{STAGE_COUNT} stage"));
    } else if !stage_keys.is_empty() {
        parts.push(format!("{} stage", stage_keys.join("/")));
    }

    parts.push("q quit".to_string());
    parts.join("  ·  ")
}
