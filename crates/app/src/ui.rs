use corticogenesis_core::{
    BandNode, ButtonKind, ButtonView, DisplayConfig, LayerBand, Rgba, StageView, LAST_STAGE_INDEX,
};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, Paragraph, Wrap},
    Frame,
};

const DESCRIPTION_ROWS: u16 = 4;

/// Screen regions that react to the mouse, recorded by the last draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitAreas {
    pub slider: Rect,
    pub buttons: Vec<(ButtonKind, Rect)>,
}

impl HitAreas {
    pub fn button_at(&self, column: u16, row: u16) -> Option<ButtonKind> {
        self.buttons
            .iter()
            .find(|(_, area)| area.contains(Position::new(column, row)))
            .map(|(kind, _)| *kind)
    }

    /// Slider value for a click or drag, if it lands on the slider row.
    pub fn slider_value(&self, column: u16, row: u16) -> Option<f32> {
        if row != self.slider.y || self.slider.width == 0 {
            return None;
        }
        Some(slider_value(self.slider, column))
    }
}

/// Maps a column onto the continuous slider range `[0, LAST_STAGE_INDEX]`.
/// Columns left or right of the track clamp to the ends.
pub fn slider_value(track: Rect, column: u16) -> f32 {
    if track.width <= 1 {
        return 0.0;
    }
    let offset = column.saturating_sub(track.x).min(track.width - 1);
    f32::from(offset) / f32::from(track.width - 1) * LAST_STAGE_INDEX as f32
}

/// Draws the whole screen and returns the interactive regions.
pub fn draw(frame: &mut Frame, view: &StageView, display: &DisplayConfig, hint: &str) -> HitAreas {
    let description_rows = if display.show_descriptions {
        DESCRIPTION_ROWS
    } else {
        0
    };
    let [title_area, description_area, bands_area, slider_area, buttons_area, hint_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(description_rows),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    let title_style = Style::default().add_modifier(Modifier::BOLD);
    let title = if view.is_playing {
        format!("{}  (playing)", view.title)
    } else {
        view.title.to_string()
    };
    frame.render_widget(Paragraph::new(title).style(title_style), title_area);

    if display.show_descriptions {
        frame.render_widget(
            Paragraph::new(view.description).wrap(Wrap { trim: true }),
            description_area,
        );
    }

    draw_bands(frame, view, display.band_height(), bands_area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(view.slider.ratio())
        .label(format!(
            "Stage {}/{}",
            view.slider.value + 1,
            view.slider.max + 1
        ));
    frame.render_widget(gauge, slider_area);

    let button_areas = Layout::horizontal([Constraint::Ratio(1, 5); 5]).split(buttons_area);
    let mut buttons = Vec::with_capacity(view.buttons.len());
    for (button, area) in view.buttons.iter().zip(button_areas.iter()) {
        frame.render_widget(button_widget(button), *area);
        buttons.push((button.kind, *area));
    }

    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        hint_area,
    );

    HitAreas {
        slider: slider_area,
        buttons,
    }
}

fn draw_bands(frame: &mut Frame, view: &StageView, band_height: u16, area: Rect) {
    let constraints: Vec<Constraint> = view
        .bands
        .iter()
        .map(|node| match node {
            BandNode::Layer(_) => Constraint::Length(band_height),
            BandNode::Container { children, .. } => {
                Constraint::Length(container_height(children.len(), band_height))
            }
        })
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::vertical(constraints).split(area);

    for (node, row) in view.bands.iter().zip(rows.iter()) {
        match node {
            BandNode::Layer(band) => {
                frame.render_widget(band_widget(band, Rgba::BLACK), *row);
            }
            BandNode::Container { band, children } => {
                let backdrop = band.color.over(Rgba::BLACK);
                let block = Block::bordered()
                    .title(Line::from(Span::styled(
                        band.label,
                        Style::default().add_modifier(Modifier::BOLD),
                    )))
                    .style(Style::default().bg(to_color(backdrop)).fg(text_color(backdrop)));
                let inner = block.inner(*row);
                frame.render_widget(block, *row);

                let child_rows = Layout::vertical(
                    children
                        .iter()
                        .map(|_| Constraint::Length(band_height))
                        .chain(std::iter::once(Constraint::Min(0))),
                )
                .split(inner);
                for (child, child_row) in children.iter().zip(child_rows.iter()) {
                    frame.render_widget(band_widget(child, backdrop), *child_row);
                }
            }
        }
    }
}

/// Rows taken by the cortical plate: one band per layer plus its border. An
/// empty plate still gets one band of room.
fn container_height(children: usize, band_height: u16) -> u16 {
    let bands = u16::try_from(children.max(1)).unwrap_or(u16::MAX);
    bands.saturating_mul(band_height).saturating_add(2)
}

fn band_widget(band: &LayerBand, background: Rgba) -> Paragraph<'static> {
    let fill = band.color.over(background);
    let line = Line::from(vec![
        Span::styled(band.label, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::raw(band.description),
    ]);
    Paragraph::new(line).style(Style::default().bg(to_color(fill)).fg(text_color(fill)))
}

fn button_widget(button: &ButtonView) -> Paragraph<'static> {
    let style = if button.enabled {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Paragraph::new(format!("[{}] {}", button.icon, button.label))
        .style(style)
        .alignment(Alignment::Center)
}

fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Black or white, whichever reads better on `fill`.
fn text_color(fill: Rgba) -> Color {
    let luma = 0.299 * f32::from(fill.r) + 0.587 * f32::from(fill.g) + 0.114 * f32::from(fill.b);
    if luma > 140.0 {
        Color::Black
    } else {
        Color::White
    }
}
