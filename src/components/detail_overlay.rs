use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::prelude::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::card_grid::{type_color, ACCENT_GOLD, ACCENT_TEAL, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::api::{artwork_url, ARTWORK_PLACEHOLDER};
use crate::format::{capitalize, format_id, gender_label, generation_label};
use crate::state::{EntityStat, OverlayState, OverlayTab, SpeciesInfo};
use crate::weakness::weaknesses_for;

pub struct DetailOverlay {
    modal: Modal,
}

pub struct DetailOverlayProps<'a> {
    pub overlay: &'a OverlayState,
    pub is_focused: bool,
}

impl Default for DetailOverlay {
    fn default() -> Self {
        Self { modal: Modal::new() }
    }
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc => Some(Action::OverlayClose),
                KeyCode::Left => Some(Action::OverlayPrev),
                KeyCode::Right => Some(Action::OverlayNext),
                KeyCode::Tab => Some(Action::OverlayTabSet(props.overlay.tab.toggle())),
                KeyCode::Char('1') => Some(Action::OverlayTabSet(OverlayTab::About)),
                KeyCode::Char('2') => Some(Action::OverlayTabSet(OverlayTab::Stats)),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 30 || area.height < 12 {
            return;
        }

        let overlay = props.overlay;
        let modal_area = centered_rect(52, 18, area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(1), // Header
                Constraint::Length(1), // Tabs
                Constraint::Min(1),    // Body
                Constraint::Length(1), // Nav hints
            ])
            .split(content_area);

            let header = Line::from(vec![
                Span::styled(
                    format!("#{} ", format_id(overlay.id)),
                    Style::default().fg(TEXT_DIM),
                ),
                Span::styled(
                    capitalize(&overlay.name),
                    Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
                ),
            ]);
            frame.render_widget(Paragraph::new(header), chunks[0]);

            let tabs = Tabs::new(vec!["About", "Stats"])
                .select(match overlay.tab {
                    OverlayTab::About => 0,
                    OverlayTab::Stats => 1,
                })
                .style(Style::default().fg(TEXT_DIM))
                .highlight_style(
                    Style::default()
                        .fg(ACCENT_TEAL)
                        .add_modifier(Modifier::BOLD),
                );
            frame.render_widget(tabs, chunks[1]);

            let body = match overlay.tab {
                OverlayTab::About => about_lines(overlay),
                OverlayTab::Stats => stats_lines(overlay),
            };
            frame.render_widget(Paragraph::new(body), chunks[2]);

            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "\u{2190} prev  \u{2192} next  tab switch  esc close",
                    Style::default().fg(TEXT_DIM),
                ))),
                chunks[3],
            );
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(Color::Rgb(35, 35, 45)),
                        padding: Padding::all(1),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::OverlayClose,
                render_content: &mut render_content,
            },
        );
    }
}

fn about_lines(overlay: &OverlayState) -> Vec<Line<'static>> {
    let Some(detail) = overlay.detail.data() else {
        return vec![loading_line()];
    };

    let mut lines = Vec::new();
    match overlay.species.data() {
        Some(species) => lines.extend(species_lines(species)),
        None => lines.push(loading_line()),
    }
    lines.push(field_line(
        "Height",
        format!("{:.1} m", f32::from(detail.height) / 10.0),
    ));
    lines.push(field_line(
        "Weight",
        format!("{:.1} kg", f32::from(detail.weight) / 10.0),
    ));
    lines.push(badge_line("Types", &detail.types));
    lines.push(badge_line("Weak to", &weaknesses_for(&detail.types)));
    lines.push(field_line("Artwork", artwork_url(detail.id)));
    lines.push(field_line(
        "Sprite",
        detail
            .sprite
            .clone()
            .unwrap_or_else(|| ARTWORK_PLACEHOLDER.to_string()),
    ));
    lines
}

fn species_lines(species: &SpeciesInfo) -> Vec<Line<'static>> {
    vec![
        field_line(
            "Category",
            species.genus.clone().unwrap_or_else(|| "Unknown".to_string()),
        ),
        field_line("Generation", generation_label(&species.generation)),
        field_line("Gender", gender_label(species.gender_rate).to_string()),
    ]
}

fn stats_lines(overlay: &OverlayState) -> Vec<Line<'static>> {
    let Some(detail) = overlay.detail.data() else {
        return vec![loading_line()];
    };
    detail
        .stats
        .iter()
        .map(|stat| {
            Line::from(Span::styled(
                render_stat(stat),
                Style::default().fg(TEXT_MAIN),
            ))
        })
        .collect()
}

fn render_stat(stat: &EntityStat) -> String {
    let label = shorten_stat(&stat.name);
    let bar_len = (stat.value as usize / 10).clamp(1, 20);
    let bar = "#".repeat(bar_len);
    format!("{label:>4} {value:>3} {bar}", value = stat.value)
}

fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => " HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SAT".to_string(),
        "special-defense" => "SDF".to_string(),
        "speed" => "SPD".to_string(),
        other => other.to_ascii_uppercase(),
    }
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(TEXT_DIM)),
        Span::styled(value, Style::default().fg(TEXT_MAIN)),
    ])
}

fn badge_line(label: &str, names: &[String]) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{label}: "),
        Style::default().fg(TEXT_DIM),
    )];
    for name in names {
        spans.push(Span::styled(
            format!(" {name} "),
            Style::default().fg(Color::Black).bg(type_color(name)),
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn loading_line() -> Line<'static> {
    Line::from(Span::styled(
        "Loading details...",
        Style::default().fg(TEXT_DIM),
    ))
}
