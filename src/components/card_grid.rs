use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::prelude::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::Component;
use crate::action::Action;
use crate::format::{capitalize, format_id};
use crate::state::{grid_columns, AppState, DetailedEntity, CARD_HEIGHT, CARD_WIDTH};

pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Badge colour for a type name, matching the franchise palette.
pub fn type_color(name: &str) -> Color {
    match name {
        "normal" => Color::Rgb(168, 168, 120),
        "fire" => Color::Rgb(240, 128, 48),
        "water" => Color::Rgb(104, 144, 240),
        "electric" => Color::Rgb(248, 208, 48),
        "grass" => Color::Rgb(120, 200, 80),
        "ice" => Color::Rgb(152, 216, 216),
        "fighting" => Color::Rgb(192, 48, 40),
        "poison" => Color::Rgb(160, 64, 160),
        "ground" => Color::Rgb(224, 192, 104),
        "flying" => Color::Rgb(168, 144, 240),
        "psychic" => Color::Rgb(248, 88, 136),
        "bug" => Color::Rgb(168, 184, 32),
        "rock" => Color::Rgb(184, 160, 56),
        "ghost" => Color::Rgb(112, 88, 152),
        "dragon" => Color::Rgb(112, 56, 248),
        "dark" => Color::Rgb(112, 88, 72),
        "steel" => Color::Rgb(184, 184, 208),
        "fairy" => Color::Rgb(238, 153, 172),
        _ => TEXT_DIM,
    }
}

/// Props for CardGrid - read-only view of state
pub struct CardGridProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The main card grid: header, cards, share-params footer.
#[derive(Default)]
pub struct CardGrid;

impl Component<Action> for CardGrid {
    type Props<'a> = CardGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        let columns = grid_columns(props.state.terminal_size.0) as i16;
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left => Some(Action::SelectionMove(-1)),
                KeyCode::Right => Some(Action::SelectionMove(1)),
                KeyCode::Up => Some(Action::SelectionMove(-columns)),
                KeyCode::Down => Some(Action::SelectionMove(columns)),
                KeyCode::Enter => Some(Action::OverlayOpen),
                KeyCode::Char('m') => Some(Action::LoadMore),
                KeyCode::Char('s') => {
                    Some(Action::SortKeySet(props.state.view.sort_key.toggle()))
                }
                KeyCode::Char('o') => {
                    Some(Action::OrderSet(props.state.view.sort_direction.toggle()))
                }
                KeyCode::Char('/') => Some(Action::SearchStart),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: CardGridProps<'_>) {
        let chunks = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Cards
            Constraint::Length(1), // Share params / message
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        render_header(frame, chunks[0], props.state);

        if props.state.displayed.is_empty() {
            let placeholder = if props.state.view.is_loading || props.state.catalogue.is_loading()
            {
                "Loading Pokemon..."
            } else {
                "No Pokemon match this search."
            };
            frame.render_widget(
                Paragraph::new(placeholder)
                    .style(Style::default().fg(TEXT_DIM))
                    .centered(),
                chunks[1],
            );
        } else {
            render_cards(frame, chunks[1], props.state);
        }

        render_params_line(frame, chunks[2], props.state);

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[3],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("\u{2190}\u{2192}\u{2191}\u{2193}", "move"),
                    StatusBarHint::new("enter", "details"),
                    StatusBarHint::new("/", "search"),
                    StatusBarHint::new("s", "sort"),
                    StatusBarHint::new("o", "order"),
                    StatusBarHint::new("m", "more"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled(
        "POKEDEX",
        Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
    )];
    if state.view.is_loading {
        let frame_idx = (state.tick % SPINNER_FRAMES.len() as u64) as usize;
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            SPINNER_FRAMES[frame_idx],
            Style::default().fg(ACCENT_TEAL),
        ));
    }
    spans.push(Span::styled(
        format!(
            "  sort: {} {}",
            state.view.sort_key.label(),
            state.view.sort_direction.label()
        ),
        Style::default().fg(TEXT_DIM),
    ));
    if !state.view.query.is_empty() {
        spans.push(Span::styled(
            format!("  query: {}", state.view.query),
            Style::default().fg(ACCENT_TEAL),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_cards(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = grid_columns(area.width);
    let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);
    let selected_row = state.selected_index / columns;
    let total_rows = state.displayed.len().div_ceil(columns);
    // Keep the selected row on screen.
    let first_row = selected_row
        .saturating_sub(visible_rows - 1)
        .min(total_rows.saturating_sub(visible_rows));

    for (index, entity) in state.displayed.iter().enumerate() {
        let row = index / columns;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let column = index % columns;
        let card_area = Rect {
            x: area.x + (column as u16) * CARD_WIDTH,
            y: area.y + ((row - first_row) as u16) * CARD_HEIGHT,
            width: CARD_WIDTH.min(area.width.saturating_sub((column as u16) * CARD_WIDTH)),
            height: CARD_HEIGHT.min(area.height.saturating_sub(((row - first_row) as u16) * CARD_HEIGHT)),
        };
        if card_area.width < 3 || card_area.height < 3 {
            continue;
        }
        render_card(frame, card_area, entity, index == state.selected_index);
    }
}

fn render_card(frame: &mut Frame, area: Rect, entity: &DetailedEntity, selected: bool) {
    let border_style = if selected {
        Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let block = Block::default().borders(Borders::ALL).style(border_style);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("#{}", format_id(entity.id)),
            Style::default().fg(TEXT_DIM),
        )),
        Line::from(Span::styled(
            capitalize(&entity.name),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        )),
    ];
    let mut badge_spans: Vec<Span> = Vec::new();
    for type_name in &entity.types {
        if !badge_spans.is_empty() {
            badge_spans.push(Span::raw(" "));
        }
        badge_spans.push(Span::styled(
            format!(" {} ", type_name),
            Style::default().fg(Color::Black).bg(type_color(type_name)),
        ));
    }
    lines.push(Line::from(badge_spans));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_params_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans: Vec<Span> = Vec::new();
    if !state.params.is_empty() {
        spans.push(Span::styled("view: ", Style::default().fg(TEXT_DIM)));
        spans.push(Span::styled(
            state.params.clone(),
            Style::default().fg(ACCENT_TEAL),
        ));
    }
    if let Some(message) = &state.message {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(ACCENT_GOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
