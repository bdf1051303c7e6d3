use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{format_name, id_badge, Component};
use crate::action::Action;
use crate::state::{AppState, DetailRecord, StatValue};

/// Stat bars are drawn against this ceiling.
const STAT_CEILING: u16 = 150;
const STAT_BAR_WIDTH: usize = 20;

/// Props for DetailView - read-only view of state
pub struct DetailViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// One item's detail page with previous/next navigation
#[derive(Default)]
pub struct DetailView;

impl Component<Action> for DetailView {
    type Props<'a> = DetailViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::DetailPrev),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::DetailNext),
            KeyCode::Esc | KeyCode::Backspace => Some(Action::DetailClose),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: DetailViewProps<'_>) {
        let chunks = Layout::vertical([
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        match &props.state.detail {
            DataResource::Loaded(record) => {
                render_record(frame, chunks[0], record, &props.state.description);
            }
            DataResource::Failed(_) => render_not_found(frame, chunks[0]),
            DataResource::Loading | DataResource::Empty => {
                let msg = Line::from(Span::styled(
                    "Loading...",
                    Style::default().fg(Color::DarkGray),
                ))
                .centered();
                frame.render_widget(Paragraph::new(msg), chunks[0]);
            }
        }

        render_footer(frame, chunks[1]);
    }
}

fn render_record(frame: &mut Frame, area: Rect, record: &DetailRecord, description: &str) {
    let stats_height = record.stats.len() as u16 + 1;
    let chunks = Layout::vertical([
        Constraint::Length(2),           // Name + types
        Constraint::Length(2),           // Measurements
        Constraint::Min(2),              // Description
        Constraint::Length(stats_height) // Base stats
    ])
    .split(area);

    let types = record
        .types
        .iter()
        .map(|name| format_name(name))
        .collect::<Vec<_>>()
        .join(" / ");
    let header = vec![
        Line::from(vec![
            Span::styled(
                format_name(&record.name),
                Style::default().fg(Color::Cyan).bold(),
            ),
            Span::styled(
                format!(" {}", id_badge(record.id)),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(Span::styled(types, Style::default().fg(Color::White))),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let ability = record
        .abilities
        .first()
        .map(|name| format_name(name))
        .unwrap_or_default();
    let measurements = Line::from(vec![
        Span::styled(
            format!("{:.1} kg", f32::from(record.weight) / 10.0),
            Style::default().fg(Color::White),
        ),
        Span::styled("  Weight    ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{:.1} m", f32::from(record.height) / 10.0),
            Style::default().fg(Color::White),
        ),
        Span::styled("  Height    ", Style::default().fg(Color::Gray)),
        Span::styled(ability, Style::default().fg(Color::White)),
        Span::styled("  Ability", Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(measurements), chunks[1]);

    frame.render_widget(
        Paragraph::new(Span::styled(
            description.to_string(),
            Style::default().fg(Color::Gray),
        ))
        .wrap(Wrap { trim: false }),
        chunks[2],
    );

    let mut stat_lines = vec![Line::from(Span::styled(
        "Base Stats",
        Style::default().fg(Color::Cyan).bold(),
    ))];
    for stat in &record.stats {
        stat_lines.push(Line::from(Span::styled(
            render_stat(stat),
            Style::default().fg(Color::White),
        )));
    }
    frame.render_widget(Paragraph::new(stat_lines), chunks[3]);
}

fn render_not_found(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Pokemon not found",
            Style::default().fg(Color::Red).bold(),
        ))
        .centered(),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("esc", Style::default().fg(Color::Cyan).bold()),
            Span::styled(" to go back", Style::default().fg(Color::DarkGray)),
        ])
        .centered(),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        area,
        StatusBarProps {
            left: StatusBarSection::empty(),
            center: StatusBarSection::hints(&[
                StatusBarHint::new("←/→", "prev/next"),
                StatusBarHint::new("esc", "back"),
                StatusBarHint::new("q", "quit"),
            ]),
            right: StatusBarSection::empty(),
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}

fn render_stat(stat: &StatValue) -> String {
    let bar_len = ((stat.value as usize * STAT_BAR_WIDTH) / STAT_CEILING as usize)
        .clamp(1, STAT_BAR_WIDTH);
    let bar = "#".repeat(bar_len);
    format!(
        "{label:>4} {value:>3} {bar}",
        label = shorten_stat(&stat.name),
        value = stat.value
    )
}

fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => " HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SAT".to_string(),
        "special-defense" => "SDF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::View;
    use tui_dispatch::testing::*;

    fn bulbasaur() -> DetailRecord {
        DetailRecord {
            id: 1,
            name: "bulbasaur".into(),
            height: 7,
            weight: 69,
            types: vec!["grass".into(), "poison".into()],
            abilities: vec!["overgrow".into()],
            stats: vec![
                StatValue {
                    name: "hp".into(),
                    value: 45,
                },
                StatValue {
                    name: "attack".into(),
                    value: 49,
                },
            ],
            artwork_url: crate::api::artwork_url(1),
        }
    }

    fn found_state() -> AppState {
        AppState {
            view: View::Detail,
            detail_id: 1,
            detail: DataResource::Loaded(bulbasaur()),
            description: "A strange seed was planted on its back at birth.".into(),
            ..Default::default()
        }
    }

    #[test]
    fn arrows_navigate_sequentially() {
        let mut component = DetailView;
        let state = found_state();

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(crossterm::event::KeyEvent::from(KeyCode::Left)),
                DetailViewProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::DetailPrev);

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(crossterm::event::KeyEvent::from(KeyCode::Right)),
                DetailViewProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::DetailNext);
    }

    #[test]
    fn renders_found_record() {
        let mut render = RenderHarness::new(70, 24);
        let mut component = DetailView;
        let state = found_state();

        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                DetailViewProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("Bulbasaur"));
        assert!(output.contains("#001"));
        assert!(output.contains("Grass / Poison"));
        assert!(output.contains("6.9 kg"));
        assert!(output.contains("0.7 m"));
        assert!(output.contains("A strange seed"));
        assert!(output.contains("Base Stats"));
        assert!(output.contains(" HP  45"));
    }

    #[test]
    fn renders_not_found_page() {
        let mut render = RenderHarness::new(60, 20);
        let mut component = DetailView;
        let state = AppState {
            view: View::Detail,
            detail_id: 9999,
            detail: DataResource::Failed("HTTP status client error (404 Not Found)".into()),
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                DetailViewProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("Pokemon not found"));
    }

    #[test]
    fn renders_loading_state() {
        let mut render = RenderHarness::new(60, 20);
        let mut component = DetailView;
        let state = AppState {
            view: View::Detail,
            detail_id: 4,
            detail: DataResource::Loading,
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                DetailViewProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("Loading..."));
    }
}
