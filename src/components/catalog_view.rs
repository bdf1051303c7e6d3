use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{format_name, id_badge, Component};
use crate::action::Action;
use crate::state::AppState;

/// Columns in the entry grid.
const GRID_COLS: usize = 4;
/// Printed width of one grid cell.
const CELL_WIDTH: usize = 20;

/// Props for CatalogView - read-only view of state
pub struct CatalogViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The paginated catalog grid with search and sort controls
#[derive(Default)]
pub struct CatalogView;

impl Component<Action> for CatalogView {
    type Props<'a> = CatalogViewProps<'a>;

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

        if props.state.search.active {
            return match key.code {
                KeyCode::Esc => Some(Action::SearchCancel),
                KeyCode::Enter => Some(Action::SearchSubmit),
                KeyCode::Backspace => Some(Action::SearchBackspace),
                KeyCode::Char(ch) => Some(Action::SearchInput(ch)),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('/') => Some(Action::SearchStart),
            KeyCode::Char('s') => Some(Action::SortCycle),
            KeyCode::Char('n') | KeyCode::PageDown => Some(Action::PageNext),
            KeyCode::Char('p') | KeyCode::PageUp => Some(Action::PagePrev),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::SelectionMove(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::SelectionMove(1)),
            KeyCode::Up | KeyCode::Char('k') => {
                Some(Action::SelectionMove(-(GRID_COLS as i16)))
            }
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionMove(GRID_COLS as i16)),
            KeyCode::Enter => props
                .state
                .selected_entry()
                .map(|entry| Action::DetailOpen(entry.id)),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: CatalogViewProps<'_>) {
        let chunks = Layout::vertical([
            Constraint::Length(2), // Header
            Constraint::Min(1),    // Grid
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        render_header(frame, chunks[0], props.state);
        render_grid(frame, chunks[1], props.state);
        render_footer(frame, chunks[2], props.state);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut title = vec![
        Span::styled("Pokedex", Style::default().fg(Color::Cyan).bold()),
        Span::raw("  "),
        Span::styled(
            format!("page {}", state.page_index + 1),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::styled(
            format!("sort {}", state.sort.label()),
            Style::default().fg(Color::Gray),
        ),
    ];
    if state.page_loading {
        title.push(Span::styled("  ...", Style::default().fg(Color::DarkGray)));
    }

    let search = if state.search.active {
        format!("/{}_", state.search.query)
    } else if state.search.query.is_empty() {
        String::new()
    } else {
        format!("/{}", state.search.query)
    };

    let lines = vec![
        Line::from(title),
        Line::from(Span::styled(search, Style::default().fg(Color::Cyan))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_grid(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(_) = state.catalog.data() else {
        // First fetch still outstanding (or failed, which keeps this
        // placeholder indefinitely).
        let msg = Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        ))
        .centered();
        frame.render_widget(Paragraph::new(msg), area);
        return;
    };

    let visible = state.visible();
    if visible.is_empty() {
        let msg = Line::from(Span::styled(
            "No matches.",
            Style::default().fg(Color::DarkGray),
        ))
        .centered();
        frame.render_widget(Paragraph::new(msg), area);
        return;
    }

    let rows_fit = (area.height as usize).max(1);
    let selected_row = state.selected / GRID_COLS;
    let first_row = selected_row.saturating_sub(rows_fit.saturating_sub(1));

    let mut lines = Vec::new();
    for (row_index, row) in visible.chunks(GRID_COLS).enumerate().skip(first_row) {
        if row_index >= first_row + rows_fit {
            break;
        }
        let mut spans = Vec::with_capacity(row.len());
        for (col_index, entry) in row.iter().enumerate() {
            let cell = format!(
                "{:<width$}",
                format!("{} {}", id_badge(entry.id), format_name(&entry.name)),
                width = CELL_WIDTH
            );
            let style = if row_index * GRID_COLS + col_index == state.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(cell, style));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let status = state.message.clone().unwrap_or_else(|| {
        if state.page_loading {
            "Loading page...".to_string()
        } else {
            String::new()
        }
    });
    let status_items = [StatusBarItem::span(Span::styled(
        status,
        Style::default().fg(Color::Yellow),
    ))];

    let hints = if state.search.active {
        vec![
            StatusBarHint::new("enter", "apply"),
            StatusBarHint::new("esc", "cancel"),
        ]
    } else {
        vec![
            StatusBarHint::new("/", "search"),
            StatusBarHint::new("s", "sort"),
            StatusBarHint::new("n/p", "page"),
            StatusBarHint::new("enter", "open"),
            StatusBarHint::new("q", "quit"),
        ]
    };

    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        area,
        StatusBarProps {
            left: StatusBarSection::items(&status_items),
            center: StatusBarSection::hints(&hints),
            right: StatusBarSection::empty(),
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::index_page;
    use crate::state::View;
    use tui_dispatch::testing::*;
    use tui_dispatch::DataResource;

    fn loaded_state() -> AppState {
        AppState {
            catalog: DataResource::Loaded(index_page(
                0,
                vec!["bulbasaur".into(), "ivysaur".into(), "venusaur".into()],
            )),
            view: View::Catalog,
            ..Default::default()
        }
    }

    #[test]
    fn enter_opens_the_selected_entry() {
        let mut component = CatalogView;
        let mut state = loaded_state();
        state.selected = 1;

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(crossterm::event::KeyEvent::from(KeyCode::Enter)),
                CatalogViewProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::DetailOpen(2));
    }

    #[test]
    fn search_mode_captures_typed_characters() {
        let mut component = CatalogView;
        let mut state = loaded_state();
        state.search.active = true;

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("c")),
                CatalogViewProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchInput('c'));
    }

    #[test]
    fn unfocused_ignores_keys() {
        let mut component = CatalogView;
        let state = loaded_state();

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("q")),
                CatalogViewProps {
                    state: &state,
                    is_focused: false,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn renders_entries_with_id_badges() {
        let mut render = RenderHarness::new(90, 24);
        let mut component = CatalogView;
        let state = loaded_state();

        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                CatalogViewProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("#001 Bulbasaur"));
        assert!(output.contains("#003 Venusaur"));
    }

    #[test]
    fn renders_loading_placeholder_before_first_page() {
        let mut render = RenderHarness::new(60, 20);
        let mut component = CatalogView;
        let state = AppState {
            catalog: DataResource::Loading,
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                CatalogViewProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("Loading..."));
    }
}
