use castaway_core::engine::EngineHandle;
use castaway_core::format::format_duration;
use ratatui::{
    Frame,
    crossterm::event::KeyCode,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::router::{RouteAction, RouteHandler};
use crate::routes::player::PlayerRoute;
use crate::state::AppState;

/// The catalog route: browse all episodes and queue from any of them
pub struct QueueRoute;

impl RouteHandler for QueueRoute {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        draw_catalog_panel(frame, area, state);
    }

    fn handle_input(
        &mut self,
        key: KeyCode,
        state: &mut AppState,
        _handle: &EngineHandle,
    ) -> anyhow::Result<RouteAction> {
        match key {
            KeyCode::Up => state.catalog_prev(),
            KeyCode::Down => state.catalog_next(),
            KeyCode::Enter => {
                if state.catalog_state.selected().is_some() {
                    state.play_selected();
                    return Ok(RouteAction::Replace(Box::new(PlayerRoute)));
                }
            }
            KeyCode::Char('o') => {
                if state.catalog_state.selected().is_some() {
                    state.play_selected_single();
                    return Ok(RouteAction::Replace(Box::new(PlayerRoute)));
                }
            }
            _ => {}
        }
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "Queue"
    }

    fn help_items(&self, _state: &AppState) -> Vec<(&str, &str)> {
        vec![
            ("↑/↓", "Select"),
            ("Enter", "Play from here"),
            ("O", "Play only this"),
            ("Tab", "Switch Tab"),
            ("Q", "Quit"),
        ]
    }
}

/// Draw the episode catalog as a selectable list
fn draw_catalog_panel(f: &mut Frame, area: Rect, state: &AppState) {
    let title = format!(" Episodes ({}) ", state.catalog.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if state.catalog.is_empty() {
        let empty_msg = Paragraph::new("Catalog is empty. Start castaway with an episodes.json path.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty_msg, area);
        return;
    }

    let current_url = state.current_episode().map(|e| e.url.as_str());
    let items: Vec<ListItem> = state
        .catalog
        .iter()
        .map(|episode| {
            let is_current = current_url == Some(episode.url.as_str());
            let prefix = if is_current { "▶ " } else { "  " };
            let label = format!(
                "{}{}  —  {}  [{}]",
                prefix,
                episode.title,
                episode.members,
                format_duration(u64::from(episode.duration)),
            );
            let style = if is_current {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(label).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut list_state = state.catalog_state.clone();
    f.render_stateful_widget(list, area, &mut list_state);
}
