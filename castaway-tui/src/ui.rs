use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::router::{Router, tab_names};
use crate::state::AppState;

/// Draw the whole interface: sidebar navigation plus the active route with
/// its controls footer and the status bar.
pub fn draw(f: &mut Frame, state: &AppState, router: &Router) {
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([
            Constraint::Length(15), // Sidebar navigation
            Constraint::Min(40),    // Main content area
        ])
        .split(f.area());

    draw_sidebar(f, main_chunks[0], router);
    draw_main_content(f, main_chunks[1], state, router);
}

fn draw_sidebar(f: &mut Frame, area: Rect, router: &Router) {
    let block = Block::default()
        .title(" castaway ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let current_name = router.current().name();
    let nav_text: Vec<Line> = tab_names()
        .iter()
        .map(|name| {
            let is_active = *name == current_name;
            let prefix = if is_active { "▶ " } else { "  " };
            let style = if is_active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(format!("{}{}", prefix, name), style))
        })
        .collect();

    f.render_widget(Paragraph::new(nav_text), inner);
}

fn draw_main_content(f: &mut Frame, area: Rect, state: &AppState, router: &Router) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Route panel
            Constraint::Length(3), // Controls info
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    router.current().render(f, chunks[0], state);
    draw_controls(f, chunks[1], state, router);
    draw_status(f, chunks[2], state);
}

/// Key hints for the active route
fn draw_controls(f: &mut Frame, area: Rect, state: &AppState, router: &Router) {
    let mut spans = Vec::new();
    for (i, (key, action)) in router.current().help_items(state).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            key,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(action, Style::default().fg(Color::Gray)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().title(" Controls ").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn draw_status(f: &mut Frame, area: Rect, state: &AppState) {
    let transport = if state.current_episode().is_none() {
        Span::styled("stopped", Style::default().fg(Color::DarkGray))
    } else if state.player.is_playing {
        Span::styled("playing", Style::default().fg(Color::Green))
    } else {
        Span::styled("paused", Style::default().fg(Color::Yellow))
    };

    let flag = |label: &str, on: bool| {
        let style = if on {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(label.to_string(), style)
    };

    let line = Line::from(vec![
        Span::raw(state.status_message.clone()),
        Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
        transport,
        Span::raw("  "),
        flag("shuffle", state.player.is_shuffling),
        Span::raw("  "),
        flag("loop", state.player.is_looping),
    ]);

    let paragraph = Paragraph::new(line)
        .block(Block::default().title(" Status ").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
