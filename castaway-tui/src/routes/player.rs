use castaway_core::engine::EngineHandle;
use castaway_core::format::format_duration;
use ratatui::{
    Frame,
    crossterm::event::KeyCode,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::router::{RouteAction, RouteHandler};
use crate::state::AppState;

/// The now-playing route: episode metadata, progress and transport controls
pub struct PlayerRoute;

impl RouteHandler for PlayerRoute {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // Now playing info
                Constraint::Length(3), // Progress bar
                Constraint::Length(3), // Transport controls
                Constraint::Min(0),
            ])
            .split(area);

        draw_now_playing(frame, chunks[0], state);
        draw_progress(frame, chunks[1], state);
        draw_transport(frame, chunks[2], state);
    }

    fn handle_input(
        &mut self,
        key: KeyCode,
        state: &mut AppState,
        handle: &EngineHandle,
    ) -> anyhow::Result<RouteAction> {
        let has_episode = state.current_episode().is_some();
        match key {
            KeyCode::Char(' ') => {
                if has_episode {
                    state.player.toggle_play();
                }
            }
            KeyCode::Char('n') => {
                if has_episode && state.player.has_next() {
                    state.player.play_next();
                }
            }
            KeyCode::Char('p') => {
                if has_episode && state.player.has_previous() {
                    state.player.play_previous();
                }
            }
            KeyCode::Char('s') => {
                if state.shuffle_available() {
                    state.player.toggle_shuffle();
                }
            }
            KeyCode::Char('l') => {
                if has_episode {
                    state.player.toggle_loop();
                }
            }
            KeyCode::Left => {
                let target = state.progress.saturating_sub(5);
                state.seek_to(target, handle)?;
            }
            KeyCode::Right => {
                let target = state.progress.saturating_add(5);
                state.seek_to(target, handle)?;
            }
            _ => {}
        }
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "Player"
    }

    fn help_items(&self, _state: &AppState) -> Vec<(&str, &str)> {
        vec![
            ("Space", "Play/Pause"),
            ("N/P", "Next/Prev"),
            ("S", "Shuffle"),
            ("L", "Loop"),
            ("←/→", "Seek 5s"),
            ("Tab", "Switch Tab"),
            ("Q", "Quit"),
        ]
    }
}

/// Draw the current-episode block, or the empty-player placeholder
fn draw_now_playing(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" 🎧 Now Playing ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(episode) = state.current_episode() {
        let text = vec![
            Line::from(Span::styled(
                episode.title.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                episode.members.as_str(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                episode.thumbnail.as_str(),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(text), inner);
    } else {
        let placeholder = Paragraph::new("Select an episode to listen")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(placeholder, inner);
    }
}

/// Draw the progress gauge labelled elapsed / total
fn draw_progress(f: &mut Frame, area: Rect, state: &AppState) {
    let total = state.current_episode().map(|e| e.duration).unwrap_or(0);
    let ratio = if total > 0 {
        (f64::from(state.progress) / f64::from(total)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let label = format!(
        "{} / {}",
        format_duration(u64::from(state.progress)),
        format_duration(u64::from(total)),
    );

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(ratio)
        .label(label);

    f.render_widget(gauge, area);
}

/// Draw the transport strip with per-control enablement
fn draw_transport(f: &mut Frame, area: Rect, state: &AppState) {
    let has_episode = state.current_episode().is_some();

    let control = |label: &str, enabled: bool, active: bool| {
        let style = if active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else if enabled {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!("  {}  ", label), style)
    };

    let play_label = if state.player.is_playing { "⏸ Pause" } else { "▶ Play" };
    let line = Line::from(vec![
        control("🔀 Shuffle", state.shuffle_available(), state.player.is_shuffling),
        control("⏮ Prev", has_episode && state.player.has_previous(), false),
        control(play_label, has_episode, false),
        control("⏭ Next", has_episode && state.player.has_next(), false),
        control("🔁 Loop", has_episode, state.player.is_looping),
    ]);

    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .centered();
    f.render_widget(paragraph, area);
}
