use castaway_core::engine::EngineHandle;
use ratatui::{
    Frame,
    crossterm::event::KeyCode,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_logger::{TuiLoggerWidget, TuiWidgetEvent, TuiWidgetState};

use crate::router::{RouteAction, RouteHandler};
use crate::state::AppState;

/// Scrollback over the collected log records
pub struct LogRoute {
    widget_state: TuiWidgetState,
}

impl LogRoute {
    pub fn new() -> Self {
        Self {
            widget_state: TuiWidgetState::new(),
        }
    }
}

impl RouteHandler for LogRoute {
    fn render(&self, frame: &mut Frame, area: Rect, _state: &AppState) {
        let log_widget = TuiLoggerWidget::default()
            .block(
                Block::default()
                    .title(" 📋 Log ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style_error(Style::default().fg(Color::Red))
            .style_warn(Style::default().fg(Color::Yellow))
            .style_info(Style::default().fg(Color::Cyan))
            .style_debug(Style::default().fg(Color::Green))
            .state(&self.widget_state);

        frame.render_widget(log_widget, area);
    }

    fn handle_input(
        &mut self,
        key: KeyCode,
        _state: &mut AppState,
        _handle: &EngineHandle,
    ) -> anyhow::Result<RouteAction> {
        match key {
            KeyCode::Up => self.widget_state.transition(TuiWidgetEvent::UpKey),
            KeyCode::Down => self.widget_state.transition(TuiWidgetEvent::DownKey),
            KeyCode::PageUp => self.widget_state.transition(TuiWidgetEvent::PrevPageKey),
            KeyCode::PageDown => self.widget_state.transition(TuiWidgetEvent::NextPageKey),
            KeyCode::Esc => self.widget_state.transition(TuiWidgetEvent::EscapeKey),
            _ => {}
        }
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "Log"
    }

    fn help_items(&self, _state: &AppState) -> Vec<(&str, &str)> {
        vec![
            ("↑/↓", "Scroll"),
            ("PgUp/PgDn", "Page"),
            ("Esc", "Follow tail"),
            ("Tab", "Switch Tab"),
            ("Q", "Quit"),
        ]
    }
}
