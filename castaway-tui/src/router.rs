use anyhow::Result;
use castaway_core::engine::EngineHandle;
use ratatui::crossterm::event::KeyCode;
use ratatui::{Frame, layout::Rect};

use crate::routes::{log::LogRoute, player::PlayerRoute, queue::QueueRoute};
use crate::state::AppState;

/// Trait every route implements; the router dispatches to the active one
pub trait RouteHandler {
    /// Render this route's panel
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);

    /// Handle keyboard input for this route
    fn handle_input(
        &mut self,
        key: KeyCode,
        state: &mut AppState,
        handle: &EngineHandle,
    ) -> Result<RouteAction>;

    /// Display name for the navigation sidebar
    fn name(&self) -> &str;

    /// Key hints shown in the controls footer
    fn help_items(&self, _state: &AppState) -> Vec<(&str, &str)> {
        vec![("Tab", "Switch Tab"), ("Q", "Quit")]
    }
}

/// What should happen after a route handled a key
pub enum RouteAction {
    /// Stay on the current route
    None,
    /// Switch to another route
    Replace(Box<dyn RouteHandler>),
}

/// Holds the active route and applies route actions
pub struct Router {
    current: Box<dyn RouteHandler>,
}

impl Router {
    pub fn new(initial_route: Box<dyn RouteHandler>) -> Self {
        Self {
            current: initial_route,
        }
    }

    pub fn current(&self) -> &dyn RouteHandler {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> &mut Box<dyn RouteHandler> {
        &mut self.current
    }

    pub fn replace(&mut self, route: Box<dyn RouteHandler>) {
        self.current = route;
    }

    pub fn execute_action(&mut self, action: RouteAction) {
        match action {
            RouteAction::None => {}
            RouteAction::Replace(route) => self.replace(route),
        }
    }
}

/// Get a route handler for a given tab name
pub fn route_for_name(name: &str) -> Box<dyn RouteHandler> {
    match name {
        "Player" => Box::new(PlayerRoute),
        "Queue" => Box::new(QueueRoute),
        "Log" => Box::new(LogRoute::new()),
        _ => Box::new(PlayerRoute),
    }
}

/// All tab names in display order
pub fn tab_names() -> &'static [&'static str] {
    &["Player", "Queue", "Log"]
}
