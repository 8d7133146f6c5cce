//! The `Component` trait: the contract every screen implements.

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::screen::ScreenId;

/// A renderable, event-handling unit of the UI.
///
/// Screens receive key events only while active, but data-update
/// actions are delivered to every screen so none renders stale state
/// after a switch.
pub trait Component {
    /// Called once before the first render with a handle for emitting
    /// actions outside the normal event flow.
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        let _ = action_tx;
        Ok(())
    }

    /// Handle a key event. Returning an action feeds it back into the
    /// dispatch loop.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Apply an action to internal state, optionally emitting a
    /// follow-up action.
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Draw the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// Which screen this component is.
    fn id(&self) -> ScreenId;
}
