//! Display payload for the calculator surface

use super::buttons::LAYOUT;
use super::SessionStatus;
use serde::Serialize;

pub const TITLE: &str = "Calculator";

/// Embed accent colour (blurple)
pub const ACCENT: u32 = 0x5865_F2;

/// What the host needs to redraw the calculator message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayPayload {
    pub title: String,
    pub body: String,
    pub accent: u32,
    pub buttons: Vec<ButtonView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    pub label: String,
    pub row: u8,
    pub enabled: bool,
}

#[cfg(test)]
impl DisplayPayload {
    /// Labels of the buttons the host should accept presses for
    pub fn enabled_labels(&self) -> impl Iterator<Item = &str> {
        self.buttons
            .iter()
            .filter(|b| b.enabled)
            .map(|b| b.label.as_str())
    }
}

/// Render the calculator. Pure: the same expression and status always give
/// the same payload.
pub fn render(expression: &str, status: SessionStatus) -> DisplayPayload {
    let active = status == SessionStatus::Active;
    let buttons = LAYOUT
        .iter()
        .map(|spec| ButtonView {
            label: spec.label.to_string(),
            row: spec.row,
            enabled: active && !spec.operation.is_noop(),
        })
        .collect();

    DisplayPayload {
        title: TITLE.to_string(),
        body: format!("```{expression}```"),
        accent: ACCENT,
        buttons,
    }
}
