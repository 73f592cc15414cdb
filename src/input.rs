//! Keyboard and mouse bindings.
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEventKind;

use crate::range::Range;
use crate::ui::Target;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Select(Range),
    NextRange,
    PreviousRange,
    /// Move the readout one sample, forward if true
    Step(bool),
    Reload,
    /// Show the readout of the sample at given index
    Hover(usize),
    /// Return the readout to the latest price
    Leave,
    Quit,
}

pub fn command(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('r') => Some(Command::Reload),
        KeyCode::Char(c @ '1'..='7') => {
            let position = c as usize - '1' as usize;
            Some(Command::Select(Range::ALL[position]))
        }
        KeyCode::Tab => Some(Command::NextRange),
        KeyCode::BackTab => Some(Command::PreviousRange),
        KeyCode::Left => Some(Command::Step(false)),
        KeyCode::Right => Some(Command::Step(true)),
        _ => None,
    }
}

/// Command for a mouse event over `target`.
///
/// Leaving the plot by moving or dragging only matters while `hovering`.
pub fn pointer(target: Target, kind: MouseEventKind, hovering: bool) -> Option<Command> {
    let moving = matches!(kind, MouseEventKind::Moved | MouseEventKind::Drag(_));
    match target {
        Target::Button(range) if kind == MouseEventKind::Down(MouseButton::Left) => {
            Some(Command::Select(range))
        }
        Target::Sample(index) if moving => Some(Command::Hover(index)),
        Target::Sample(_) => None,
        Target::Button(_) | Target::Outside if moving && hovering => Some(Command::Leave),
        _ => None,
    }
}
