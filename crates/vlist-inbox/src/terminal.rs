#![forbid(unsafe_code)]

//! Interactive terminal session.
//!
//! [`TerminalSession`] enters raw mode, the alternate screen and mouse
//! capture, and undoes all three on drop or from the panic hook.
//! [`run`] is the event loop: read an event, map it to an [`Action`],
//! redraw when the app asks for it.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use tracing::{debug, info};
use vlist::{Frame, Presenter};

use crate::app::{Action, InboxApp};
use crate::data::MessageRepository;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Raw mode plus alternate screen and mouse capture, restored on drop.
#[derive(Debug)]
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn new() -> io::Result<Self> {
        install_panic_hook();
        crossterm::terminal::enable_raw_mode()?;
        // From here on Drop restores the terminal.
        let session = Self { _private: () };
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
            crossterm::cursor::MoveTo(0, 0),
            crossterm::event::EnableMouseCapture
        )?;
        info!("terminal session started");
        Ok(session)
    }

    /// Terminal size, never smaller than 2x2.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let (w, h) = crossterm::terminal::size()?;
        Ok((w.max(2), h.max(2)))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
        info!("terminal session ended");
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
    });
}

fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(
        stdout,
        crossterm::event::DisableMouseCapture,
        crossterm::cursor::Show,
        crossterm::terminal::LeaveAlternateScreen
    );
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

/// Map a key or wheel event to an action. Clicks need the frame's hit grid
/// and are resolved in [`run`].
pub fn action_for(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => key_action(key),
        Event::Mouse(mouse) => wheel_action(mouse),
        Event::Resize(width, height) => Some(Action::Resize {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

fn key_action(key: &KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Action::Quit,
        KeyCode::Char('f') if ctrl => Action::ToggleFollow,
        KeyCode::Char(ch) if !ctrl => Action::SearchInput(ch),
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Esc => Action::SearchClear,
        KeyCode::Up => Action::SelectPrevious,
        KeyCode::Down => Action::SelectNext,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::Tab => Action::ToggleFlag,
        _ => return None,
    };
    Some(action)
}

fn wheel_action(mouse: &MouseEvent) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::ScrollDown => Some(Action::ScrollLines(1)),
        MouseEventKind::ScrollUp => Some(Action::ScrollLines(-1)),
        _ => None,
    }
}

/// Run `app` until it quits.
pub fn run<R: MessageRepository>(app: &mut InboxApp<R>) -> io::Result<()> {
    let session = TerminalSession::new()?;
    let (width, height) = session.size()?;
    app.apply(Action::Resize { width, height });

    let mut presenter = Presenter::new(io::stdout());
    let mut frame = Frame::with_hit_grid(width, height);
    let mut dirty = true;

    while !app.should_quit() {
        if dirty {
            frame.clear();
            app.view(&mut frame);
            let written = presenter.present(&frame.buffer, frame.cursor)?;
            debug!(cells = written, "frame presented");
            dirty = false;
        }
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let event = event::read()?;
        let action = match &event {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => frame.hit_test(*column, *row).map(Action::Click),
            _ => action_for(&event),
        };
        let Some(action) = action else {
            continue;
        };
        if let Action::Resize { width, height } = action {
            frame = Frame::with_hit_grid(width, height);
            presenter.invalidate();
        }
        dirty |= app.apply(action);
    }
    drop(session);
    Ok(())
}
