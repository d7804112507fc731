//! Interactive terminal checklist
//!
//! [`Checklist`] holds the state and rendering and is driven by key events;
//! [`prompt_multiselect`] runs it against the real terminal in raw mode.

use crate::error::Result;
use crate::set::Set;
use crossterm::cursor::{Hide, MoveToPreviousLine, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use std::io::{self, Write};

const HELP_LINES: [&str; 4] = [
    "up/down (arrow keys): navigate;",
    "space: select/unselect;",
    "enter: confirm selection;",
    "q or esc: quit.",
];

/// Selection made in a checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiselectOutcome {
    /// Indices into the option list
    pub selected: Set<usize>,
    /// `true` when confirmed with enter, `false` when the user quit
    pub submitted: bool,
}

#[derive(Debug, Clone)]
pub struct Checklist {
    heading: String,
    options: Vec<String>,
    /// `None` once the checklist has finished
    cursor: Option<usize>,
    selected: Set<usize>,
    show_help: bool,
    submitted: bool,
}

impl Checklist {
    pub fn new(heading: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            options,
            cursor: Some(0),
            selected: Set::new(),
            show_help: true,
            submitted: false,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected(&self) -> &Set<usize> {
        &self.selected
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_none()
    }

    /// Apply a key press. Returns `true` once the checklist is finished.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return self.is_finished();
        }
        let Some(cursor) = self.cursor else {
            return true;
        };

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Esc | KeyCode::Char('q') => self.quit(),
            KeyCode::Enter => {
                self.finish();
                self.submitted = true;
            }
            KeyCode::Char(' ') if !self.options.is_empty() => self.selected.toggle(cursor),
            KeyCode::Up if cursor > 0 => self.cursor = Some(cursor - 1),
            KeyCode::Down if cursor + 1 < self.options.len() => self.cursor = Some(cursor + 1),
            _ => {}
        }

        self.is_finished()
    }

    fn quit(&mut self) {
        self.finish();
        self.selected.clear();
    }

    fn finish(&mut self) {
        self.cursor = None;
        self.show_help = false;
    }

    /// Current view, one `\n`-terminated line per row
    pub fn render(&self) -> String {
        let mut view = String::new();

        view.push_str(&self.heading);
        view.push('\n');

        for (i, option) in self.options.iter().enumerate() {
            view.push_str(if self.cursor == Some(i) { "> " } else { "  " });
            view.push_str(if self.selected.contains(&i) { "[•] " } else { "[ ] " });
            view.push_str(option);
            view.push('\n');
        }

        view.push('\n');

        if self.show_help {
            for line in HELP_LINES {
                view.push_str(line);
                view.push('\n');
            }
            view.push('\n');
        }

        view
    }

    pub fn into_outcome(self) -> MultiselectOutcome {
        MultiselectOutcome {
            selected: self.selected,
            submitted: self.submitted,
        }
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// Redraw the view in place. Returns the number of lines written.
fn redraw<W: Write>(out: &mut W, checklist: &Checklist, previous_lines: u16) -> io::Result<u16> {
    if previous_lines > 0 {
        queue!(out, MoveToPreviousLine(previous_lines))?;
    }
    queue!(out, Clear(ClearType::FromCursorDown))?;

    let mut lines = 0;
    for line in checklist.render().lines() {
        queue!(out, Print(line), Print("\r\n"))?;
        lines += 1;
    }
    out.flush()?;

    Ok(lines)
}

/// Show a checklist on the terminal and wait for the user to submit or quit
pub fn prompt_multiselect(heading: &str, options: &[String]) -> Result<MultiselectOutcome> {
    let mut checklist = Checklist::new(heading, options.to_vec());
    let mut stdout = io::stdout();

    let guard = RawModeGuard::enable()?;
    execute!(stdout, Hide)?;

    let mut drawn = redraw(&mut stdout, &checklist, 0)?;
    loop {
        if let Event::Key(key) = event::read()? {
            let finished = checklist.handle_key(key);
            drawn = redraw(&mut stdout, &checklist, drawn)?;
            if finished {
                break;
            }
        }
    }
    drop(guard);

    log::debug!(
        "Checklist finished: submitted={}, selected={}",
        checklist.submitted,
        checklist.selected
    );

    Ok(checklist.into_outcome())
}
