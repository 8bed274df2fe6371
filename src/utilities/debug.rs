use std::io::{stdout, Stdout, Write};

use crossterm::{cursor, terminal, ExecutableCommand, Result};

use super::snapshot::Snapshot;

/// Redraws the status block in place on the terminal.
pub struct Debug {
    stdout: Stdout,
    lines_drawn: u16,
}

impl Debug {
    pub fn new() -> Self {
        Debug {
            stdout: stdout(),
            lines_drawn: 0,
        }
    }

    pub fn printstatus(&mut self, snapshot: &Snapshot) -> Result<()> {
        if self.lines_drawn > 0 {
            self.stdout.execute(cursor::MoveUp(self.lines_drawn))?;
        }
        self.stdout.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;

        let text = snapshot.to_string();
        write!(self.stdout, "{}", text)?;
        self.stdout.flush()?;
        self.lines_drawn = text.lines().count() as u16;
        Ok(())
    }

    /// Forgets the drawn block so the next redraw starts below other output.
    pub fn detach(&mut self) {
        self.lines_drawn = 0;
    }
}

impl Default for Debug {
    fn default() -> Self {
        Self::new()
    }
}
