use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    terminal::{self, Clear, ClearType},
    ExecutableCommand,
};
use std::io;

/// Rows reserved for table header and borders
const RESERVED_ROWS: u16 = 2;
const FALLBACK_ROWS: usize = 20;

/// Number of table rows that fit on the terminal
pub fn terminal_rows() -> usize {
    match terminal::size() {
        Ok((_, rows)) if rows > RESERVED_ROWS => (rows - RESERVED_ROWS) as usize,
        _ => FALLBACK_ROWS,
    }
}

/// Clear the screen and home the cursor
pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(Clear(ClearType::All))?;
    stdout.execute(MoveTo(0, 0))?;
    Ok(())
}
