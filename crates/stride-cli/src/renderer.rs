//! Terminal rendering for markdown output.
//!
//! Rich mode styles headers, quotes and task checkboxes with termimad; plain
//! mode prints the markdown untouched.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

const DONE_MARK: &str = "- [x] ";
const OPEN_MARK: &str = "- [ ] ";

/// Renders markdown produced by the display types.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::DarkGrey);
        skin.quote_mark.set_fg(Color::Red);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            if line.starts_with('#') {
                // keep the hashes so ids stay visible next to titles
                println!("\x1b[36m{line}\x1b[0m");
            } else if let Some(task) = line.strip_prefix(DONE_MARK) {
                print!("\x1b[32m✔\x1b[0m ");
                self.skin.print_inline(task);
                println!();
            } else if let Some(task) = line.strip_prefix(OPEN_MARK) {
                print!("☐ ");
                self.skin.print_inline(task);
                println!();
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
