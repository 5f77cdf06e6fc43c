use std::io::{self, stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyEvent, KeyEventKind};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};

/// Terminal column/row.
pub type ScreenPos = (u16, u16);

pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: ScreenPos,
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout: stdout(), screen, current_msg: None })
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()
    }

    pub fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn read_key_blocking(&self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(ev);
                }
            }
        }
    }

    /// Key presses that arrived since the last call, oldest first.
    pub fn read_key_events_queue(&self) -> io::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                if ev.kind == KeyEventKind::Press {
                    events.push(ev);
                }
            }
        }

        Ok(events)
    }

    pub fn size(&self) -> ScreenPos {
        (self.width, self.height)
    }

    /// Frames the area of `size` cells whose top-left cell is `inner`.
    pub fn draw_borders(&mut self, inner: ScreenPos, size: ScreenPos) -> io::Result<()> {
        let (left, top) = (inner.0 - 1, inner.1 - 1);
        let (right, bottom) = (inner.0 + size.0, inner.1 + size.1);

        for x in left..=right {
            let ch = if x == left || x == right { '+' } else { '-' };
            self.print_at((x, top), ch)?;
            self.print_at((x, bottom), ch)?;
        }

        for y in inner.1..bottom {
            self.print_at((left, y), '|')?;
            self.print_at((right, y), '|')?;
        }

        self.flush()
    }

    /// Writes `text` starting at `pos`, clipped to the screen width.
    pub fn print_str_at(&mut self, pos: ScreenPos, text: &str) -> io::Result<()> {
        for (i, ch) in text.chars().enumerate() {
            let x = pos.0 as usize + i;
            if x >= self.width as usize {
                break;
            }
            self.print_at((x as u16, pos.1), ch)?;
        }
        Ok(())
    }

    pub fn show_message(&mut self, lines: &[&str]) -> io::Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap_or(0) + 2) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), ch)?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.flush()
    }

    pub fn hide_message(&mut self) -> io::Result<()> {
        let Some(msg) = self.current_msg.take() else {
            return Ok(());
        };

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                if x < self.width && y < self.height {
                    let ch = self.screen[self.width as usize * y as usize + x as usize];
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: ScreenPos, ch: char) -> io::Result<()> {
        let idx = self.width as usize * pos.1 as usize + pos.0 as usize;
        if self.screen.get(idx) == Some(&ch) {
            return Ok(());
        }

        // Keep a message on top of whatever is drawn underneath it
        if !self.covered_by_message(pos) {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        }
        if let Some(cell) = self.screen.get_mut(idx) {
            *cell = ch;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn covered_by_message(&self, pos: ScreenPos) -> bool {
        self.current_msg.as_ref().is_some_and(|msg| {
            (msg.top_left.0..msg.top_left.0 + msg.width).contains(&pos.0)
                && (msg.top_left.1..msg.top_left.1 + msg.height).contains(&pos.1)
        })
    }

    fn print_at_no_save(&mut self, pos: ScreenPos, ch: char) -> io::Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }
}
