//! Animated spinner shown while the model is thinking
//!
//! Draws on stderr and only when stderr is a terminal.

use crossterm::{
    cursor::{Hide, MoveToColumn, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tokio::sync::watch;

/// Spinner animation frames - braille pattern spinner
pub const SPINNER_BRAILLE: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner animation frames - classic ascii
pub const SPINNER_ASCII: [char; 4] = ['|', '/', '-', '\\'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinnerStyle {
    Braille,
    Ascii,
}

pub struct Spinner {
    frames: Vec<String>,
    current_frame: usize,
    message: String,
    frame_duration: Duration,
}

impl Spinner {
    pub fn new(style: SpinnerStyle) -> Self {
        let frames: Vec<String> = match style {
            SpinnerStyle::Braille => SPINNER_BRAILLE.iter().map(|c| c.to_string()).collect(),
            SpinnerStyle::Ascii => SPINNER_ASCII.iter().map(|c| c.to_string()).collect(),
        };

        Self {
            frames,
            current_frame: 0,
            message: String::new(),
            frame_duration: Duration::from_millis(100),
        }
    }

    pub fn with_message(mut self, msg: &str) -> Self {
        self.message = msg.to_string();
        self
    }

    /// Start the spinner (hides cursor)
    pub fn start(&self) {
        let _ = execute!(io::stderr(), Hide);
        self.render();
    }

    /// Stop the spinner (shows cursor, clears line)
    pub fn stop(&self) {
        let _ = execute!(
            io::stderr(),
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Show
        );
    }

    /// Move to the next frame and redraw
    pub fn advance(&mut self) {
        self.current_frame = (self.current_frame + 1) % self.frames.len();
        self.render();
    }

    fn frame(&self) -> &str {
        &self.frames[self.current_frame]
    }

    fn render(&self) {
        let _ = execute!(
            io::stderr(),
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Rgb { r: 140, g: 140, b: 140 }),
            Print(format!("  {} ", self.frame())),
            SetForegroundColor(Color::Rgb { r: 180, g: 180, b: 180 }),
            Print(&self.message),
            ResetColor
        );
        let _ = io::stderr().flush();
    }
}

/// Run `future` to completion while a spinner animates on stderr.
///
/// The spinner task only sees a completion signal, never the result, and
/// clears its line before this returns.
pub async fn spin_while<F>(message: &str, future: F) -> F::Output
where
    F: Future,
{
    if !io::stderr().is_terminal() {
        return future.await;
    }

    let (done_tx, mut done_rx) = watch::channel(false);
    let mut spinner = Spinner::new(SpinnerStyle::Braille).with_message(message);

    let handle = tokio::spawn(async move {
        spinner.start();
        let mut ticker = tokio::time::interval(spinner.frame_duration);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = done_rx.changed() => break,
                _ = ticker.tick() => spinner.advance(),
            }
        }
        spinner.stop();
    });

    let output = future.await;
    let _ = done_tx.send(true);
    let _ = handle.await;
    output
}

/// Print a one-line status message with a check mark
pub fn print_status(msg: &str) {
    let _ = execute!(
        io::stderr(),
        SetForegroundColor(Color::Rgb { r: 140, g: 140, b: 140 }),
        Print("  ✓ "),
        SetForegroundColor(Color::Rgb { r: 180, g: 180, b: 180 }),
        Print(msg),
        ResetColor,
        Print("\n")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_frames() {
        let spinner = Spinner::new(SpinnerStyle::Braille);
        assert_eq!(spinner.frames.len(), SPINNER_BRAILLE.len());
        let spinner = Spinner::new(SpinnerStyle::Ascii);
        assert_eq!(spinner.frame(), "|");
    }

    #[test]
    fn test_frames_wrap_around() {
        let mut spinner = Spinner::new(SpinnerStyle::Ascii);
        for _ in 0..SPINNER_ASCII.len() {
            spinner.advance();
        }
        assert_eq!(spinner.current_frame, 0);
    }

    #[tokio::test]
    async fn test_spin_while_returns_future_output() {
        let value = spin_while("thinking", async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err::<u32, String>("boom".to_string())
        })
        .await;
        assert_eq!(value, Err("boom".to_string()));
    }
}
