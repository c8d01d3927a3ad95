//! Single-line prompt with cooperative cancellation.
//!
//! # Responsibility
//! - Print a coloured prompt and read one line of input.
//! - Turn SIGINT/SIGTERM, Ctrl-C and end-of-input into typed errors the
//!   caller can unwind on.
//!
//! # Invariants
//! - Raw mode is held only while one read is pending and is always
//!   restored, including on error paths.
//! - Nothing in this module exits the process; the signal handler only
//!   flips a [`CancelToken`] that the pending read observes.

use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How often a pending read re-checks the cancel token.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub type PromptResult<T> = Result<T, PromptError>;

#[derive(Debug)]
pub enum PromptError {
    /// Ctrl-C or a termination signal arrived.
    Interrupted,
    /// Input stream ended (EOF, or Ctrl-D on an empty line).
    Closed,
    Io(io::Error),
}

impl PromptError {
    /// Whether this error is the clean end-of-session path (exit status 0).
    pub fn ends_session(&self) -> bool {
        matches!(self, Self::Interrupted | Self::Closed)
    }
}

impl Display for PromptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interrupted => write!(f, "input interrupted"),
            Self::Closed => write!(f, "input closed"),
            Self::Io(err) => write!(f, "terminal i/o failed: {err}"),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PromptError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Source of user answers.
pub trait Prompter {
    /// Shows `message` and returns one line without its trailing newline.
    fn read_line(&mut self, message: &str) -> PromptResult<String>;

    /// Asks a yes/no question. Only `y` or `yes` (any case) count as yes.
    fn confirm(&mut self, message: &str) -> PromptResult<bool> {
        let answer = self.read_line(&format!("{message} (y/n): "))?;
        Ok(is_affirmative(&answer))
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

/// Process-wide cancellation flag shared with the signal handler.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Routes SIGINT and SIGTERM into this token.
    ///
    /// Can only succeed once per process.
    pub fn install_signal_handler(&self) -> Result<(), ctrlc::Error> {
        let token = self.clone();
        ctrlc::set_handler(move || token.cancel())
    }
}

enum InputSource {
    Terminal,
    /// Lines read by a background thread when stdin is not a terminal.
    Piped(Receiver<io::Result<String>>),
}

/// Prompter bound to the process stdin/stdout.
pub struct TerminalPrompter {
    cancel: CancelToken,
    input: InputSource,
}

impl TerminalPrompter {
    pub fn new(cancel: CancelToken) -> Self {
        let input = if io::stdin().is_terminal() {
            InputSource::Terminal
        } else {
            InputSource::Piped(spawn_line_reader())
        };
        Self { cancel, input }
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, message: &str) -> PromptResult<String> {
        if self.cancel.is_cancelled() {
            return Err(PromptError::Interrupted);
        }

        let mut stdout = io::stdout();
        write!(stdout, "{}", message.cyan())?;
        stdout.flush()?;

        match &self.input {
            InputSource::Terminal => read_raw_line(&self.cancel, &mut stdout),
            InputSource::Piped(lines) => {
                let line = read_piped_line(&self.cancel, lines)?;
                writeln!(stdout)?;
                Ok(line)
            }
        }
    }
}

/// Restores cooked mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// What a single key press does to the pending line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Insert(char),
    Erase,
    Clear(usize),
    Submit,
    Interrupt,
    Close,
    Ignore,
}

fn apply_key(line: &mut String, key: KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Interrupt,
        KeyCode::Char('d') if ctrl => {
            if line.is_empty() {
                KeyAction::Close
            } else {
                KeyAction::Ignore
            }
        }
        KeyCode::Char('u') if ctrl => {
            let erased = line.chars().count();
            line.clear();
            KeyAction::Clear(erased)
        }
        KeyCode::Char(_) if ctrl => KeyAction::Ignore,
        KeyCode::Char(c) => {
            line.push(c);
            KeyAction::Insert(c)
        }
        KeyCode::Tab => {
            line.push('\t');
            KeyAction::Insert('\t')
        }
        KeyCode::Backspace => match line.pop() {
            Some(_) => KeyAction::Erase,
            None => KeyAction::Ignore,
        },
        KeyCode::Enter => KeyAction::Submit,
        _ => KeyAction::Ignore,
    }
}

fn read_raw_line(cancel: &CancelToken, out: &mut impl Write) -> PromptResult<String> {
    let _guard = RawModeGuard::enter()?;
    let mut line = String::new();

    loop {
        if cancel.is_cancelled() {
            write!(out, "\r\n")?;
            out.flush()?;
            return Err(PromptError::Interrupted);
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match apply_key(&mut line, key) {
            KeyAction::Insert(c) => write!(out, "{c}")?,
            KeyAction::Erase => write!(out, "\u{8} \u{8}")?,
            KeyAction::Clear(count) => write!(out, "{}", "\u{8} \u{8}".repeat(count))?,
            KeyAction::Submit => {
                write!(out, "\r\n")?;
                out.flush()?;
                return Ok(line);
            }
            KeyAction::Interrupt => {
                cancel.cancel();
                write!(out, "\r\n")?;
                out.flush()?;
                return Err(PromptError::Interrupted);
            }
            KeyAction::Close => {
                write!(out, "\r\n")?;
                out.flush()?;
                return Err(PromptError::Closed);
            }
            KeyAction::Ignore => {}
        }
        out.flush()?;
    }
}

fn spawn_line_reader() -> Receiver<io::Result<String>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn read_piped_line(
    cancel: &CancelToken,
    lines: &Receiver<io::Result<String>>,
) -> PromptResult<String> {
    loop {
        if cancel.is_cancelled() {
            return Err(PromptError::Interrupted);
        }
        match lines.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(line)) => return Ok(line),
            Ok(Err(err)) => return Err(err.into()),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return Err(PromptError::Closed),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{PromptError, PromptResult, Prompter};
    use std::collections::VecDeque;

    /// Replays canned answers and records every prompt shown.
    pub(crate) struct ScriptedPrompter {
        answers: VecDeque<String>,
        pub(crate) prompts: Vec<String>,
    }

    impl ScriptedPrompter {
        pub(crate) fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                prompts: Vec::new(),
            }
        }

        pub(crate) fn remaining(&self) -> usize {
            self.answers.len()
        }
    }

    impl Prompter for ScriptedPrompter {
        fn read_line(&mut self, message: &str) -> PromptResult<String> {
            self.prompts.push(message.to_string());
            self.answers.pop_front().ok_or(PromptError::Closed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedPrompter;
    use super::*;
    use std::sync::mpsc;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn confirm_accepts_only_y_and_yes() {
        for (answer, expected) in [
            ("y", true),
            ("YES", true),
            ("Yes", true),
            ("n", false),
            ("", false),
            ("yep", false),
            (" y", false),
        ] {
            let mut prompter = ScriptedPrompter::new(&[answer]);
            assert_eq!(prompter.confirm("Save?").unwrap(), expected, "{answer:?}");
            assert_eq!(prompter.prompts, vec!["Save? (y/n): "]);
        }
    }

    #[test]
    fn apply_key_edits_the_line() {
        let mut line = String::new();
        let mut press = |code| apply_key(&mut line, key(code, KeyModifiers::NONE));

        assert_eq!(press(KeyCode::Char('a')), KeyAction::Insert('a'));
        assert_eq!(press(KeyCode::Char('b')), KeyAction::Insert('b'));
        assert_eq!(press(KeyCode::Backspace), KeyAction::Erase);
        assert_eq!(press(KeyCode::Left), KeyAction::Ignore);
        assert_eq!(press(KeyCode::Enter), KeyAction::Submit);
        assert_eq!(line, "a");
    }

    #[test]
    fn apply_key_control_sequences() {
        let mut line = String::from("héllo");
        let mut ctrl = |c| apply_key(&mut line, key(KeyCode::Char(c), KeyModifiers::CONTROL));

        assert_eq!(ctrl('d'), KeyAction::Ignore);
        assert_eq!(ctrl('u'), KeyAction::Clear(5));
        assert_eq!(ctrl('d'), KeyAction::Close);
        assert_eq!(ctrl('c'), KeyAction::Interrupt);
        assert_eq!(ctrl('x'), KeyAction::Ignore);
        assert!(line.is_empty());
    }

    #[test]
    fn piped_read_returns_lines_then_closed() {
        let (sender, receiver) = mpsc::channel();
        sender.send(Ok("first".to_string())).unwrap();
        drop(sender);
        let cancel = CancelToken::new();

        assert_eq!(read_piped_line(&cancel, &receiver).unwrap(), "first");
        assert!(matches!(
            read_piped_line(&cancel, &receiver),
            Err(PromptError::Closed)
        ));
    }

    #[test]
    fn piped_read_observes_cancellation() {
        let (sender, receiver) = mpsc::channel::<io::Result<String>>();
        let cancel = CancelToken::new();
        let remote = cancel.clone();

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            remote.cancel();
        });

        let err = read_piped_line(&cancel, &receiver).unwrap_err();
        assert!(matches!(err, PromptError::Interrupted));
        assert!(err.ends_session());
        canceller.join().unwrap();
        drop(sender);
    }

    #[test]
    fn io_errors_do_not_end_the_session_cleanly() {
        let err = PromptError::from(io::Error::other("boom"));
        assert!(!err.ends_session());
        assert!(PromptError::Closed.ends_session());
    }
}
