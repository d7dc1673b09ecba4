//! Non-blocking operator input.
//!
//! The tick loop never waits on the operator. It asks an [`InputSource`]
//! for at most one line per poll and gets back one of three answers:
//! a line, nothing yet, or the stream has closed.
//!
//! [`spawn_line_reader`] runs the blocking line reads on a dedicated OS
//! thread and forwards each line into a bounded channel, which
//! [`ChannelInput`] drains with `try_recv`. A plain thread is used instead
//! of `tokio::io::stdin` because a pending stdin read cannot be cancelled
//! and would hold up runtime shutdown.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader};

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, warn};

/// Default number of operator lines buffered between reader and tick loop.
pub const DEFAULT_INPUT_CAPACITY: usize = 32;

/// Outcome of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinePoll {
    /// A complete line (without its terminator).
    Line(String),
    /// No line is available right now.
    Empty,
    /// The input stream has ended; no more lines will arrive.
    Closed,
}

/// A source of operator command lines.
pub trait InputSource {
    /// Try to take one line without blocking.
    fn try_read_line(&mut self) -> LinePoll;
}

// ---------------------------------------------------------------------------
// Channel-backed input
// ---------------------------------------------------------------------------

/// Input fed by a channel of raw lines.
///
/// Lines still queued when the sender is dropped are delivered before
/// [`LinePoll::Closed`] is reported.
#[derive(Debug)]
pub struct ChannelInput {
    rx: mpsc::Receiver<String>,
}

impl ChannelInput {
    /// Wrap an existing receiver.
    pub const fn new(rx: mpsc::Receiver<String>) -> Self {
        Self { rx }
    }

    /// Create a connected sender/input pair with the given buffer size.
    pub fn pair(capacity: usize) -> (mpsc::Sender<String>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self::new(rx))
    }
}

impl InputSource for ChannelInput {
    fn try_read_line(&mut self) -> LinePoll {
        match self.rx.try_recv() {
            Ok(line) => LinePoll::Line(line),
            Err(TryRecvError::Empty) => LinePoll::Empty,
            Err(TryRecvError::Disconnected) => LinePoll::Closed,
        }
    }
}

/// Spawn a reader thread that forwards every line of `reader` into a new
/// [`ChannelInput`].
///
/// Lines are decoded lossily, so bytes that are not valid UTF-8 reach the
/// tick loop as an unrecognized command instead of ending the stream. The
/// thread exits on end of input, on a read error, or when the input is
/// dropped. In each case the channel closes and the tick loop observes
/// [`LinePoll::Closed`].
///
/// # Errors
///
/// Returns an I/O error if the OS refuses to spawn the thread.
pub fn spawn_line_reader<R>(mut reader: R, capacity: usize) -> io::Result<ChannelInput>
where
    R: BufRead + Send + 'static,
{
    let (tx, input) = ChannelInput::pair(capacity);
    std::thread::Builder::new()
        .name("hil-input".to_owned())
        .spawn(move || {
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => {
                        debug!("operator input reached end of stream");
                        return;
                    }
                    Ok(_) => {
                        if tx.blocking_send(decode_line(&buf)).is_err() {
                            debug!("tick loop dropped operator input");
                            return;
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        warn!(error = %e, "operator input read failed, closing input");
                        return;
                    }
                }
            }
        })?;
    Ok(input)
}

/// Strip the line terminator and decode, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Spawn a reader thread over the process's standard input.
///
/// # Errors
///
/// Returns an I/O error if the reader thread cannot be spawned.
pub fn spawn_stdin_reader() -> io::Result<ChannelInput> {
    spawn_line_reader(BufReader::new(io::stdin()), DEFAULT_INPUT_CAPACITY)
}

// ---------------------------------------------------------------------------
// Scripted input
// ---------------------------------------------------------------------------

/// Input that replays a fixed sequence of poll outcomes, one per poll.
///
/// Once the script is exhausted every poll returns the configured tail
/// outcome ([`LinePoll::Empty`] by default). Useful for deterministic runs
/// where commands must land on specific polls.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<LinePoll>,
    close_when_done: bool,
    polls: u64,
}

impl ScriptedInput {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a line for the next unscripted poll.
    #[must_use]
    pub fn line(mut self, line: &str) -> Self {
        self.script.push_back(LinePoll::Line(line.to_owned()));
        self
    }

    /// Queue `count` polls that see no input.
    #[must_use]
    pub fn idle(mut self, count: usize) -> Self {
        self.script
            .extend(std::iter::repeat_n(LinePoll::Empty, count));
        self
    }

    /// Report [`LinePoll::Closed`] once the script runs out.
    #[must_use]
    pub const fn then_close(mut self) -> Self {
        self.close_when_done = true;
        self
    }

    /// Number of polls served so far.
    pub const fn polls(&self) -> u64 {
        self.polls
    }
}

impl InputSource for ScriptedInput {
    fn try_read_line(&mut self) -> LinePoll {
        self.polls = self.polls.saturating_add(1);
        match self.script.pop_front() {
            Some(outcome) => outcome,
            None if self.close_when_done => LinePoll::Closed,
            None => LinePoll::Empty,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use super::*;

    /// Poll until something other than `Empty` shows up, or give up.
    fn next_non_empty(input: &mut ChannelInput) -> LinePoll {
        for _ in 0..2_000 {
            match input.try_read_line() {
                LinePoll::Empty => std::thread::sleep(Duration::from_millis(1)),
                other => return other,
            }
        }
        LinePoll::Empty
    }

    #[test]
    fn empty_channel_returns_immediately() {
        let (_tx, mut input) = ChannelInput::pair(4);
        assert_eq!(input.try_read_line(), LinePoll::Empty);
    }

    #[test]
    fn one_line_per_poll() {
        let (tx, mut input) = ChannelInput::pair(4);
        tx.try_send("pause".to_owned()).unwrap();
        tx.try_send("resume".to_owned()).unwrap();

        assert_eq!(input.try_read_line(), LinePoll::Line("pause".to_owned()));
        assert_eq!(input.try_read_line(), LinePoll::Line("resume".to_owned()));
        assert_eq!(input.try_read_line(), LinePoll::Empty);
    }

    #[test]
    fn queued_lines_drain_before_close() {
        let (tx, mut input) = ChannelInput::pair(4);
        tx.try_send("stop".to_owned()).unwrap();
        drop(tx);

        assert_eq!(input.try_read_line(), LinePoll::Line("stop".to_owned()));
        assert_eq!(input.try_read_line(), LinePoll::Closed);
        assert_eq!(input.try_read_line(), LinePoll::Closed);
    }

    #[test]
    fn reader_thread_forwards_lines_then_closes() {
        let mut input = spawn_line_reader(Cursor::new("amp 2\nfreq 1\n"), 4).unwrap();

        assert_eq!(next_non_empty(&mut input), LinePoll::Line("amp 2".to_owned()));
        assert_eq!(next_non_empty(&mut input), LinePoll::Line("freq 1".to_owned()));
        assert_eq!(next_non_empty(&mut input), LinePoll::Closed);
    }

    #[test]
    fn reader_thread_survives_invalid_utf8() {
        let mut input = spawn_line_reader(Cursor::new(b"\xffbad\namp 2\n".to_vec()), 4).unwrap();

        let first = next_non_empty(&mut input);
        assert!(
            matches!(&first, LinePoll::Line(line) if line.ends_with("bad")),
            "got {first:?}"
        );
        assert_eq!(next_non_empty(&mut input), LinePoll::Line("amp 2".to_owned()));
        assert_eq!(next_non_empty(&mut input), LinePoll::Closed);
    }

    #[test]
    fn reader_thread_strips_crlf_and_keeps_unterminated_tail() {
        let mut input = spawn_line_reader(Cursor::new("pause\r\nstop"), 4).unwrap();

        assert_eq!(next_non_empty(&mut input), LinePoll::Line("pause".to_owned()));
        assert_eq!(next_non_empty(&mut input), LinePoll::Line("stop".to_owned()));
        assert_eq!(next_non_empty(&mut input), LinePoll::Closed);
    }

    #[test]
    fn reader_thread_on_empty_stream_closes() {
        let mut input = spawn_line_reader(Cursor::new(""), 1).unwrap();
        assert_eq!(next_non_empty(&mut input), LinePoll::Closed);
    }

    #[test]
    fn scripted_input_replays_in_order() {
        let mut input = ScriptedInput::new().idle(2).line("pause").then_close();

        assert_eq!(input.try_read_line(), LinePoll::Empty);
        assert_eq!(input.try_read_line(), LinePoll::Empty);
        assert_eq!(input.try_read_line(), LinePoll::Line("pause".to_owned()));
        assert_eq!(input.try_read_line(), LinePoll::Closed);
        assert_eq!(input.polls(), 4);
    }

    #[test]
    fn scripted_input_defaults_to_empty_tail() {
        let mut input = ScriptedInput::new();
        assert_eq!(input.try_read_line(), LinePoll::Empty);
        assert_eq!(input.try_read_line(), LinePoll::Empty);
    }
}
