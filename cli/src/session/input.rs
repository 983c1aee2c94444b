//! # Chatterm Session Input
//!
//! File: cli/src/session/input.rs
//!
//! ## Overview
//!
//! Line input for the session loop.
//!
//! Standard input is read on a plain OS thread, outside the runtime's blocking
//! pool, and forwarded over a bounded channel. Runtime shutdown never waits on
//! a pending read.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;
use tracing::debug;

/// Lines buffered ahead of the session loop.
const INPUT_BUFFER: usize = 16;

/// Receiving side of the input channel. Closure of the channel means end of input.
pub type LineReceiver = mpsc::Receiver<io::Result<String>>;

/// Starts the stdin reader thread.
pub fn spawn_stdin_reader() -> io::Result<LineReceiver> {
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || forward_lines(io::stdin().lock(), &tx))?;
    Ok(rx)
}

/// Sends each line of `reader` to `tx` until end of input, the first read
/// error (which is forwarded), or the receiver going away.
pub fn forward_lines<R: BufRead>(reader: R, tx: &mpsc::Sender<io::Result<String>>) {
    for line in reader.lines() {
        let failed = line.is_err();
        if tx.blocking_send(line).is_err() {
            debug!("Input receiver dropped; stopping reader.");
            return;
        }
        if failed {
            return;
        }
    }
    debug!("Reached end of input.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_forward_lines_then_close() {
        let (tx, mut rx) = mpsc::channel(INPUT_BUFFER);
        forward_lines(Cursor::new("hello\n\nexit\n"), &tx);
        drop(tx);

        let mut lines = Vec::new();
        while let Some(line) = rx.blocking_recv() {
            lines.push(line.unwrap());
        }
        assert_eq!(lines, vec!["hello", "", "exit"]);
    }

    #[test]
    fn test_forward_lines_stops_after_read_error() {
        let (tx, mut rx) = mpsc::channel(INPUT_BUFFER);
        // Invalid UTF-8 on the second line.
        forward_lines(Cursor::new(b"ok\n\xff\xfe\nnever\n".to_vec()), &tx);
        drop(tx);

        assert_eq!(rx.blocking_recv().unwrap().unwrap(), "ok");
        assert!(rx.blocking_recv().unwrap().is_err());
        assert!(rx.blocking_recv().is_none());
    }
}
