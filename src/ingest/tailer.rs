use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

/// How much history to replay before following new appends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartMode {
    /// Replay the whole file from the start.
    FromBeginning,
    /// Replay only the last `n` existing lines.
    LastLines(usize),
}

/// Events produced by the tailer thread. Line batches are bounded so a bulk
/// backfill arrives as many small queue events instead of one blocking pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TailEvent {
    Lines(Vec<String>),
    /// The source could not be opened or disappeared mid-stream. Emitted at
    /// most once; the tailer stops producing afterwards.
    SourceError(String),
}

/// Maximum lines per `TailEvent::Lines` batch during backfill.
const BACKFILL_CHUNK_LINES: usize = 500;

/// Sleep between reads once the reader has caught up with the file.
const TAIL_POLL_INTERVAL_MS: u64 = 100;

/// Spawns the tailer thread and returns the receiving end of its event
/// channel. The thread only ever enqueues; it never touches shared state.
pub fn spawn(path: PathBuf, mode: StartMode) -> Receiver<TailEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || run(path, mode, tx));
    rx
}

fn run(path: PathBuf, mode: StartMode, tx: Sender<TailEvent>) {
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            let _ = tx.send(TailEvent::SourceError(format!(
                "cannot open {}: {e}",
                path.display()
            )));
            return;
        }
    };
    let mut reader = BufReader::new(file);

    let Some(partial) = backfill(&mut reader, mode, &tx) else {
        return;
    };

    follow(&path, &mut reader, partial, &tx);
}

/// Replays existing history in bounded chunks. Returns the trailing partial
/// line (a line still being written at backfill time) for the follow loop,
/// or `None` when the receiver is gone or the source failed.
fn backfill(
    reader: &mut BufReader<File>,
    mode: StartMode,
    tx: &Sender<TailEvent>,
) -> Option<String> {
    let mut partial = String::new();
    match mode {
        StartMode::FromBeginning => {
            let mut chunk = Vec::with_capacity(BACKFILL_CHUNK_LINES);
            loop {
                let mut buf = String::new();
                match reader.read_line(&mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        // A line without a trailing newline is still being
                        // written; hand it to the follow loop.
                        if !buf.ends_with('\n') {
                            partial = buf;
                            break;
                        }
                        chunk.push(strip_newline(buf));
                        if chunk.len() >= BACKFILL_CHUNK_LINES {
                            tx.send(TailEvent::Lines(std::mem::take(&mut chunk))).ok()?;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(TailEvent::SourceError(format!("read failed: {e}")));
                        return None;
                    }
                }
            }
            if !chunk.is_empty() {
                tx.send(TailEvent::Lines(chunk)).ok()?;
            }
        }
        StartMode::LastLines(n) => {
            let mut recent: VecDeque<String> = VecDeque::with_capacity(n.min(4096));
            loop {
                let mut buf = String::new();
                match reader.read_line(&mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        if !buf.ends_with('\n') {
                            partial = buf;
                            break;
                        }
                        if recent.len() == n {
                            recent.pop_front();
                        }
                        if n > 0 {
                            recent.push_back(strip_newline(buf));
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(TailEvent::SourceError(format!("read failed: {e}")));
                        return None;
                    }
                }
            }
            let mut lines: Vec<String> = recent.into();
            while !lines.is_empty() {
                let rest = lines.split_off(lines.len().min(BACKFILL_CHUNK_LINES));
                tx.send(TailEvent::Lines(std::mem::replace(&mut lines, rest))).ok()?;
            }
        }
    }
    debug!("backfill complete");
    Some(partial)
}

/// Polls the file for appended data, batching whatever is immediately
/// available into one event per pass.
fn follow(path: &PathBuf, reader: &mut BufReader<File>, partial: String, tx: &Sender<TailEvent>) {
    let mut pending = partial;
    loop {
        let mut batch = Vec::new();
        loop {
            let mut buf = String::new();
            match reader.read_line(&mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    pending.push_str(&buf);
                    if pending.ends_with('\n') {
                        batch.push(strip_newline(std::mem::take(&mut pending)));
                    }
                    // Otherwise the writer is mid-line; keep accumulating.
                }
                Err(e) => {
                    warn!("tail read failed: {e}");
                    let _ = tx.send(TailEvent::SourceError(format!("read failed: {e}")));
                    return;
                }
            }
        }

        if !batch.is_empty() {
            if tx.send(TailEvent::Lines(batch)).is_err() {
                return;
            }
        } else {
            if std::fs::metadata(path).is_err() {
                let _ = tx.send(TailEvent::SourceError(format!(
                    "{} disappeared",
                    path.display()
                )));
                return;
            }
            thread::sleep(Duration::from_millis(TAIL_POLL_INTERVAL_MS));
        }
    }
}

fn strip_newline(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
