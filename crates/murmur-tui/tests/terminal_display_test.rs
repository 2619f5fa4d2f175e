//! Terminal display under concurrent output.
//!
//! Inbound messages are shown from the dispatcher task while the operator is
//! typing. No interleaving may corrupt a message or lose a typed character.

use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
    thread,
};

use murmur_app::{Screen, Session};
use murmur_tui::{KeyInput, LineEdit, TerminalDisplay};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn typing_survives_concurrent_messages() {
    let capture = Capture::default();
    let session = Arc::new(Session::new("alice", false, false));
    let display = Arc::new(TerminalDisplay::new(session, capture.clone()));

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let display = Arc::clone(&display);
            thread::spawn(move || {
                for i in 0..50 {
                    display.show(&format!("<peer{w}> message {i}"));
                }
            })
        })
        .collect();

    let typed = "the quick brown fox";
    for c in typed.chars() {
        display.edit(KeyInput::Char(c));
    }
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(display.pending_input(), typed);
    assert_eq!(display.edit(KeyInput::Enter), LineEdit::Submitted(typed.to_string()));

    let out = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
    for w in 0..4 {
        for i in 0..50 {
            assert!(out.contains(&format!("<peer{w}> message {i}\r\n")));
        }
    }
}
