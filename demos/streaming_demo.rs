//! Streaming Demo: Simulates an LLM response arriving at ~100 tokens/s.
//!
//! A producer thread pushes fragments (with the occasional redelivery, as
//! a retrying transport would) while the presenter redraws at 60 FPS.
//!
//! Run with `RUST_LOG=debug` to see fragments being coalesced.

use flywheel_stream::{
    stream_channel, MessageConfig, Presenter, PresenterConfig, StreamingMessage,
};
use std::io;
use std::thread;
use std::time::Duration;

/// Sample text to stream (simulating an LLM response).
const SAMPLE_TEXT: &str = "Streaming text arrives as many small fragments. \
Each one carries a sequence index, so a redelivered fragment is ignored \
and a missing one is reported instead of guessed.\n\n\
The display never renders per token. It wakes once per frame, takes a \
snapshot if anything changed, and draws it. When the stream ends, the \
caret disappears in that same frame.";

fn main() -> io::Result<()> {
    env_logger::init();

    let width = crossterm::terminal::size().map_or(80, |(w, _)| w);
    let (mut writer, reader) = stream_channel();

    let message = StreamingMessage::new(MessageConfig {
        width,
        ..MessageConfig::default()
    });
    let presenter = Presenter::spawn(reader, message, io::stdout(), PresenterConfig::default())?;

    let producer = thread::spawn(move || {
        let words: Vec<&str> = SAMPLE_TEXT.split_inclusive(' ').collect();
        for (i, word) in words.iter().enumerate() {
            let index = i as u64;
            if let Err(e) = writer.append_text(index, *word) {
                writer.fail(e.to_string());
                return;
            }
            // Every seventh fragment is delivered twice.
            if i % 7 == 6 {
                let _ = writer.append_text(index, *word);
            }
            thread::sleep(Duration::from_millis(10));
        }
        writer.finalize();
    });

    producer
        .join()
        .map_err(|_| io::Error::other("producer thread panicked"))?;
    let (_, stats) = presenter.join()?;

    println!();
    println!(
        "Done: {} updates drawn in {} frames over {} ticks.",
        stats.updates, stats.renders, stats.ticks
    );

    Ok(())
}
