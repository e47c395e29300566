//! Actor Model: Message-passing between the producer and the display.
//!
//! This module implements a small actor system on crossbeam channels:
//! - **Writer**: Owned by the transport; validates and applies fragments
//! - **Reader**: Owned by the display; mirrors the writer without blocking
//! - **Ticker**: Emits frame ticks that set the render cadence
//! - **Presenter**: Polls the reader once per tick and redraws when dirty
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   StreamUpdate   ┌──────────────┐      Tick      ┌──────────────┐
//! │ StreamWriter │ ───────────────▶ │ StreamReader │ ◀───────────── │ Ticker Thread│
//! └──────────────┘                  └──────────────┘                └──────────────┘
//!        ▲                                 │ Snapshot
//!        │ Fragment                        ▼
//! ┌──────────────┐                  ┌──────────────┐
//! │  Transport   │                  │  Presenter   │ ──▶ terminal
//! └──────────────┘                  └──────────────┘
//! ```

mod channel;
mod messages;
mod presenter;
mod ticker;

pub use channel::{stream_channel, stream_channel_with_config, StreamReader, StreamWriter};
pub use messages::StreamUpdate;
pub use presenter::{PresentStats, Presenter, PresenterConfig};
pub use ticker::{Tick, TickerActor};
