//! # PlayKit Core
//!
//! Core types, traits, and utilities for PlayKit.
//! Provides the field constants, error taxonomy, per-session event bus and
//! the clock/timer abstractions that drive playback and autosave.

pub mod clock;
pub mod constants;
pub mod error;
pub mod event_bus;
pub mod types;

pub use clock::{Clock, ManualClock, OneShotTimer, SystemClock};

pub use error::{DesignerError, Error, ExportError, PersistenceError, Result};

pub use event_bus::{
    AppEvent, DiagramEvent, EventBus, EventCategory, EventFilter, ExportEvent, PersistenceEvent,
    PlaybackEvent, SubscriptionId, ToolEvent,
};

pub use types::{shared, Shared};
