//! # Event Bus Module
//!
//! Publish/subscribe change notifications between a designer session (or a
//! playback engine) and whatever renders it.
//!
//! ## Usage
//!
//! ```rust
//! use playkit_core::event_bus::{AppEvent, DiagramEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Diagram]),
//!     |event| println!("redraw after: {}", event.description()),
//! );
//!
//! bus.publish(AppEvent::Diagram(DiagramEvent::Reset));
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
