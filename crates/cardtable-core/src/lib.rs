//! Cardtable - client-side state mirror for a networked card game
//!
//! This crate keeps the per-player view of a game (players, zones, cards and
//! counters) in step with the server:
//! - The server's ordered event stream is the only thing that mutates state
//! - Local actions are validated and turned into outbound intents
//! - Every applied event returns the notifications the UI should show
//!
//! # Architecture
//!
//! The engine is synchronous and transport-agnostic. It can be driven by:
//! - A native client that owns the network connection
//! - WebAssembly for a browser front end (feature `wasm`)
//!
//! # Modules
//!
//! - [`game`]: Event routing and the session state machine
//! - [`player`] / [`registry`]: Players and the table roster
//! - [`zone`] / [`layout`]: Card collections and their geometry
//! - [`dispatcher`]: Local action validation

pub mod actions;
pub mod card;
pub mod config;
pub mod counter;
pub mod dispatcher;
pub mod events;
pub mod game;
pub mod layout;
pub mod player;
pub mod registry;
#[cfg(feature = "wasm")]
pub mod wasm;
pub mod zone;

// Re-export commonly used types
pub use actions::{Intent, UserAction};
pub use card::{CardId, CardItem, Position};
pub use config::{ConfigError, CounterSpec, DiceConfig, GameConfig, ZoneSpec};
pub use counter::Counter;
pub use dispatcher::{ActionDispatcher, CardCatalog, LocalValidationError, OpenCatalog};
pub use events::{CardAttr, DrawnCard, EventKind, Notification, RawEvent, RosterEntry, ServerEvent};
pub use game::{GamePhase, GameStateMachine, ProtocolError};
pub use player::{Player, PlayerId};
pub use registry::PlayerRegistry;
pub use zone::{LayoutKind, Visibility, Zone};
