//! Discord integration for seqbot.
//!
//! - **Gateway** (`gateway`) - trait seam over the platform connection
//! - **Client** (`client`) - `serenity`-backed gateway implementation
//! - **Events** (`events`) - interaction events and the command dispatcher
//! - **Commands** (`commands`) - `/random-sequence` handler
//! - **Session** (`session`) - connect, register, wait, clean up, disconnect
//!
//! ```text
//! Gateway → CommandDispatcher → RandomSequenceHandler → Reply
//!    ↑
//! SessionManager (register / deregister / disconnect)
//! ```

pub mod client;
pub mod commands;
pub mod events;
pub mod gateway;
pub mod session;
