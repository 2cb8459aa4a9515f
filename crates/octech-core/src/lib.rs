pub mod appointments;
pub mod booking;
pub mod clients;
pub mod config;
pub mod conversation;
pub mod fixtures;
pub mod responder;

pub use appointments::*;
pub use booking::*;
pub use clients::*;
pub use config::*;
pub use conversation::*;
pub use responder::{respond, Reply, ReplyKind};
