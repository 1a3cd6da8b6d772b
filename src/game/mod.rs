//! Game state machine, deferred-task scheduling, and the render contract.

pub mod machine;
pub(crate) mod scheduler;
pub mod view;

pub use machine::{CollectedPair, GamePhase, MemoryGame};
pub use view::{CardFace, GridSlot};
