//! Background archival of signed sessions.
//!
//! Finalize must not wait on the filesystem or on notifications. It only
//! writes the `FinalizedSignature` to [`outbox`] inside its transaction and
//! wakes the worker, which writes the receipt and records the outcome in
//! [`state::ArchiveState`].

pub mod outbox;
pub mod state;
