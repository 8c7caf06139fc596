//! Audio decoding and output.
//!
//! The controller talks to a `DecoderFactory` that binds one `Decoder` per
//! track. `RodioOutput` is the real implementation on top of `rodio`.

mod sink;
mod types;

pub use sink::RodioOutput;
pub use types::{AudioError, Decoder, DecoderFactory};
