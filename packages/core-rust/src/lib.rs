//! Noodlebar core: menu and order event contracts, the tagged message envelope, and clocks.

pub mod clock;
pub mod messages;

pub use clock::{ClockSource, FixedClock, SystemClock};
pub use messages::{decode, encode, CodecError, Message};
