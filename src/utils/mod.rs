pub mod logging;
pub mod ring;

pub use ring::RingBuffer;
