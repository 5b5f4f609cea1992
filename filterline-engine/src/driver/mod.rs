//! 流式驱动：把行规则引擎套在读写流之上
pub mod cancel;
pub mod stream;

#[cfg(feature = "async-io")]
pub mod async_stream;

pub use cancel::CancelFlag;
pub use stream::{LineStreamer, StreamStats};
