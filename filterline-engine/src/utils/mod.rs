pub mod pad;
pub mod preview;

pub use pad::pad_with_blank;
pub use preview::short_preview;
