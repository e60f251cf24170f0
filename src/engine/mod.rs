pub mod filter;
pub mod layout;
pub mod tracker;

pub use layout::Viewport;
pub use tracker::Signal;
