pub mod engine;
pub mod payloads;
pub mod views;

pub use engine::Engine;
pub use payloads::WriteMode;
