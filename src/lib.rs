pub mod assets;
pub mod compute;
pub mod display;
pub mod entities;
pub mod error;
pub mod fleet;
pub mod input;
pub mod settings;
