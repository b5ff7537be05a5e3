pub mod config;
pub mod crop;
pub mod info;
pub mod preview;
pub mod session;
