pub mod compositor;
pub mod config;
pub mod consts;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod session;
pub mod source;
pub mod upload;
