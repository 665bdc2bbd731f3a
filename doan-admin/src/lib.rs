//! Đoàn Admin - text console for the Đoàn membership backend
//!
//! Screens, forms and the command loop controller. The binary in `main.rs`
//! only wires configuration, logging and stdin to [`app::App`].

pub mod app;
pub mod command;
pub mod confirm;
pub mod forms;
pub mod modal;
pub mod notice;
pub mod profile;
pub mod screens;
pub mod shell;
pub mod table;

pub use app::{App, Flow};
pub use command::Command;
pub use shell::Screen;
