pub mod commands;
mod session;

pub use session::SessionManager;
