pub mod directory;
pub mod password;
pub mod session;

pub use directory::AccountDirectory;
pub use session::{ensure_sessions_available, open_session};
