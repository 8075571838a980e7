pub mod init;
pub mod loader;

pub use init::setup;
pub use loader::{load_nodes, read_nodes};
