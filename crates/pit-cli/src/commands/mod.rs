//! Command implementations for pit-cli

pub mod add;
pub mod clone;
pub mod init;
pub mod list;
pub mod push;
pub mod status;

pub use add::run_add;
pub use clone::run_clone;
pub use init::run_init;
pub use list::run_list;
pub use push::run_push;
pub use status::run_status;
