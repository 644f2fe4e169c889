pub mod auth;
pub mod dispatch;
pub mod list;
pub mod shared;
pub mod watch;
pub mod whoami;
pub mod write;
