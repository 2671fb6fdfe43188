//! One module per subcommand. Handlers take parsed arguments plus the shared
//! global flags, configuration and output manager.

pub mod completions;
pub mod config;
pub mod delete;
pub mod detect;
pub mod field_types;
pub mod generate;
pub mod init;
pub mod list;
pub mod migrate;
pub mod rename;
pub mod show;
