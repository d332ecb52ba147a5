//! Command handlers, one module per subcommand group.

pub mod endpoints;
pub mod export;
pub mod instances;
pub mod login;
pub mod overview;
pub mod usage;
