//! Configuration for the Typesense indexer binary.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{Cli, Command, QueryArgs, Settings, Task};
