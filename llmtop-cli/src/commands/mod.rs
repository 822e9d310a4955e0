//! One-shot CLI subcommands

mod list;

pub use list::run_list;
