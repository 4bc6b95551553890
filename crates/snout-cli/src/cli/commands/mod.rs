//! CLI command handlers, one per file.

mod check_file;
mod completions;
mod fetch;
mod man;
mod resolve;

pub use check_file::run_check_file;
pub use completions::run_completions;
pub use fetch::run_fetch;
pub use man::run_man;
pub use resolve::run_resolve;
