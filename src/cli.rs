//! CLI domain: parse, route, output, and presentation only.
//! No reconciliation logic; the route hands off to the pipeline.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::Cli;
pub use presentation::{format_report_json, format_report_text};
pub use route::RunContext;
