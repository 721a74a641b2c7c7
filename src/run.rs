mod cli;
mod report;

pub(crate) use cli::{as_cli, print_usage};
