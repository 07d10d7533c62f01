/// Block listing command.
pub mod blocks;
/// File-level information command.
pub mod info;
/// Single-block dump command.
pub mod show;
/// Scene-graph tree command.
pub mod tree;

#[cfg(test)]
mod test_support;
mod util;
