/// Sequential dynamic decode command.
pub mod dump;
/// JSON to wire conversion command.
pub mod encode;
/// Indented value tree printer.
pub mod print;
/// Wire family statistics command.
pub mod stats;

pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;
