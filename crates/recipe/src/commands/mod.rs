//! CLI command implementations.

pub(crate) mod expand;
pub(crate) mod flags;
pub(crate) mod list;
mod recipe;

pub(crate) use expand::ExpandArgs;
pub(crate) use flags::FlagsArgs;
pub(crate) use list::CommandsArgs;
