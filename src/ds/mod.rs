pub(crate) mod arena;
pub mod dll;
