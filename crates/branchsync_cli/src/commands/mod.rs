pub(crate) mod generate;
pub(crate) mod summary;
pub(crate) mod sync;
