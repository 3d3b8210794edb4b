pub mod merge;
pub mod status;
pub mod tag;
