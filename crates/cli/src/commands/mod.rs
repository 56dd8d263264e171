pub mod ask;
pub mod context;
pub mod import;
pub mod serve;
pub mod status;
