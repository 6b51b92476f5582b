pub mod conversion;
pub mod shared;
