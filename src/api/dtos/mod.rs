pub mod common;
pub mod driver_dto;

pub use common::*;
pub use driver_dto::*;
