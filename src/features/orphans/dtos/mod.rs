mod orphan_dto;

pub use orphan_dto::*;
