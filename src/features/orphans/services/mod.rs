mod orphan_service;

pub use orphan_service::OrphanService;
