// Adapters layer: concrete implementations for external systems (storage, http, console).

pub mod console;
pub mod hubspot;
pub mod storage;
