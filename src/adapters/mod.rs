// Adapters layer: concrete implementations for external systems (iNaturalist, completion API, filesystem).

pub mod inat;
pub mod llm;
pub mod storage;
