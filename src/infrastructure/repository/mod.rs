//! Analysis repository adapters

mod memory;

pub use memory::InMemoryAnalysisRepository;
