pub mod memory;
pub mod model;
pub mod repo;
pub mod store;

pub use memory::MemoryJobStore;
pub use model::{AppendOutcome, CityResult, CreateOutcome, JobDocument};
pub use repo::JobsRepo;
pub use store::JobStore;
