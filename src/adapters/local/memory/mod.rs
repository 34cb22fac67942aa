//! In-process stores. State is lost on restart.

mod crm;
mod jobs;

pub use crm::MemoryCrm;
pub use jobs::MemoryJobs;
