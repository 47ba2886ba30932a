//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod anomaly_repo;
pub mod machine_repo;
pub mod reading_repo;

pub use anomaly_repo::AnomalyRepo;
pub use machine_repo::MachineRepo;
pub use reading_repo::ReadingRepo;
