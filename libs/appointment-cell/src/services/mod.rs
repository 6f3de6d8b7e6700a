// libs/appointment-cell/src/services/mod.rs

pub mod confirmation;
pub mod scheduler;
pub mod validation;

pub use scheduler::SchedulingService;
