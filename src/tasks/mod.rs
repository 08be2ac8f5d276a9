//! Background Tasks Module
//!
//! Contains the timer that drives periodic cache maintenance.
//!
//! # Tasks
//! - Maintenance Scheduler: flags that expired entries should be pruned, at a configured interval

mod scheduler;

pub use scheduler::MaintenanceScheduler;
