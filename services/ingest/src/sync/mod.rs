pub mod guard;
pub mod scheduler;
pub mod service;
pub mod transform;
