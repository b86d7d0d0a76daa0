pub mod allocation_service;
pub mod error;
pub mod goal_service;
pub mod user_locks;
