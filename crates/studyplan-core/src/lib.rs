pub mod allocation;
pub mod error;
pub mod events;
pub mod goal;
pub mod ids;
pub mod time;
