pub mod agent;
pub mod container;
pub mod emphasis;
pub mod item;
