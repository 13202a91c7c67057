pub mod deps;
pub mod logger;
pub mod naming;

pub use deps::DependencyStatus;
pub use logger::init_logging;
