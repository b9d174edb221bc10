pub mod minute;
pub mod precise;

pub use minute::Scheduler;
pub use precise::PrecisionScheduler;
