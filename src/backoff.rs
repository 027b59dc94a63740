#[path = "backoff/policy.rs"]
mod policy;

#[path = "backoff/schedule.rs"]
mod schedule;

#[path = "backoff/executor.rs"]
mod executor;

pub use executor::{default_classification, BackoffExecutor, Classification, DefaultClassifier};
pub use policy::BackoffPolicy;
pub use schedule::{jittered, DelaySchedule};

#[cfg(test)]
mod tests;
