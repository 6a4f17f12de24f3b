pub mod journal;
pub mod mood;
pub mod planning;
pub mod recurrence;
pub mod task;
pub mod timestamp;
pub mod video;
pub mod vision;
