pub mod balance_display;
pub mod poll_schedule;
pub mod relative_time;
pub mod task_guard;
