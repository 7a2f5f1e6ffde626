pub mod machine;
pub mod store;

pub use machine::{reduce, SectionEvent, Transition, UiEvent, CHECK_REPORT_TYPE, CONFETTI_DURATION_MS};
pub use store::{compute_progress, initialize_store, Progress, SectionStore};
