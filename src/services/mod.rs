pub mod parser;
pub mod settings_store;
pub mod view_service;

pub use parser::{ParseOutcome, ParseWarning, RecordParser, SkipReason};
pub use settings_store::SettingsStore;
pub use view_service::{clamp_page, compute_view, compute_view_with_rng, total_pages, PageView, View};
