pub mod category_tree;
pub mod question;
pub mod view_state;

pub use category_tree::CategoryTree;
pub use question::{topic_name_from_path, IdSequence, ManifestEntry, QuestionRecord};
pub use view_state::{Filter, Mode, SortDirection, ViewState};
