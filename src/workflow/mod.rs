pub mod command;
pub mod question_card;
pub mod render;
pub mod session;

pub use command::{Command, HELP};
pub use question_card::{Feedback, QuestionCard};
pub use session::{Reply, Session};
