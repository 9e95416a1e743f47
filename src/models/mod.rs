pub mod library;
pub mod loaders;
pub mod question;

pub use library::AnswerLibrary;
pub use loaders::load_answer_library;
pub use question::{AnswerBankEntry, Question};
