pub mod driver_state;
pub mod exam_options;
pub mod examination_driver;

pub use driver_state::{AdvanceControl, DriverPhase, DriverState};
pub use exam_options::{ExamMode, ExamOptions, DEFAULT_QUESTION_LIMIT, DEFAULT_SETTLE_DELAY};
pub use examination_driver::{CycleOutcome, ExamSummary, ExaminationDriver};
