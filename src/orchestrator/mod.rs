//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 持有浏览器资源（Browser、ChromiumEnvironment）
//! - 加载答案库，输出统计信息
//!
//! ### `exam_tasks` - 考试任务
//! - 课程答题：按课程 ID 取答案，按顺序作答
//! - 期末考试：按年级取题库，按题目文本匹配
//!
//! ## 层次关系
//!
//! ```text
//! app (选择考试、持有资源)
//!     ↓
//! workflow::ExaminationDriver (一场考试的状态机)
//!     ↓
//! services (能力层：codec / matcher / resolver / status)
//!     ↓
//! infrastructure (基础设施：UiEnvironment、JsExecutor)
//! ```

pub mod app;
pub mod exam_tasks;

pub use app::App;
pub use exam_tasks::{build_course_exam, build_final_exam, course_id_from_url};
