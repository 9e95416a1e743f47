//! # Exam Emulator
//!
//! 自动完成网页上逐题显示的考试：识别题目、查找答案、点击选项、进入下一题
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `UiEnvironment` - 考试页面能力（等待元素、读题、点击、监听按钮）
//! - `ChromiumEnvironment` - 基于 chromiumoxide 的实现
//!
//! ### ② 业务能力层（Services）
//! - `answer_codec` - 字母答案与选项序号互转
//! - `answer_matcher` - 题库匹配（精确 → 模糊）
//! - `answer_resolver` - 按顺序 / 按题库解析答案
//! - `status_reporter` - 提示信息
//!
//! ### ③ 流程层（Workflow）
//! - `ExaminationDriver` - 一场考试的状态机
//! - `DriverState` - 每场考试独立持有的状态
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 初始化资源、选择考试、输出统计
//! - `orchestrator/exam_tasks` - 课程答题 / 期末考试的参数准备

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::connect_to_browser_and_page;
pub use config::{Config, ExamKind};
pub use error::{AppError, Result};
pub use infrastructure::{ChromiumEnvironment, JsExecutor, Locator, UiEnvironment};
pub use models::{AnswerBankEntry, AnswerLibrary, Question};
pub use orchestrator::App;
pub use services::{AnswerMatcher, AnswerValue, MatchOutcome, MatchResult};
pub use workflow::{CycleOutcome, ExamMode, ExamOptions, ExaminationDriver};
