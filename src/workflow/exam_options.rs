//! 考试驱动的构建参数

use crate::config::PageSelectors;
use crate::infrastructure::Locator;
use crate::workflow::driver_state::AdvanceControl;
use std::time::Duration;

/// 默认最大题数
pub const DEFAULT_QUESTION_LIMIT: usize = 100;

/// 点击"下一题"后的页面切换动画时间
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// 答题模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamMode {
    /// 自动选择答案，由用户点击"下一题"
    Manual,
    /// 自动选择答案并自动点击"下一题"
    FullAutomatic,
}

/// 考试参数
#[derive(Debug, Clone)]
pub struct ExamOptions {
    /// 考试名称（用于提示信息）
    pub name: String,
    pub start_button: Locator,
    pub primary_next_button: Locator,
    pub secondary_next_button: Locator,
    pub question: Locator,
    pub option: Locator,
    pub mode: ExamMode,
    pub limit: usize,
    pub settle_delay: Duration,
}

impl ExamOptions {
    pub fn new(name: impl Into<String>, selectors: &PageSelectors) -> Self {
        Self {
            name: name.into(),
            start_button: Locator::css(selectors.start_button.as_str()),
            primary_next_button: Locator::css(selectors.primary_next_button.as_str()),
            secondary_next_button: Locator::css(selectors.secondary_next_button.as_str()),
            question: Locator::css(selectors.question.as_str()),
            option: Locator::css(selectors.option.as_str()),
            mode: ExamMode::Manual,
            limit: DEFAULT_QUESTION_LIMIT,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_mode(mut self, mode: ExamMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn is_full_automatic(&self) -> bool {
        self.mode == ExamMode::FullAutomatic
    }

    pub fn control_locator(&self, control: AdvanceControl) -> &Locator {
        match control {
            AdvanceControl::Primary => &self.primary_next_button,
            AdvanceControl::Secondary => &self.secondary_next_button,
        }
    }
}
