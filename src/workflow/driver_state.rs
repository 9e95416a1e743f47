//! 考试驱动状态
//!
//! 每次考试各自持有一份，不在考试之间共享。

/// 考试阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    /// 还没有出现第一题
    NotStarted,
    /// 答题中
    Started,
    /// 已结束
    Finished,
}

/// 本轮要使用的"下一题"按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceControl {
    /// 第一题的按钮
    Primary,
    /// 第二题起页面换成的按钮
    Secondary,
}

/// 考试驱动状态
///
/// `answered_count` 只增不减，且永远不超过 `limit`。
#[derive(Debug, Clone)]
pub struct DriverState {
    phase: DriverPhase,
    /// 已挂上"下一题"监听的轮数（已作答 + 未匹配）
    cycle: usize,
    answered_count: usize,
    unmatched_count: usize,
    inert_count: usize,
    limit: usize,
}

impl DriverState {
    pub fn new(limit: usize) -> Self {
        Self {
            phase: DriverPhase::NotStarted,
            cycle: 0,
            answered_count: 0,
            unmatched_count: 0,
            inert_count: 0,
            limit,
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase != DriverPhase::NotStarted
    }

    pub fn is_finished(&self) -> bool {
        self.phase == DriverPhase::Finished
    }

    pub fn mark_started(&mut self) {
        if self.phase == DriverPhase::NotStarted {
            self.phase = DriverPhase::Started;
        }
    }

    pub fn finish(&mut self) {
        self.phase = DriverPhase::Finished;
    }

    /// 是否还能继续作答
    pub fn can_answer(&self) -> bool {
        !self.is_finished() && self.answered_count < self.limit
    }

    /// 当前题号（从 1 开始）
    pub fn question_number(&self) -> usize {
        self.cycle + 1
    }

    /// 第一轮用初始按钮，之后用页面替换后的按钮
    pub fn advance_control(&self) -> AdvanceControl {
        if self.cycle == 0 {
            AdvanceControl::Primary
        } else {
            AdvanceControl::Secondary
        }
    }

    /// 记录一次作答；已到上限时不计数并返回 false
    pub fn record_answer(&mut self) -> bool {
        if !self.can_answer() {
            return false;
        }
        self.answered_count += 1;
        self.cycle += 1;
        true
    }

    /// 记录一道未找到答案的题目
    pub fn record_unmatched(&mut self) {
        self.unmatched_count += 1;
        self.cycle += 1;
    }

    /// 记录一次到达上限后的空转
    pub fn record_inert(&mut self) {
        self.inert_count += 1;
    }

    pub fn cycle(&self) -> usize {
        self.cycle
    }

    pub fn answered_count(&self) -> usize {
        self.answered_count
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched_count
    }

    pub fn inert_count(&self) -> usize {
        self.inert_count
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = DriverState::new(3);
        assert_eq!(state.phase(), DriverPhase::NotStarted);
        assert_eq!(state.advance_control(), AdvanceControl::Primary);
        assert_eq!(state.question_number(), 1);
        assert!(state.can_answer());
    }

    #[test]
    fn test_answered_count_never_exceeds_limit() {
        let mut state = DriverState::new(2);
        state.mark_started();
        assert!(state.record_answer());
        assert_eq!(state.advance_control(), AdvanceControl::Secondary);
        assert!(state.record_answer());
        assert!(!state.record_answer());
        assert_eq!(state.answered_count(), 2);
        assert!(!state.can_answer());
    }

    #[test]
    fn test_unmatched_moves_to_secondary_control() {
        let mut state = DriverState::new(5);
        state.record_unmatched();
        assert_eq!(state.advance_control(), AdvanceControl::Secondary);
        assert_eq!(state.question_number(), 2);
        assert_eq!(state.answered_count(), 0);
        assert_eq!(state.unmatched_count(), 1);
    }

    #[test]
    fn test_zero_limit_and_finish() {
        let mut state = DriverState::new(0);
        assert!(!state.can_answer());

        let mut state = DriverState::new(5);
        state.mark_started();
        state.finish();
        assert!(state.is_finished());
        assert!(!state.can_answer());
        // 结束后不会回到答题状态
        state.mark_started();
        assert_eq!(state.phase(), DriverPhase::Finished);
    }
}
