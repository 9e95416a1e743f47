//! 考试模拟流程 - 流程层
//!
//! 一场考试的状态机：
//!
//! ```text
//! NotStarted ──开始按钮──▶ Started ──advance()*──▶ Finished
//! ```
//!
//! 每次 `advance()` 处理一道题：
//! 1. 等待题目出现并读取题干
//! 2. 第一题额外等待初始"下一题"按钮
//! 3. 达到题数上限时不做任何操作
//! 4. 解析答案（按顺序 / 题库匹配）
//! 5. 监听本轮的"下一题"按钮（第一题用初始按钮，之后用替换后的按钮）
//! 6. 点击答案选项
//! 7. 全自动模式下自动点击"下一题"

use crate::error::{AppError, Result};
use crate::infrastructure::{Locator, UiEnvironment};
use crate::models::Question;
use crate::services::{AnswerResolver, StatusLevel, StatusReporter, StatusSink};
use crate::utils::logging::truncate_text;
use crate::workflow::driver_state::DriverState;
use crate::workflow::exam_options::ExamOptions;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// 单轮处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 已选择答案
    Answered {
        /// 题号（从 1 开始）
        index: usize,
        /// 显示用答案
        answer: String,
        /// 题库中匹配到的题目
        matched_question: Option<String>,
        /// 是否已自动点击"下一题"
        auto_advanced: bool,
    },
    /// 没有找到答案，留给用户手动作答
    Unmatched { index: usize, question: String },
    /// 已达到题数上限，本轮没有任何操作
    LimitReached,
}

/// 考试结束时的统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamSummary {
    pub name: String,
    pub answered: usize,
    pub unmatched: usize,
    pub inert: usize,
}

/// 考试驱动
pub struct ExaminationDriver<E: UiEnvironment, R: AnswerResolver> {
    env: E,
    resolver: R,
    options: ExamOptions,
    state: DriverState,
    status: Box<dyn StatusSink>,
    /// 当前已监听的"下一题"按钮
    armed: Option<Locator>,
}

impl<E: UiEnvironment, R: AnswerResolver> ExaminationDriver<E, R> {
    pub fn new(env: E, resolver: R, options: ExamOptions) -> Self {
        let state = DriverState::new(options.limit);
        Self {
            env,
            resolver,
            options,
            state,
            status: Box::new(StatusReporter::new()),
            armed: None,
        }
    }

    /// 替换提示信息输出通道
    pub fn with_status(mut self, status: Box<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// 完整运行一场考试，直到达到题数上限或页面关闭
    pub async fn run(&mut self) -> Result<ExamSummary> {
        match self.wait_for_start().await {
            Ok(()) => {}
            Err(e) if e.is_environment_closed() => return self.finish().await,
            Err(e) => return Err(e),
        }

        loop {
            let outcome = match self.advance().await {
                Ok(outcome) => outcome,
                Err(e) if e.is_environment_closed() => {
                    info!("[{}] 页面已关闭，考试结束", self.options.name);
                    break;
                }
                Err(e) => return Err(e),
            };

            match outcome {
                CycleOutcome::LimitReached => {
                    info!(
                        "[{}] 已达到题数上限 {}，停止答题",
                        self.options.name,
                        self.state.limit()
                    );
                    break;
                }
                CycleOutcome::Answered {
                    auto_advanced: true,
                    ..
                } => {}
                CycleOutcome::Answered { .. } | CycleOutcome::Unmatched { .. } => {
                    match self.wait_for_next_click().await {
                        Ok(()) => {}
                        Err(e) if e.is_environment_closed() => {
                            info!("[{}] 页面已关闭，考试结束", self.options.name);
                            break;
                        }
                        Err(e) => return Err(e),
                    }
                }
            }

            // 等待页面切换动画
            sleep(self.options.settle_delay).await;

            // 答满后结果页可能没有题目元素，不再等待下一题
            if !self.state.can_answer() {
                info!(
                    "[{}] 已达到题数上限 {}，停止答题",
                    self.options.name,
                    self.state.limit()
                );
                break;
            }
        }

        self.finish().await
    }

    /// 等待考试开始
    ///
    /// 手动模式等待用户点击开始按钮；全自动模式直接点击。
    pub async fn wait_for_start(&mut self) -> Result<()> {
        let start_locator = self.options.start_button.clone();
        let start_button = self.env.wait_for_element(&start_locator).await?;

        if self.options.is_full_automatic() {
            debug!("全自动模式，自动点击开始按钮");
            self.env.click(&start_button).await?;
        } else {
            info!("⏳ [{}] 等待点击开始按钮...", self.options.name);
            self.env.arm(&start_locator).await?;
            self.env.wait_for_activation(&start_locator).await?;
            self.env.disarm(&start_locator).await?;
        }

        self.status
            .show(StatusLevel::Info, &format!("开始 {}！", self.options.name));
        Ok(())
    }

    /// 处理一道题
    pub async fn advance(&mut self) -> Result<CycleOutcome> {
        // 等待题目加载
        self.env.wait_for_element(&self.options.question).await?;
        let raw_text = self.env.current_question_text(&self.options.question).await?;
        let question = Question::from_display_text(&raw_text);

        // 第一题：等初始"下一题"按钮出现后才算正式开始
        if !self.state.is_started() {
            self.env
                .wait_for_element(&self.options.primary_next_button)
                .await?;
            self.state.mark_started();
            info!("[{}] 考试已开始", self.options.name);
        }

        if !self.state.can_answer() {
            self.state.record_inert();
            debug!(
                "[{}] 已答 {} 题，达到上限 {}",
                self.options.name,
                self.state.answered_count(),
                self.state.limit()
            );
            return Ok(CycleOutcome::LimitReached);
        }

        let index = self.state.question_number();
        info!(
            "[{}] 第 {} 题: {}",
            self.options.name,
            index,
            truncate_text(&question.text, 80)
        );

        let outcome = self.resolver.resolve(&question.text);

        // 监听本轮的"下一题"按钮
        let control_locator = self
            .options
            .control_locator(self.state.advance_control())
            .clone();
        let control = self.env.wait_for_element(&control_locator).await?;
        if let Some(previous) = self.armed.take() {
            if previous != control_locator {
                self.env.disarm(&previous).await?;
            }
        }
        self.env.arm(&control_locator).await?;
        self.armed = Some(control_locator);

        let Some(result) = outcome.result().cloned() else {
            self.state.record_unmatched();
            self.status.show(
                StatusLevel::Error,
                &format!("{}\n第 {} 题未找到答案，请手动作答", question.text, index),
            );
            return Ok(CycleOutcome::Unmatched {
                index,
                question: question.text,
            });
        };

        let display_answer = result.answer.display();
        let offsets = result.answer.option_offsets()?;

        if !self.options.is_full_automatic() {
            let final_question = result
                .matched_question
                .as_deref()
                .unwrap_or(question.text.as_str());
            let prefix = if final_question.is_empty() {
                String::new()
            } else {
                format!("{}\n", final_question)
            };
            self.status.show(
                StatusLevel::Success,
                &format!("{}第 {} 题答案：{}", prefix, index, display_answer),
            );
        }

        // 按顺序点击选项
        let options = self.env.option_elements(&self.options.option).await?;
        debug!("选择 {} -> {:?} (共 {} 个选项)", display_answer, offsets, options.len());
        for offset in offsets {
            match options.get(offset) {
                Some(option) => self.env.click(option).await?,
                None => warn!(
                    "[{}] 第 {} 题的选项 {} 不存在 (共 {} 个选项)，已跳过",
                    self.options.name,
                    index,
                    offset,
                    options.len()
                ),
            }
        }

        let auto_advanced = self.options.is_full_automatic();
        if auto_advanced {
            self.env.click(&control).await?;
        }

        self.state.record_answer();

        Ok(CycleOutcome::Answered {
            index,
            answer: display_answer,
            matched_question: result.matched_question,
            auto_advanced,
        })
    }

    /// 等待用户点击本轮的"下一题"按钮
    async fn wait_for_next_click(&self) -> Result<()> {
        let locator = self
            .armed
            .as_ref()
            .ok_or_else(|| AppError::Other("没有已监听的下一题按钮".to_string()))?;
        self.env.wait_for_activation(locator).await
    }

    /// 结束考试：取消监听并输出统计
    async fn finish(&mut self) -> Result<ExamSummary> {
        if let Some(locator) = self.armed.take() {
            match self.env.disarm(&locator).await {
                Ok(()) => {}
                Err(e) if e.is_environment_closed() => {}
                Err(e) => warn!("取消监听失败: {}", e),
            }
        }
        self.state.finish();

        let summary = ExamSummary {
            name: self.options.name.clone(),
            answered: self.state.answered_count(),
            unmatched: self.state.unmatched_count(),
            inert: self.state.inert_count(),
        };
        info!(
            "[{}] ✅ 考试结束: 作答 {} 题, 未匹配 {} 题",
            summary.name, summary.answered, summary.unmatched
        );
        Ok(summary)
    }
}
