//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：日志文件、连接（或启动）浏览器、创建考试环境
//! 2. **加载答案库**：从 TOML 文件读取课程答案和期末题库
//! 3. **选择考试**：按配置准备课程答题或期末考试
//! 4. **运行考试**：把环境和答案交给 `ExaminationDriver`
//! 5. **统计输出**：输出本场考试的结果

use crate::browser;
use crate::config::{Config, ExamKind};
use crate::infrastructure::{ChromiumEnvironment, JsExecutor};
use crate::models::{load_answer_library, AnswerLibrary};
use crate::orchestrator::exam_tasks::{build_course_exam, build_final_exam, course_id_from_url};
use crate::services::{AnswerResolver, StatusLevel, StatusReporter, StatusSink};
use crate::utils::logging::{init_log_file, log_startup, print_final_stats};
use crate::workflow::{ExamOptions, ExaminationDriver};
use anyhow::{Context, Result};
use chromiumoxide::Browser;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    environment: ChromiumEnvironment,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法初始化日志文件: {}", config.output_log_file))?;

        log_startup(
            match config.exam_kind {
                ExamKind::Course => "课程答题",
                ExamKind::Final => "期末考试",
            },
            config.full_automatic,
        );

        let (browser, page) = if config.headless {
            browser::launch_headless_browser(&config.target_url, config.chrome_executable.as_deref())
                .await?
        } else {
            browser::connect_to_browser_and_page(
                config.browser_debug_port,
                Some(&config.target_url),
                config.target_title.as_deref(),
            )
            .await?
        };

        // 环境持有 JsExecutor（持有 page）
        let environment = ChromiumEnvironment::new(
            JsExecutor::new(page),
            Duration::from_millis(config.poll_interval_ms),
        );

        Ok(Self {
            config,
            _browser: browser,
            environment,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> Result<()> {
        info!("\n📁 正在加载答案库...");
        let library = load_answer_library(Path::new(&self.config.answer_library)).await?;
        let status = StatusReporter::with_path(self.config.output_log_file.clone());

        let exam_kind = self.config.exam_kind;
        let result = match exam_kind {
            ExamKind::Course => self.run_course(&library).await,
            ExamKind::Final => self.run_final(&library).await,
        };

        if let Err(e) = &result {
            status.show(StatusLevel::Error, &e.to_string());
        }
        result
    }

    async fn run_course(self, library: &AnswerLibrary) -> Result<()> {
        let course_id = match &self.config.course_id {
            Some(course_id) => course_id.clone(),
            None => {
                let url = self
                    .environment
                    .executor()
                    .current_url()
                    .await?
                    .unwrap_or_default();
                course_id_from_url(&url).ok_or_else(|| {
                    crate::error::ConfigError::CourseIdNotFound { url: url.clone() }
                })?
            }
        };

        let (options, resolver) = build_course_exam(&self.config, library, &course_id)?;
        self.run_exam(options, resolver).await
    }

    async fn run_final(self, library: &AnswerLibrary) -> Result<()> {
        let (options, resolver) = build_final_exam(&self.config, library)?;
        self.run_exam(options, resolver).await
    }

    async fn run_exam<R: AnswerResolver>(self, options: ExamOptions, resolver: R) -> Result<()> {
        let output_log_file = self.config.output_log_file.clone();
        let mut driver = ExaminationDriver::new(self.environment, resolver, options)
            .with_status(Box::new(StatusReporter::with_path(output_log_file.clone())));

        match driver.run().await {
            Ok(summary) => {
                print_final_stats(
                    &summary.name,
                    summary.answered,
                    summary.unmatched,
                    &output_log_file,
                );
                Ok(())
            }
            Err(e) => {
                error!("❌ 考试过程中发生错误: {}", e);
                Err(e.into())
            }
        }
    }
}
