//! 状态提示服务 - 业务能力层
//!
//! 只负责把答题过程中的提示信息展示给用户（日志 + 输出文件），不关心流程

use std::fs::OpenOptions;
use std::io::Write;
use tracing::{debug, error, info, warn};

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// 一般提示（开始考试等）
    Info,
    /// 答题成功
    Success,
    /// 失败
    Error,
}

/// 提示信息的输出通道
pub trait StatusSink: Send + Sync {
    fn show(&self, level: StatusLevel, message: &str);
}

/// 默认的提示输出：写 tracing 日志，并追加到输出文件
pub struct StatusReporter {
    output_file_path: Option<String>,
}

impl StatusReporter {
    /// 只输出到日志
    pub fn new() -> Self {
        Self {
            output_file_path: None,
        }
    }

    /// 同时追加到指定文件
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            output_file_path: Some(path.into()),
        }
    }

    fn append(&self, level: StatusLevel, message: &str) -> std::io::Result<()> {
        let Some(path) = &self.output_file_path else {
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let line = format!(
            "[{}] [{:?}] {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            level,
            message.replace('\n', " | ")
        );
        file.write_all(line.as_bytes())
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for StatusReporter {
    fn show(&self, level: StatusLevel, message: &str) {
        match level {
            StatusLevel::Info => info!("💬 {}", message),
            StatusLevel::Success => info!("✅ {}", message),
            StatusLevel::Error => error!("❌ {}", message),
        }

        if let Err(e) = self.append(level, message) {
            warn!("写入输出文件失败: {}", e);
        } else {
            debug!("提示已写入输出文件");
        }
    }
}
