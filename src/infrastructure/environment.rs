//! 考试环境抽象 - 基础设施层
//!
//! 考试驱动只通过这个 trait 观察和操作页面，
//! 真实浏览器和测试中的脚本化环境都实现它。

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 元素定位器（CSS 选择器）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(selector: &str) -> Self {
        Self::css(selector)
    }
}

/// 考试页面能力
///
/// 所有等待都没有超时：元素不出现就一直挂起，
/// 只有页面关闭时返回 [`crate::AppError::EnvironmentClosed`]。
#[async_trait]
pub trait UiEnvironment: Send + Sync {
    /// 页面元素句柄
    type Element: Send + Sync;

    /// 等待匹配定位器的元素出现并返回它
    async fn wait_for_element(&self, locator: &Locator) -> Result<Self::Element>;

    /// 读取当前题目的原始显示文本
    async fn current_question_text(&self, locator: &Locator) -> Result<String>;

    /// 当前题目的所有可点击选项（按页面顺序）
    async fn option_elements(&self, locator: &Locator) -> Result<Vec<Self::Element>>;

    /// 模拟点击
    async fn click(&self, element: &Self::Element) -> Result<()>;

    /// 给"下一题"按钮挂上点击监听，之后的点击（真实或模拟）都会被记录
    async fn arm(&self, locator: &Locator) -> Result<()>;

    /// 等待已挂监听的按钮被点击
    async fn wait_for_activation(&self, locator: &Locator) -> Result<()>;

    /// 取消监听
    async fn disarm(&self, locator: &Locator) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_serde_is_transparent() {
        let locator: Locator = serde_json::from_str("\".exam-content-question\"").unwrap();
        assert_eq!(locator.as_str(), ".exam-content-question");
        assert_eq!(locator.to_string(), ".exam-content-question");
    }
}
