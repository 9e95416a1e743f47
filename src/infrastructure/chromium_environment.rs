//! 基于 chromiumoxide 的考试环境
//!
//! 元素等待通过轮询实现；"下一题"按钮的点击通过页面上注入的
//! 捕获阶段监听记录，再由 Rust 侧轮询读取。

use crate::error::{AppError, BrowserError, Result};
use crate::infrastructure::environment::{Locator, UiEnvironment};
use crate::infrastructure::js_executor::JsExecutor;
use async_trait::async_trait;
use chromiumoxide::element::Element;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, trace};

/// 真实浏览器页面
pub struct ChromiumEnvironment {
    executor: JsExecutor,
    poll_interval: Duration,
}

impl ChromiumEnvironment {
    pub fn new(executor: JsExecutor, poll_interval: Duration) -> Self {
        Self {
            executor,
            poll_interval,
        }
    }

    pub fn executor(&self) -> &JsExecutor {
        &self.executor
    }

    async fn element_exists(&self, locator: &Locator) -> Result<bool> {
        let js_code = format!(
            "document.querySelector({}) !== null",
            js_string(locator.as_str())
        );
        self.executor.eval_as::<bool>(js_code).await
    }

    async fn find_element(&self, locator: &Locator) -> Result<Element> {
        self.executor
            .page()
            .find_element(locator.as_str())
            .await
            .map_err(|e| element_error(locator, e))
    }
}

#[async_trait]
impl UiEnvironment for ChromiumEnvironment {
    type Element = Element;

    async fn wait_for_element(&self, locator: &Locator) -> Result<Element> {
        debug!("⏳ 等待元素加载: {}", locator);
        loop {
            match self.element_exists(locator).await {
                Ok(true) => match self.find_element(locator).await {
                    Ok(element) => {
                        debug!("✓ 元素已加载: {}", locator);
                        return Ok(element);
                    }
                    // 元素可能在两次调用之间被重新渲染
                    Err(e) => keep_polling(locator, e)?,
                },
                Ok(false) => {}
                Err(e) => keep_polling(locator, e)?,
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn current_question_text(&self, locator: &Locator) -> Result<String> {
        let element = self.find_element(locator).await?;
        let text = element
            .inner_text()
            .await
            .map_err(|e| element_error(locator, e))?;
        Ok(text.unwrap_or_default())
    }

    async fn option_elements(&self, locator: &Locator) -> Result<Vec<Element>> {
        self.executor
            .page()
            .find_elements(locator.as_str())
            .await
            .map_err(|e| element_error(locator, e))
    }

    async fn click(&self, element: &Element) -> Result<()> {
        element.click().await.map_err(|e| BrowserError::ElementActionFailed {
            locator: "<element>".to_string(),
            source: e.into(),
        })?;
        Ok(())
    }

    async fn arm(&self, locator: &Locator) -> Result<()> {
        let js_code = format!(
            r#"
            (() => {{
                const selector = {selector};
                const state = window.__examAdvance || (window.__examAdvance = {{ armed: {{}}, activated: {{}} }});
                if (!state.installed) {{
                    document.addEventListener('click', (event) => {{
                        for (const key of Object.keys(state.armed)) {{
                            const target = document.querySelector(key);
                            if (target && (target === event.target || target.contains(event.target))) {{
                                state.activated[key] = true;
                            }}
                        }}
                    }}, true);
                    state.installed = true;
                }}
                state.armed[selector] = true;
                state.activated[selector] = false;
                return true;
            }})()
            "#,
            selector = js_string(locator.as_str())
        );
        self.executor.eval(js_code).await?;
        debug!("🔗 已监听按钮: {}", locator);
        Ok(())
    }

    async fn wait_for_activation(&self, locator: &Locator) -> Result<()> {
        let js_code = format!(
            r#"
            (() => {{
                const selector = {selector};
                const state = window.__examAdvance;
                if (!state || !state.armed[selector]) {{
                    return 'lost';
                }}
                if (state.activated[selector]) {{
                    state.activated[selector] = false;
                    return 'clicked';
                }}
                return 'waiting';
            }})()
            "#,
            selector = js_string(locator.as_str())
        );

        loop {
            let activation = match self.executor.eval_as::<String>(js_code.as_str()).await {
                Ok(activation) => activation,
                Err(e) => {
                    keep_polling(locator, e)?;
                    sleep(self.poll_interval).await;
                    continue;
                }
            };
            match activation.as_str() {
                "clicked" => {
                    debug!("✓ 按钮已被点击: {}", locator);
                    return Ok(());
                }
                // 页面刷新或跳转后监听状态会丢失
                "lost" => return Err(AppError::EnvironmentClosed),
                _ => trace!("等待点击: {}", locator),
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn disarm(&self, locator: &Locator) -> Result<()> {
        let js_code = format!(
            r#"
            (() => {{
                const selector = {selector};
                const state = window.__examAdvance;
                if (state) {{
                    delete state.armed[selector];
                    delete state.activated[selector];
                }}
                return true;
            }})()
            "#,
            selector = js_string(locator.as_str())
        );
        self.executor.eval(js_code).await?;
        debug!("已取消监听按钮: {}", locator);
        Ok(())
    }
}

/// 页面（或标签页）已关闭时 CDP 返回的错误信息
const CLOSED_TARGET_MARKERS: &[&str] = &[
    "No target with given id",
    "Target closed",
    "Session with given id not found",
    "Inspected target navigated or closed",
    "receiver is gone",
    "channel closed",
];

/// 判断错误是否表示页面已关闭（检查整个错误链）
fn is_closed_target(err: &AppError) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        let message = e.to_string();
        if CLOSED_TARGET_MARKERS.iter().any(|marker| message.contains(marker)) {
            return true;
        }
        current = e.source();
    }
    false
}

/// 等待过程中的脚本错误：页面关闭则结束等待，其他错误继续轮询
fn keep_polling(locator: &Locator, err: AppError) -> Result<()> {
    if is_closed_target(&err) {
        debug!("页面已关闭，停止等待: {}", locator);
        return Err(AppError::EnvironmentClosed);
    }
    trace!("等待 {} 时出错，继续轮询: {}", locator, err);
    Ok(())
}

fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

fn element_error(locator: &Locator, e: chromiumoxide::error::CdpError) -> AppError {
    BrowserError::ElementActionFailed {
        locator: locator.to_string(),
        source: e.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes_selector() {
        assert_eq!(js_string("div > button"), "\"div > button\"");
        assert_eq!(js_string("a[title=\"x\"]"), "\"a[title=\\\"x\\\"]\"");
    }

    fn script_error(message: &str) -> AppError {
        BrowserError::ScriptExecutionFailed {
            source: message.into(),
        }
        .into()
    }

    #[test]
    fn test_closed_target_ends_the_wait() {
        let locator = Locator::css(".exam-content-question");
        let err = keep_polling(&locator, script_error("No target with given id found")).unwrap_err();
        assert!(err.is_environment_closed());

        let err = keep_polling(&locator, script_error("send failed because receiver is gone"))
            .unwrap_err();
        assert!(err.is_environment_closed());
    }

    #[test]
    fn test_transient_script_error_keeps_polling() {
        let locator = Locator::css(".exam-content-question");
        assert!(keep_polling(&locator, script_error("Cannot find context with specified id")).is_ok());
        assert!(keep_polling(&locator, AppError::Other("页面正在重新渲染".to_string())).is_ok());
    }
}
