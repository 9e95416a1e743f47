use serde::{Deserialize, Serialize};

/// 页面上显示的题目
///
/// 页面渲染的题目块中，第一行是题干，后面是选项文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
}

impl Question {
    /// 从页面读取到的原始文本构建题目（只取第一个非空行）
    pub fn from_display_text(raw: &str) -> Self {
        let text = raw
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string();
        Self { text }
    }
}

/// 题库条目：题目 + 字母形式的答案（例如 "B"、"AC"）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerBankEntry {
    pub question: String,
    pub answer: String,
}

impl AnswerBankEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}
