use thiserror::Error;

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, AppError>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 答案格式错误
    #[error("答案错误: {0}")]
    Answer(#[from] AnswerError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 页面已关闭或已离开考试页面，考试无法继续
    #[error("考试环境已关闭")]
    EnvironmentClosed,
    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

impl AppError {
    /// 是否为"环境已关闭"（正常结束，而不是失败）
    pub fn is_environment_closed(&self) -> bool {
        matches!(self, AppError::EnvironmentClosed)
    }
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (地址: {url}): {source}")]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 元素操作失败（读取文本、点击等）
    #[error("元素操作失败 ({locator}): {source}")]
    ElementActionFailed {
        locator: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {message}")]
    ConfigurationFailed { message: String },
}

/// 答案格式错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnswerError {
    /// 字母答案中出现了非 A-Z 的字符
    #[error("无效的答案字母 '{letter}' (答案: {answer})")]
    InvalidLetter { answer: String, letter: char },
    /// 数字答案无法解析
    #[error("无效的数字答案: {answer}")]
    InvalidOffset { answer: String },
    /// 空答案
    #[error("答案为空")]
    Empty,
    /// 序号超出字母范围
    #[error("选项序号 {index} 超出字母范围 A-Z")]
    IndexOutOfAlphabet { index: usize },
}

/// 配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 配置项缺失
    #[error("缺少配置项: {key}")]
    Missing { key: String },
    /// 配置值无效
    #[error("配置项 {key} 的值无效: {value}")]
    InvalidValue { key: String, value: String },
    /// 无法从页面地址中解析课程 ID
    #[error("无法从页面地址解析课程ID: {url}")]
    CourseIdNotFound { url: String },
    /// 题库中没有该课程的答案
    #[error("[{course_id}] 无法获取当前课程的答案！")]
    CourseAnswersNotFound { course_id: String },
    /// 年级不支持期末考试
    #[error("你的年级 [{grade_level}] 暂未支持期末考试！")]
    UnsupportedGradeLevel { grade_level: String },
    /// 试卷不存在
    #[error("题库中不存在试卷: {paper}")]
    PaperNotFound { paper: String },
}
