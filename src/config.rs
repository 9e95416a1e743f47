use crate::error::ConfigError;
use crate::services::answer_matcher::DEFAULT_MIN_SIMILARITY;
use std::str::FromStr;

/// 考试类型
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExamKind {
    /// 单个课程的课后答题（按顺序作答）
    Course,
    /// 期末考试（按题目文本匹配题库）
    Final,
}

impl FromStr for ExamKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "course" => Ok(ExamKind::Course),
            "final" => Ok(ExamKind::Final),
            other => Err(ConfigError::InvalidValue {
                key: "EXAM_KIND".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// 考试页面的元素选择器
#[derive(Clone, Debug)]
pub struct PageSelectors {
    /// "开始答题"按钮
    pub start_button: String,
    /// 第一题的"下一题"按钮
    pub primary_next_button: String,
    /// 第二题起的"下一题"按钮
    pub secondary_next_button: String,
    /// 题目
    pub question: String,
    /// 选项
    pub option: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        let exam_box = "#app > div > div.home-container > div > div > div > div > div";
        Self {
            start_button: format!("{} > button", exam_box),
            primary_next_button: format!("{} > div.exam-content-btnbox > button", exam_box),
            secondary_next_button: format!(
                "{} > div.exam-content-btnbox > div > button.ant-btn-primary",
                exam_box
            ),
            question: ".exam-content-question".to_string(),
            option: ".exam-single-content-box".to_string(),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 考试页面 URL
    pub target_url: String,
    /// 优先复用标题包含该文本的页面
    pub target_title: Option<String>,
    /// 是否启动无头浏览器（否则连接已打开的浏览器）
    pub headless: bool,
    /// 浏览器可执行文件路径（无头模式）
    pub chrome_executable: Option<String>,
    /// 答案库 TOML 文件
    pub answer_library: String,
    /// 考试类型
    pub exam_kind: ExamKind,
    /// 课程 ID（为空时从页面地址解析）
    pub course_id: Option<String>,
    /// 账号年级（期末考试用）
    pub grade_level: Option<String>,
    /// 全自动模式：自动点击"下一题"
    pub full_automatic: bool,
    /// 课程答题的最大题数
    pub question_limit: usize,
    /// 期末考试的最大题数
    pub final_exam_limit: usize,
    /// 模糊匹配最低相似度
    pub min_similarity: f64,
    /// 点击"下一题"后等待页面切换的时间
    pub settle_delay_ms: u64,
    /// 等待元素时的轮询间隔
    pub poll_interval_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 页面选择器
    pub selectors: PageSelectors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            target_url: "https://www.2-class.com/courses".to_string(),
            target_title: None,
            headless: false,
            chrome_executable: None,
            answer_library: "answers.toml".to_string(),
            exam_kind: ExamKind::Course,
            course_id: None,
            grade_level: None,
            full_automatic: false,
            question_limit: 100,
            final_exam_limit: 10,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            settle_delay_ms: 200,
            poll_interval_ms: 100,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            selectors: PageSelectors::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置，缺失的项使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let default_selectors = default.selectors.clone();

        Ok(Self {
            browser_debug_port: parse_or(&lookup, "BROWSER_DEBUG_PORT", default.browser_debug_port)?,
            target_url: lookup("TARGET_URL").unwrap_or(default.target_url),
            target_title: lookup("TARGET_TITLE").filter(|v| !v.is_empty()),
            headless: parse_or(&lookup, "HEADLESS", default.headless)?,
            chrome_executable: lookup("CHROME_EXECUTABLE").filter(|v| !v.is_empty()),
            answer_library: lookup("ANSWER_LIBRARY").unwrap_or(default.answer_library),
            exam_kind: parse_or(&lookup, "EXAM_KIND", default.exam_kind)?,
            course_id: lookup("COURSE_ID").filter(|v| !v.is_empty()),
            grade_level: lookup("GRADE_LEVEL").filter(|v| !v.is_empty()),
            full_automatic: parse_or(&lookup, "FULL_AUTOMATIC", default.full_automatic)?,
            question_limit: parse_or(&lookup, "QUESTION_LIMIT", default.question_limit)?,
            final_exam_limit: parse_or(&lookup, "FINAL_EXAM_LIMIT", default.final_exam_limit)?,
            min_similarity: parse_similarity(&lookup, default.min_similarity)?,
            settle_delay_ms: parse_or(&lookup, "SETTLE_DELAY_MS", default.settle_delay_ms)?,
            poll_interval_ms: parse_or(&lookup, "POLL_INTERVAL_MS", default.poll_interval_ms)?,
            verbose_logging: parse_or(&lookup, "VERBOSE_LOGGING", default.verbose_logging)?,
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            selectors: PageSelectors {
                start_button: lookup("START_BUTTON_SELECTOR")
                    .unwrap_or(default_selectors.start_button),
                primary_next_button: lookup("PRIMARY_NEXT_SELECTOR")
                    .unwrap_or(default_selectors.primary_next_button),
                secondary_next_button: lookup("SECONDARY_NEXT_SELECTOR")
                    .unwrap_or(default_selectors.secondary_next_button),
                question: lookup("QUESTION_SELECTOR").unwrap_or(default_selectors.question),
                option: lookup("OPTION_SELECTOR").unwrap_or(default_selectors.option),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

/// 相似度阈值必须是 (0, 1] 之间的有限数
fn parse_similarity<F>(lookup: &F, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let key = "MIN_SIMILARITY";
    let value = parse_or(lookup, key, default)?;
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: lookup(key).unwrap_or_else(|| value.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.question_limit, 100);
        assert_eq!(config.final_exam_limit, 10);
        assert_eq!(config.settle_delay_ms, 200);
        assert_eq!(config.exam_kind, ExamKind::Course);
        assert!(!config.full_automatic);
        assert_eq!(config.selectors.question, ".exam-content-question");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("EXAM_KIND", "Final"),
            ("FULL_AUTOMATIC", "true"),
            ("GRADE_LEVEL", "七年级"),
            ("MIN_SIMILARITY", "0.8"),
            ("OPTION_SELECTOR", ".option"),
        ]))
        .unwrap();
        assert_eq!(config.exam_kind, ExamKind::Final);
        assert!(config.full_automatic);
        assert_eq!(config.grade_level.as_deref(), Some("七年级"));
        assert!((config.min_similarity - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.selectors.option, ".option");
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let err = Config::from_lookup(lookup_from(&[("QUESTION_LIMIT", "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "QUESTION_LIMIT".to_string(),
                value: "lots".to_string()
            }
        );
    }

    #[test]
    fn test_min_similarity_out_of_range_is_rejected() {
        for raw in ["-1", "0", "1.5", "NaN", "inf"] {
            let err = Config::from_lookup(lookup_from(&[("MIN_SIMILARITY", raw)])).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    key: "MIN_SIMILARITY".to_string(),
                    value: raw.to_string()
                }
            );
        }

        let config = Config::from_lookup(lookup_from(&[("MIN_SIMILARITY", "1")])).unwrap();
        assert_eq!(config.min_similarity, 1.0);
    }
}
