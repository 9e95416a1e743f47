//! 考试任务 - 编排层
//!
//! 根据配置和答案库准备一场考试需要的参数和答案解析策略：
//! - 课程答题：按顺序使用课程答案
//! - 期末考试：按年级选择题库，按题目文本匹配

use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::models::AnswerLibrary;
use crate::services::{AnswerMatcher, BankResolver, PositionalResolver};
use crate::workflow::{ExamMode, ExamOptions};
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info};

/// 从课程页面地址中解析课程 ID（路径中的第一个数字串）
pub fn course_id_from_url(url: &str) -> Option<String> {
    let path = match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            rest.find('/').map(|i| &rest[i..]).unwrap_or("")
        }
        None => url,
    };

    let re = Regex::new(r"\d+").ok()?;
    re.find(path).map(|m| m.as_str().to_string())
}

/// 准备课程答题
pub fn build_course_exam(
    config: &Config,
    library: &AnswerLibrary,
    course_id: &str,
) -> Result<(ExamOptions, PositionalResolver)> {
    let answers = library.course_answers(course_id)?;
    let resolver = PositionalResolver::from_raw(answers)?;
    let limit = answers.len().min(config.question_limit);

    info!("[{}] 课程共 {} 个答案", course_id, answers.len());
    debug!("[{}] 课程答案: {:?}", course_id, answers);

    let options = base_options(format!("答题 [{}]", course_id), config).with_limit(limit);
    Ok((options, resolver))
}

/// 准备期末考试
pub fn build_final_exam(
    config: &Config,
    library: &AnswerLibrary,
) -> Result<(ExamOptions, BankResolver)> {
    let grade_level = config
        .grade_level
        .as_deref()
        .ok_or_else(|| ConfigError::Missing {
            key: "GRADE_LEVEL".to_string(),
        })?;

    let (paper, entries) = library.final_paper(grade_level)?;
    info!(
        "[{}] 使用期末考试题库 {} ({} 道题)",
        grade_level,
        paper,
        entries.len()
    );

    let resolver = BankResolver::new(entries, AnswerMatcher::new(config.min_similarity))?;
    let options = base_options("期末考试", config).with_limit(config.final_exam_limit);
    Ok((options, resolver))
}

fn base_options(name: impl Into<String>, config: &Config) -> ExamOptions {
    let mode = if config.full_automatic {
        ExamMode::FullAutomatic
    } else {
        ExamMode::Manual
    };

    ExamOptions::new(name, &config.selectors)
        .with_mode(mode)
        .with_settle_delay(Duration::from_millis(config.settle_delay_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::AnswerResolver;

    fn library() -> AnswerLibrary {
        toml::from_str(
            r#"
[courses]
"1024" = ["2", "1,3", "0"]

[supported_final]
"七年级" = "grade7"

[[papers.grade7]]
question = "Drugs are harmful"
answer = "A"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_course_id_from_url() {
        assert_eq!(
            course_id_from_url("https://www.2-class.com/courses/exams/1024?from=7").as_deref(),
            Some("1024")
        );
        assert_eq!(course_id_from_url("/courses/exams/88").as_deref(), Some("88"));
        // 主机名中的数字不算
        assert_eq!(course_id_from_url("https://www.2-class.com/courses"), None);
    }

    #[test]
    fn test_build_course_exam() {
        let config = Config::default();
        let (options, resolver) = build_course_exam(&config, &library(), "1024").unwrap();
        assert_eq!(options.name, "答题 [1024]");
        assert_eq!(options.limit, 3);
        assert_eq!(options.mode, ExamMode::Manual);
        assert_eq!(resolver.remaining(), 3);
    }

    #[test]
    fn test_course_limit_capped_by_config() {
        let config = Config {
            question_limit: 2,
            full_automatic: true,
            ..Config::default()
        };
        let (options, _) = build_course_exam(&config, &library(), "1024").unwrap();
        assert_eq!(options.limit, 2);
        assert!(options.is_full_automatic());
    }

    #[test]
    fn test_unknown_course() {
        let err = build_course_exam(&Config::default(), &library(), "1").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::CourseAnswersNotFound { .. })
        ));
    }

    #[test]
    fn test_build_final_exam() {
        let config = Config {
            grade_level: Some("七年级".to_string()),
            ..Config::default()
        };
        let (options, resolver) = build_final_exam(&config, &library()).unwrap();
        assert_eq!(options.name, "期末考试");
        assert_eq!(options.limit, 10);
        assert_eq!(resolver.remaining(), 1);
    }

    #[test]
    fn test_final_exam_requires_supported_grade() {
        let missing = build_final_exam(&Config::default(), &library()).unwrap_err();
        assert!(matches!(missing, AppError::Config(ConfigError::Missing { .. })));

        let config = Config {
            grade_level: Some("九年级".to_string()),
            ..Config::default()
        };
        let err = build_final_exam(&config, &library()).unwrap_err();
        assert_eq!(err.to_string(), "配置错误: 你的年级 [九年级] 暂未支持期末考试！");
    }
}
