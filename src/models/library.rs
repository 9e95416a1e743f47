use crate::error::ConfigError;
use crate::models::question::AnswerBankEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 答案库
///
/// TOML 结构：
///
/// ```toml
/// [courses]
/// "1234" = ["2", "1,3"]
///
/// [supported_final]
/// "七年级" = "final_grade7"
///
/// [[papers.final_grade7]]
/// question = "毒品的危害有哪些？"
/// answer = "AC"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerLibrary {
    /// 课程 ID → 按题目顺序排列的答案
    #[serde(default, deserialize_with = "deserialize_courses")]
    pub courses: HashMap<String, Vec<String>>,
    /// 试卷名 → 题库
    #[serde(default)]
    pub papers: HashMap<String, Vec<AnswerBankEntry>>,
    /// 年级 → 期末考试试卷名
    #[serde(default)]
    pub supported_final: HashMap<String, String>,
    /// 加载来源（仅用于日志）
    #[serde(skip)]
    pub file_path: Option<String>,
}

impl AnswerLibrary {
    /// 获取课程答案
    pub fn course_answers(&self, course_id: &str) -> Result<&[String], ConfigError> {
        self.courses
            .get(course_id)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::CourseAnswersNotFound {
                course_id: course_id.to_string(),
            })
    }

    /// 根据年级获取期末考试题库，返回 (试卷名, 题库)
    pub fn final_paper(
        &self,
        grade_level: &str,
    ) -> Result<(&str, &[AnswerBankEntry]), ConfigError> {
        let paper = self.supported_final.get(grade_level).ok_or_else(|| {
            ConfigError::UnsupportedGradeLevel {
                grade_level: grade_level.to_string(),
            }
        })?;

        let entries = self
            .papers
            .get(paper)
            .ok_or_else(|| ConfigError::PaperNotFound {
                paper: paper.clone(),
            })?;

        Ok((paper.as_str(), entries.as_slice()))
    }
}

// 课程答案里单选可能直接写成整数，统一读成字符串
fn deserialize_courses<'de, D>(deserializer: D) -> Result<HashMap<String, Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAnswer {
        Text(String),
        Number(u64),
    }

    let raw: HashMap<String, Vec<RawAnswer>> = HashMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(course_id, answers)| {
            let answers = answers
                .into_iter()
                .map(|answer| match answer {
                    RawAnswer::Text(text) => text,
                    RawAnswer::Number(number) => number.to_string(),
                })
                .collect();
            (course_id, answers)
        })
        .collect())
}
