//! 答案编解码 - 业务能力层
//!
//! 在两种答案表示之间转换：
//! - 字母形式：`"AC"`（题库里保存的形式）
//! - 序号形式：`[0, 2]`（决定点击哪些选项）

use crate::error::AnswerError;
use std::fmt;

/// 字母答案转换为从 0 开始的序号列表
///
/// A→0, B→1, ...，顺序与字母出现顺序一致。小写字母同样接受。
pub fn to_index_list(letters: &str) -> Result<Vec<usize>, AnswerError> {
    let letters = letters.trim();
    if letters.is_empty() {
        return Err(AnswerError::Empty);
    }

    letters
        .chars()
        .map(|c| {
            let upper = c.to_ascii_uppercase();
            if upper.is_ascii_uppercase() {
                Ok((upper as u8 - b'A') as usize)
            } else {
                Err(AnswerError::InvalidLetter {
                    answer: letters.to_string(),
                    letter: c,
                })
            }
        })
        .collect()
}

/// 序号列表转换回字母答案（用于显示）
pub fn to_display_letters(indices: &[usize]) -> Result<String, AnswerError> {
    indices
        .iter()
        .map(|&index| {
            if index < 26 {
                Ok((b'A' + index as u8) as char)
            } else {
                Err(AnswerError::IndexOutOfAlphabet { index })
            }
        })
        .collect()
}

/// 解析逗号分隔的数字答案，例如 `"1,3"`
///
/// 数值按原样作为点击偏移使用，不做字母序号换算。
pub fn parse_offsets(raw: &str) -> Result<Vec<usize>, AnswerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AnswerError::Empty);
    }

    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| AnswerError::InvalidOffset {
                    answer: raw.to_string(),
                })
        })
        .collect()
}

/// 答案值
///
/// 字母答案与数字答案是两种不同的表示，调用方不能混用：
/// 数字答案（来自课程答案）直接作为选项偏移，字母答案经过 A=0 换算。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    /// 字母形式，例如 `"AC"`
    Letters(String),
    /// 已解析的数字形式，例如 `"2"` 或 `"1,3"`
    Offsets(Vec<usize>),
}

impl AnswerValue {
    /// 解析原始答案字符串
    ///
    /// 全部是字母 → `Letters`；数字和逗号 → `Offsets`
    pub fn parse(raw: &str) -> Result<Self, AnswerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AnswerError::Empty);
        }

        if trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(AnswerValue::Letters(trimmed.to_ascii_uppercase()))
        } else {
            parse_offsets(trimmed).map(AnswerValue::Offsets)
        }
    }

    /// 需要点击的选项偏移（按顺序）
    pub fn option_offsets(&self) -> Result<Vec<usize>, AnswerError> {
        match self {
            AnswerValue::Letters(letters) => to_index_list(letters),
            AnswerValue::Offsets(offsets) => Ok(offsets.clone()),
        }
    }

    /// 用于提示信息的答案文本
    ///
    /// 单个数字答案显示数字本身，多个序号显示为字母。
    pub fn display(&self) -> String {
        match self {
            AnswerValue::Letters(letters) => letters.clone(),
            AnswerValue::Offsets(offsets) if offsets.len() == 1 => offsets[0].to_string(),
            AnswerValue::Offsets(offsets) => to_display_letters(offsets).unwrap_or_else(|_| {
                offsets
                    .iter()
                    .map(|o| o.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            }),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_index_list() {
        assert_eq!(to_index_list("AC").unwrap(), vec![0, 2]);
        assert_eq!(to_index_list("B").unwrap(), vec![1]);
        assert_eq!(to_index_list("ca").unwrap(), vec![2, 0]);
    }

    #[test]
    fn test_to_index_list_rejects_non_letters() {
        assert_eq!(
            to_index_list("A1"),
            Err(AnswerError::InvalidLetter {
                answer: "A1".to_string(),
                letter: '1'
            })
        );
        assert_eq!(to_index_list("  "), Err(AnswerError::Empty));
    }

    #[test]
    fn test_to_display_letters() {
        assert_eq!(to_display_letters(&[0, 2]).unwrap(), "AC");
        assert_eq!(
            to_display_letters(&[26]),
            Err(AnswerError::IndexOutOfAlphabet { index: 26 })
        );
    }

    #[test]
    fn test_round_trip_law() {
        let samples: Vec<Vec<usize>> = vec![vec![0], vec![1, 2], vec![3, 0, 25], vec![]];
        for xs in samples {
            let letters = to_display_letters(&xs).unwrap();
            if xs.is_empty() {
                assert!(letters.is_empty());
                continue;
            }
            assert_eq!(to_index_list(&letters).unwrap(), xs);
        }
    }

    #[test]
    fn test_parse_offsets_is_literal() {
        assert_eq!(parse_offsets("2").unwrap(), vec![2]);
        assert_eq!(parse_offsets("1, 3").unwrap(), vec![1, 3]);
        assert!(parse_offsets("1,x").is_err());
    }

    #[test]
    fn test_answer_value_parse_and_display() {
        let letters = AnswerValue::parse("bc").unwrap();
        assert_eq!(letters, AnswerValue::Letters("BC".to_string()));
        assert_eq!(letters.option_offsets().unwrap(), vec![1, 2]);
        assert_eq!(letters.display(), "BC");

        let single = AnswerValue::parse("2").unwrap();
        assert_eq!(single.option_offsets().unwrap(), vec![2]);
        assert_eq!(single.display(), "2");

        let multi = AnswerValue::parse("1,3").unwrap();
        assert_eq!(multi.display(), "BD");
    }
}
