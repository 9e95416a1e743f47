//! 答案解析策略 - 业务能力层
//!
//! - [`PositionalResolver`]：按顺序取答案，不看题目
//! - [`BankResolver`]：按题目文本在题库中匹配

use crate::error::AnswerError;
use crate::models::AnswerBankEntry;
use crate::services::answer_codec::AnswerValue;
use crate::services::answer_matcher::{AnswerBank, AnswerMatcher, MatchOutcome, MatchResult};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// 答案解析能力
pub trait AnswerResolver: Send {
    /// 根据页面题目解析答案
    fn resolve(&mut self, question_text: &str) -> MatchOutcome;

    /// 剩余可用答案数（题库模式下为题库大小）
    fn remaining(&self) -> usize;
}

/// 按顺序作答
#[derive(Debug, Clone)]
pub struct PositionalResolver {
    pending: VecDeque<AnswerValue>,
}

impl PositionalResolver {
    /// 从原始答案列表构建（"2"、"1,3"、"AC" 等）
    pub fn from_raw<S: AsRef<str>>(answers: &[S]) -> Result<Self, AnswerError> {
        let pending = answers
            .iter()
            .map(|raw| AnswerValue::parse(raw.as_ref()))
            .collect::<Result<VecDeque<_>, _>>()?;
        Ok(Self { pending })
    }
}

impl AnswerResolver for PositionalResolver {
    fn resolve(&mut self, question_text: &str) -> MatchOutcome {
        match self.pending.pop_front() {
            Some(answer) => {
                debug!("按顺序取出答案 {} (题目: {})", answer, question_text);
                MatchOutcome::Positional(MatchResult {
                    answer,
                    matched_question: None,
                })
            }
            None => {
                warn!("⚠️ 答案已用完，无法回答: {}", question_text);
                MatchOutcome::NoMatch
            }
        }
    }

    fn remaining(&self) -> usize {
        self.pending.len()
    }
}

/// 按题目文本匹配题库
#[derive(Debug, Clone)]
pub struct BankResolver {
    bank: AnswerBank,
    matcher: AnswerMatcher,
}

impl BankResolver {
    pub fn new(entries: &[AnswerBankEntry], matcher: AnswerMatcher) -> Result<Self, AnswerError> {
        Ok(Self {
            bank: AnswerBank::from_entries(entries)?,
            matcher,
        })
    }
}

impl AnswerResolver for BankResolver {
    fn resolve(&mut self, question_text: &str) -> MatchOutcome {
        let outcome = self.matcher.find(&self.bank, question_text);
        match &outcome {
            MatchOutcome::Exact(_) => debug!("✓ 精确匹配: {}", question_text),
            MatchOutcome::Approximate { score, .. } => {
                debug!("✓ 模糊匹配 (相似度: {:.2}): {}", score, question_text)
            }
            MatchOutcome::Positional(_) => {}
            MatchOutcome::NoMatch => warn!("⚠️ 题库中未找到题目: {}", question_text),
        }
        outcome
    }

    fn remaining(&self) -> usize {
        self.bank.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_consumes_in_order() {
        let mut resolver = PositionalResolver::from_raw(&["2", "1,3"]).unwrap();
        assert_eq!(resolver.remaining(), 2);

        let first = resolver.resolve("ignored");
        assert_eq!(
            first,
            MatchOutcome::Positional(MatchResult {
                answer: AnswerValue::Offsets(vec![2]),
                matched_question: None,
            })
        );
        let second = resolver.resolve("also ignored");
        assert_eq!(
            second.result().unwrap().answer,
            AnswerValue::Offsets(vec![1, 3])
        );
        assert_eq!(resolver.resolve("nothing left"), MatchOutcome::NoMatch);
        assert_eq!(resolver.remaining(), 0);
    }

    #[test]
    fn test_positional_rejects_bad_answers() {
        assert!(PositionalResolver::from_raw(&["2", "??"]).is_err());
    }

    #[test]
    fn test_bank_resolver_does_not_consume() {
        let entries = vec![AnswerBankEntry::new("Drugs are harmful", "A")];
        let mut resolver = BankResolver::new(&entries, AnswerMatcher::default()).unwrap();

        assert!(resolver.resolve("Drugs are harmful").is_match());
        assert!(resolver.resolve("Drugs are harmful").is_match());
        assert_eq!(resolver.remaining(), 1);
    }
}
