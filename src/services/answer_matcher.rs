//! 题目匹配服务 - 业务能力层
//!
//! 在题库中查找与页面题目对应的答案：
//! 1. 精确匹配（去掉首尾空白、合并换行后逐字节比较）
//! 2. 模糊匹配（去掉所有空白和标点后，按最长公共子串计算相似度）
//!
//! 两个阶段都找不到时返回 [`MatchOutcome::NoMatch`]，绝不编造答案。

use crate::error::AnswerError;
use crate::models::AnswerBankEntry;
use crate::services::answer_codec::AnswerValue;
use tracing::debug;

/// 模糊匹配的默认最低相似度
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.6;

/// 匹配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub answer: AnswerValue,
    /// 题库中匹配到的题目；位置模式下为 None，此时显示页面上的题目
    pub matched_question: Option<String>,
}

/// 答案解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// 精确匹配
    Exact(MatchResult),
    /// 模糊匹配
    Approximate { result: MatchResult, score: f64 },
    /// 按顺序取出的答案（不比对题目）
    Positional(MatchResult),
    /// 没有找到答案
    NoMatch,
}

impl MatchOutcome {
    pub fn result(&self) -> Option<&MatchResult> {
        match self {
            MatchOutcome::Exact(result)
            | MatchOutcome::Approximate { result, .. }
            | MatchOutcome::Positional(result) => Some(result),
            MatchOutcome::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        !matches!(self, MatchOutcome::NoMatch)
    }
}

/// 已校验过答案格式的题库
#[derive(Debug, Clone, Default)]
pub struct AnswerBank {
    items: Vec<BankItem>,
}

#[derive(Debug, Clone)]
struct BankItem {
    question: String,
    exact_key: String,
    fuzzy_key: Vec<char>,
    answer: AnswerValue,
}

impl AnswerBank {
    /// 从题库条目构建，任何一条答案格式错误都会失败
    pub fn from_entries(entries: &[AnswerBankEntry]) -> Result<Self, AnswerError> {
        let items = entries
            .iter()
            .map(|entry| {
                Ok(BankItem {
                    question: entry.question.clone(),
                    exact_key: exact_key(&entry.question),
                    fuzzy_key: fuzzy_key(&entry.question),
                    answer: AnswerValue::parse(&entry.answer)?,
                })
            })
            .collect::<Result<Vec<_>, AnswerError>>()?;
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 题目匹配器
#[derive(Debug, Clone)]
pub struct AnswerMatcher {
    min_similarity: f64,
}

impl Default for AnswerMatcher {
    fn default() -> Self {
        Self {
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }
}

impl AnswerMatcher {
    /// 阈值不是有限数时使用默认值
    pub fn new(min_similarity: f64) -> Self {
        let min_similarity = if min_similarity.is_finite() {
            min_similarity.clamp(0.0, 1.0)
        } else {
            DEFAULT_MIN_SIMILARITY
        };
        Self { min_similarity }
    }

    /// 在题库中查找答案
    pub fn find(&self, bank: &AnswerBank, displayed: &str) -> MatchOutcome {
        if let Some(result) = self.find_exact(bank, displayed) {
            return MatchOutcome::Exact(result);
        }

        match self.find_approximate(bank, displayed) {
            Some((result, score)) => MatchOutcome::Approximate { result, score },
            None => MatchOutcome::NoMatch,
        }
    }

    /// 精确匹配，题库顺序靠前的优先
    fn find_exact(&self, bank: &AnswerBank, displayed: &str) -> Option<MatchResult> {
        let key = exact_key(displayed);
        bank.items
            .iter()
            .find(|item| item.exact_key == key)
            .map(BankItem::to_result)
    }

    /// 模糊匹配，返回相似度最高且不低于阈值的条目
    fn find_approximate(&self, bank: &AnswerBank, displayed: &str) -> Option<(MatchResult, f64)> {
        let key = fuzzy_key(displayed);
        if key.is_empty() {
            return None;
        }

        let mut best: Option<(&BankItem, f64)> = None;
        for item in &bank.items {
            let score = similarity(&key, &item.fuzzy_key);
            // 相同分数保留靠前的条目
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((item, score));
            }
        }

        let (item, score) = best?;
        debug!(
            "模糊匹配最佳候选: {} (相似度: {:.2}, 阈值: {:.2})",
            item.question, score, self.min_similarity
        );

        // 完全没有公共部分的题目永远不算匹配
        if score > 0.0 && score >= self.min_similarity {
            Some((item.to_result(), score))
        } else {
            None
        }
    }
}

impl BankItem {
    fn to_result(&self) -> MatchResult {
        MatchResult {
            answer: self.answer.clone(),
            matched_question: Some(self.question.clone()),
        }
    }
}

/// 精确匹配使用的文本：合并换行并去掉首尾空白，保留行内空白
pub fn exact_key(text: &str) -> String {
    text.lines().map(str::trim).collect::<String>()
}

/// 模糊匹配使用的文本：只保留字母、数字和汉字，统一小写
pub fn fuzzy_key(text: &str) -> Vec<char> {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// 相似度：最长公共子串长度 / 较长文本长度
///
/// 一方包含另一方时直接取 短/长。
pub fn similarity(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let common = if longer.windows(shorter.len()).any(|w| w == shorter) {
        shorter.len()
    } else {
        longest_common_substring(a, b)
    };

    common as f64 / longer.len() as f64
}

fn longest_common_substring(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    let mut best = 0;

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb { previous[j] + 1 } else { 0 };
            best = best.max(current[j + 1]);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(entries: &[(&str, &str)]) -> AnswerBank {
        let entries: Vec<AnswerBankEntry> = entries
            .iter()
            .map(|(q, a)| AnswerBankEntry::new(*q, *a))
            .collect();
        AnswerBank::from_entries(&entries).unwrap()
    }

    #[test]
    fn test_exact_match_returns_stored_question() {
        let bank = bank(&[("Drugs are harmful", "A"), ("Report suspicious activity", "BC")]);
        let outcome = AnswerMatcher::default().find(&bank, "  Report suspicious activity\n");

        assert_eq!(
            outcome,
            MatchOutcome::Exact(MatchResult {
                answer: AnswerValue::Letters("BC".to_string()),
                matched_question: Some("Report suspicious activity".to_string()),
            })
        );
    }

    #[test]
    fn test_exact_phase_takes_priority_over_earlier_fuzzy_candidate() {
        let bank = bank(&[("Drugs  are harmful", "B"), ("Drugs are harmful", "A")]);
        let outcome = AnswerMatcher::default().find(&bank, "Drugs are harmful");

        match outcome {
            MatchOutcome::Exact(result) => {
                assert_eq!(result.answer, AnswerValue::Letters("A".to_string()))
            }
            other => panic!("expected exact match, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_questions_first_wins() {
        let bank = bank(&[("Same question", "A"), ("Same question", "D")]);
        let outcome = AnswerMatcher::default().find(&bank, "Same question");
        assert_eq!(
            outcome.result().unwrap().answer,
            AnswerValue::Letters("A".to_string())
        );
    }

    #[test]
    fn test_approximate_match_on_formatting_differences() {
        let bank = bank(&[("Drugs are harmful", "A"), ("Report suspicious activity", "BC")]);
        let matcher = AnswerMatcher::default();

        match matcher.find(&bank, "Report suspicious  activity") {
            MatchOutcome::Approximate { result, score } => {
                assert_eq!(result.answer, AnswerValue::Letters("BC".to_string()));
                assert_eq!(
                    result.matched_question.as_deref(),
                    Some("Report suspicious activity")
                );
                assert!((score - 1.0).abs() < f64::EPSILON);
            }
            other => panic!("expected approximate match, got {:?}", other),
        }

        match matcher.find(&bank, "Drugs are harmful.") {
            MatchOutcome::Approximate { result, .. } => {
                assert_eq!(result.answer, AnswerValue::Letters("A".to_string()))
            }
            other => panic!("expected approximate match, got {:?}", other),
        }
    }

    #[test]
    fn test_approximate_prefers_highest_similarity() {
        let bank = bank(&[
            ("吸毒会损害身体健康吗", "A"),
            ("发现可疑情况应当及时向公安机关报告", "C"),
        ]);
        let outcome = AnswerMatcher::default().find(&bank, "1. 发现可疑情况应当及时向公安机关报告。");
        assert_eq!(
            outcome.result().unwrap().answer,
            AnswerValue::Letters("C".to_string())
        );
    }

    #[test]
    fn test_no_match_below_floor() {
        let bank = bank(&[("Drugs are harmful", "A")]);
        let outcome = AnswerMatcher::default().find(&bank, "What is the capital of France");
        assert_eq!(outcome, MatchOutcome::NoMatch);
        assert!(outcome.result().is_none());
    }

    #[test]
    fn test_empty_bank_and_empty_question() {
        let matcher = AnswerMatcher::default();
        assert_eq!(matcher.find(&AnswerBank::default(), "anything"), MatchOutcome::NoMatch);

        let bank = bank(&[("Drugs are harmful", "A")]);
        assert_eq!(matcher.find(&bank, "   "), MatchOutcome::NoMatch);
    }

    #[test]
    fn test_invalid_bank_answer_rejected() {
        let entries = vec![AnswerBankEntry::new("q", "A?")];
        assert!(AnswerBank::from_entries(&entries).is_err());
    }

    #[test]
    fn test_similarity_values() {
        let a = fuzzy_key("abcdef");
        let b = fuzzy_key("abcxyz");
        assert!((similarity(&a, &b) - 0.5).abs() < 1e-9);

        let contained = fuzzy_key("abc");
        assert!((similarity(&contained, &a) - 0.5).abs() < 1e-9);
        assert_eq!(similarity(&[], &a), 0.0);
    }

    #[test]
    fn test_zero_floor_never_matches_unrelated_text() {
        let bank = bank(&[("Drugs are harmful", "A"), ("Report suspicious activity", "BC")]);
        for floor in [0.0, -1.0] {
            let matcher = AnswerMatcher::new(floor);
            assert_eq!(matcher.find(&bank, "完全无关的题目"), MatchOutcome::NoMatch);
        }
    }

    #[test]
    fn test_non_finite_floor_falls_back_to_default() {
        let bank = bank(&[("Report suspicious activity", "BC")]);
        let matcher = AnswerMatcher::new(f64::NAN);
        assert!(matches!(
            matcher.find(&bank, "Report suspicious  activity"),
            MatchOutcome::Approximate { .. }
        ));
    }
}
