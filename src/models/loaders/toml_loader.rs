use crate::models::library::AnswerLibrary;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载答案库
pub async fn load_answer_library(toml_file_path: &Path) -> Result<AnswerLibrary> {
    if !toml_file_path.exists() {
        anyhow::bail!("答案库文件不存在: {}", toml_file_path.display());
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let mut library: AnswerLibrary = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    library.file_path = Some(toml_file_path.to_string_lossy().to_string());

    tracing::info!(
        "✓ 已加载答案库: {} 个课程, {} 套试卷",
        library.courses.len(),
        library.papers.len()
    );

    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_answer_library_from_file() {
        let path = std::env::temp_dir().join(format!(
            "exam_emulator_library_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[courses]\n\"42\" = [\"1\", \"0,2\"]\n").unwrap();

        let library = load_answer_library(&path).await.unwrap();
        assert_eq!(library.course_answers("42").unwrap(), ["1", "0,2"]);
        assert_eq!(
            library.file_path.as_deref(),
            Some(path.to_string_lossy().as_ref())
        );

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let result = load_answer_library(Path::new("/nonexistent/answers.toml")).await;
        assert!(result.is_err());
    }
}
