use std::path::Path;

use tokio::fs;

use crate::error::{AppError, AppResult};

/// 读取待出题的纯文本文档
pub async fn load_document(path: &Path) -> AppResult<String> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    tracing::info!(
        "📄 已读取文档: {} ({} 字符)",
        path.file_name().unwrap_or_default().to_string_lossy(),
        text.chars().count()
    );

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileError;

    #[tokio::test]
    async fn test_missing_document_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("missing.txt"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }
}
