use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use crate::error::{AppError, AppResult, FileError};

/// 将记录写成 JSON Lines 文件（每行一个 JSON 对象）
///
/// 父目录不存在时会自动创建，已存在的文件会被覆盖。
pub async fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
    }

    let mut content = String::new();
    for record in records {
        content.push_str(&serde_json::to_string(record)?);
        content.push('\n');
    }

    fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    tracing::debug!("已写入 {} 条记录: {}", records.len(), path.display());
    Ok(())
}

/// 读取 JSON Lines 文件，空行会被忽略
pub async fn read_jsonl<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| {
            AppError::File(FileError::JsonlParseFailed {
                path: path.display().to_string(),
                line: index + 1,
                source,
            })
        })?;
        records.push(record);
    }

    Ok(records)
}
