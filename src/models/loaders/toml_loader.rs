use crate::models::params::StitchParameters;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载拼接参数
///
/// 文件中未出现的字段保持默认值
pub async fn load_params(toml_file_path: &Path) -> Result<StitchParameters> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取参数文件: {}", toml_file_path.display()))?;

    let params: StitchParameters = toml::from_str(&content)
        .with_context(|| format!("无法解析参数文件: {}", toml_file_path.display()))?;

    tracing::info!("已加载参数文件: {}", toml_file_path.display());
    tracing::debug!("拼接参数: {:?}", params);

    Ok(params)
}
