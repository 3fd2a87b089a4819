use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 拼接请求错误
    #[error("拼接错误: {0}")]
    Stitch(#[from] StitchError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

/// 输入槽校验错误
///
/// 只在输入槽内部产生，不会进入请求流程，也不会影响请求状态
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 不支持的媒体类型
    #[error("不支持的图片类型: {media_type}，请选择 JPG/PNG/WEBP 图片")]
    UnsupportedMediaType { media_type: String },
}

/// 拼接请求错误
///
/// 所有变体最终都会被编排器归一化为一条错误记录
#[derive(Debug, Error)]
pub enum StitchError {
    /// 构建请求体失败
    #[error("构建请求失败: {reason}")]
    Payload { reason: String },
    /// 网络请求失败（尚未收到响应）
    #[error("网络请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务返回错误响应
    #[error("{message}")]
    Service { status: u16, message: String },
    /// 响应存在但无法解析
    #[error("无法解析服务响应: {reason}")]
    Decode { reason: String },
    /// 没有可用的异步运行时，请求未发出
    #[error("无法发起请求: {reason}")]
    Dispatch { reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 命令行参数缺失
    #[error("缺少参数: {name}")]
    MissingArgument { name: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

impl StitchError {
    /// 创建网络请求失败错误
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StitchError::Transport {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 错误记录中展示给用户的消息
    ///
    /// 服务错误直接使用服务端给出的消息，其他错误使用完整的错误链描述
    pub fn user_message(&self) -> String {
        match self {
            StitchError::Service { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_message_is_verbatim() {
        let err = StitchError::Service {
            status: 422,
            message: "bad image".to_string(),
        };
        assert_eq!(err.user_message(), "bad image");
        assert_eq!(err.to_string(), "bad image");
    }

    #[test]
    fn test_validation_error_wraps_into_app_error() {
        let err: AppError = ValidationError::UnsupportedMediaType {
            media_type: "text/plain".to_string(),
        }
        .into();
        assert!(err.to_string().contains("text/plain"));
    }

    #[test]
    fn test_missing_argument_message() {
        let err: AppError = ConfigError::MissingArgument {
            name: "image2".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "配置错误: 缺少参数: image2");
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = StitchError::transport("http://localhost/stitch", io);
        let msg = err.user_message();
        assert!(msg.contains("http://localhost/stitch"));
        assert!(msg.contains("refused"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
