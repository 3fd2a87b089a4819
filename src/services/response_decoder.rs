//! 响应解码 - 业务能力层
//!
//! 把拼接服务的原始响应解释为结果图片或错误消息

use crate::clients::StitchReply;
use crate::error::StitchError;
use serde::Deserialize;
use tracing::debug;

/// 无法得到任何错误描述时使用的通用消息
pub const FALLBACK_MESSAGE: &str = "拼接图片时出现未知错误";

/// 结构化错误响应
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// 成功响应解出的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// 从失败响应中提取错误消息
///
/// 顺序：`{"detail": "..."}` 中的字符串 → 原始响应文本 → 带状态码的占位消息
pub fn decode_failure_message(reply: &StitchReply) -> String {
    let placeholder = || format!("服务返回状态码 {}", reply.status);

    if let Ok(body) = serde_json::from_slice::<ErrorBody>(&reply.body) {
        if let Some(serde_json::Value::String(detail)) = body.detail {
            let detail = detail.trim();
            return if detail.is_empty() {
                placeholder()
            } else {
                detail.to_string()
            };
        }
        debug!("错误响应中没有字符串类型的 detail，改用原始文本");
    }

    let text = String::from_utf8_lossy(&reply.body);
    let text = text.trim();
    if text.is_empty() {
        placeholder()
    } else {
        text.to_string()
    }
}

/// 把成功响应解释为图片
///
/// 响应体为空或声明了非图片类型时返回 Decode 错误；未声明类型时按 JPEG 处理
pub fn decode_image(reply: StitchReply) -> Result<DecodedImage, StitchError> {
    if reply.body.is_empty() {
        return Err(StitchError::Decode {
            reason: "响应体为空".to_string(),
        });
    }

    let media_type = match reply.media_type {
        Some(declared) => {
            let essence = declared
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            if !essence.starts_with("image/") {
                return Err(StitchError::Decode {
                    reason: format!("响应类型不是图片: {}", declared),
                });
            }
            essence
        }
        None => "image/jpeg".to_string(),
    };

    Ok(DecodedImage {
        media_type,
        bytes: reply.body,
    })
}
