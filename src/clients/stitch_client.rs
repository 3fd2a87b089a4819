/// 拼接服务 HTTP 客户端
///
/// 以 multipart/form-data 的形式提交两张图片和算法参数
use crate::clients::stitch_service::{StitchPayload, StitchReply, StitchService};
use crate::config::Config;
use crate::error::StitchError;
use crate::models::image_file::ImageFile;
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, warn};

/// 拼接服务客户端
pub struct HttpStitchClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpStitchClient {
    /// 创建新的拼接服务客户端
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("无法创建 HTTP 客户端")?;

        Ok(Self {
            http,
            endpoint: config.stitch_endpoint(),
        })
    }

    /// 发送拼接请求
    ///
    /// # 参数
    /// - `payload`: 两张图片与八个算法参数
    ///
    /// # 返回
    /// 返回服务的原始响应；网络失败或成功响应体无法读取时返回错误
    pub async fn send(&self, payload: StitchPayload) -> Result<StitchReply, StitchError> {
        let form = build_form(&payload)?;

        debug!(
            "POST {} (图片1: {} 字节, 图片2: {} 字节)",
            self.endpoint,
            payload.image1.len(),
            payload.image2.len()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StitchError::transport(&self.endpoint, e))?;

        let status = response.status();
        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        debug!("拼接服务响应: {} ({:?})", status, media_type);

        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) if status.is_success() => {
                return Err(StitchError::Decode {
                    reason: format!("读取响应体失败: {}", e),
                });
            }
            Err(e) => {
                // 失败响应读不到正文时，由错误解码器使用占位消息
                warn!("读取错误响应体失败: {}", e);
                Vec::new()
            }
        };

        Ok(StitchReply {
            status: status.as_u16(),
            media_type,
            body,
        })
    }
}

impl StitchService for HttpStitchClient {
    fn stitch(&self, payload: StitchPayload) -> BoxFuture<'_, Result<StitchReply, StitchError>> {
        self.send(payload).boxed()
    }
}

/// 构建 multipart 表单
fn build_form(payload: &StitchPayload) -> Result<Form, StitchError> {
    let mut form = Form::new()
        .part("image1", image_part(&payload.image1)?)
        .part("image2", image_part(&payload.image2)?);

    for (name, value) in payload.text_fields() {
        form = form.text(name, value);
    }

    Ok(form)
}

fn image_part(file: &ImageFile) -> Result<Part, StitchError> {
    Part::bytes(file.bytes().to_vec())
        .file_name(file.name().to_string())
        .mime_str(file.media_type())
        .map_err(|e| StitchError::Payload {
            reason: format!("{} 的媒体类型无效: {}", file.name(), e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::params::StitchParameters;

    fn payload(media_type: &str) -> StitchPayload {
        StitchPayload {
            image1: ImageFile::new("left.jpg", "image/jpeg", vec![0xFFu8, 0xD8]),
            image2: ImageFile::new("right.png", media_type, vec![0x89u8]),
            params: StitchParameters::default(),
        }
    }

    #[test]
    fn test_build_form_with_valid_parts() {
        let form = build_form(&payload("image/png"));
        tokio_test::assert_ok!(form);
    }

    #[test]
    fn test_build_form_rejects_malformed_media_type() {
        match build_form(&payload("not a mime")) {
            Err(StitchError::Payload { reason }) => assert!(reason.contains("right.png")),
            other => panic!("应该返回 Payload 错误: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let config = Config {
            // 保留端口，不会有服务监听
            stitch_api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 5,
            ..Config::default()
        };
        let client = HttpStitchClient::new(&config).unwrap();

        match client.send(payload("image/png")).await {
            Err(StitchError::Transport { endpoint, .. }) => {
                assert_eq!(endpoint, "http://127.0.0.1:9/stitch")
            }
            other => panic!("应该返回 Transport 错误: {:?}", other),
        }
    }

    /// 需要本地运行拼接服务
    ///
    /// 运行方式：
    /// ```bash
    /// cargo test test_live_stitch_service -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_live_stitch_service() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let client = HttpStitchClient::new(&config).unwrap();

        let reply = client.send(payload("image/png")).await.unwrap();
        println!("状态码: {}, 媒体类型: {:?}", reply.status, reply.media_type);

        // 两张无法解码的图片，服务应返回 422
        assert!(!reply.is_success());
    }
}
