//! 拼接请求流程 - 流程层
//!
//! 核心职责：定义"一次拼接请求"的完整处理流程
//!
//! 流程顺序：
//! 1. 调用拼接服务（唯一的挂起点）
//! 2. 成功响应 → 解码图片
//! 3. 失败响应 / 网络错误 / 解码错误 / panic → 归一化为一条错误消息
//! 4. 通过通道把唯一的结果送回编排器

use crate::clients::{StitchPayload, StitchService};
use crate::error::StitchError;
use crate::services::response_decoder::{
    decode_failure_message, decode_image, DecodedImage, FALLBACK_MESSAGE,
};
use crate::utils::logging::truncate_text;
use crate::workflow::stitch_ctx::StitchCtx;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, warn};

/// 一次请求的最终结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StitchOutcome {
    /// 拼接成功
    Stitched(DecodedImage),
    /// 拼接失败，消息非空
    Failed { message: String },
}

/// 送回编排器的完成消息
#[derive(Debug)]
pub struct Completion {
    pub ctx: StitchCtx,
    pub outcome: StitchOutcome,
}

/// 拼接请求流程
///
/// - 每次 `run` 恰好调用一次拼接服务
/// - 所有错误都在这里被捕获，不会向上抛出
/// - 不持有任何会话资源（输入槽、结果）
#[derive(Clone)]
pub struct StitchFlow {
    service: Arc<dyn StitchService>,
}

impl StitchFlow {
    /// 创建新的拼接流程
    pub fn new(service: Arc<dyn StitchService>) -> Self {
        Self { service }
    }

    pub async fn run(&self, ctx: &StitchCtx, payload: StitchPayload) -> StitchOutcome {
        info!(
            "{} 📤 正在提交: {} + {}",
            ctx, ctx.image1, ctx.image2
        );

        let call = AssertUnwindSafe(async { self.service.stitch(payload).await })
            .catch_unwind()
            .await;

        let result = match call {
            Ok(result) => result,
            Err(_) => {
                error!("{} ❌ 拼接服务调用发生 panic", ctx);
                return StitchOutcome::Failed {
                    message: FALLBACK_MESSAGE.to_string(),
                };
            }
        };

        match result {
            Ok(reply) if reply.is_success() => match decode_image(reply) {
                Ok(image) => {
                    info!(
                        "{} ✓ 拼接完成 ({}, {} 字节)",
                        ctx,
                        image.media_type,
                        image.bytes.len()
                    );
                    StitchOutcome::Stitched(image)
                }
                Err(e) => fault(ctx, e),
            },
            Ok(reply) => {
                let message = decode_failure_message(&reply);
                warn!(
                    "{} ⚠️ 服务返回失败 {}: {}",
                    ctx,
                    reply.status,
                    truncate_text(&message, 120)
                );
                StitchOutcome::Failed { message }
            }
            Err(e) => fault(ctx, e),
        }
    }

    /// 在后台执行请求，完成后把结果发送到 `completions`
    ///
    /// 任务启动后无论成功与否都恰好发送一条完成消息。
    /// 当前线程没有 tokio 运行时时返回 `Dispatch` 错误，不会发出请求
    pub fn dispatch(
        &self,
        ctx: StitchCtx,
        payload: StitchPayload,
        completions: UnboundedSender<Completion>,
    ) -> Result<(), StitchError> {
        let runtime = Handle::try_current().map_err(|e| StitchError::Dispatch {
            reason: e.to_string(),
        })?;

        let flow = self.clone();
        runtime.spawn(async move {
            let outcome = flow.run(&ctx, payload).await;
            if completions.send(Completion { ctx, outcome }).is_err() {
                warn!("会话已结束，丢弃请求结果");
            }
        });

        Ok(())
    }
}

/// 把请求过程中的错误归一化为失败结果
fn fault(ctx: &StitchCtx, err: StitchError) -> StitchOutcome {
    error!("{} ❌ 请求失败: {}", ctx, err);
    let message = err.user_message();
    let message = if message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    };
    StitchOutcome::Failed { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::StitchReply;
    use crate::models::image_file::ImageFile;
    use crate::models::params::StitchParameters;
    use futures::future::BoxFuture;
    use std::sync::Mutex;

    /// 按顺序返回预设结果的模拟服务
    struct ScriptedService {
        replies: Mutex<Vec<Result<StitchReply, StitchError>>>,
        seen: Mutex<Vec<Vec<(&'static str, String)>>>,
    }

    impl ScriptedService {
        fn new(reply: Result<StitchReply, StitchError>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(vec![reply]),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl StitchService for ScriptedService {
        fn stitch(&self, payload: StitchPayload) -> BoxFuture<'_, Result<StitchReply, StitchError>> {
            self.seen.lock().unwrap().push(payload.text_fields().to_vec());
            let reply = self.replies.lock().unwrap().remove(0);
            async move { reply }.boxed()
        }
    }

    struct PanickingService;

    impl StitchService for PanickingService {
        fn stitch(&self, _payload: StitchPayload) -> BoxFuture<'_, Result<StitchReply, StitchError>> {
            async { panic!("boom") }.boxed()
        }
    }

    fn payload() -> StitchPayload {
        StitchPayload {
            image1: ImageFile::new("a.jpg", "image/jpeg", vec![1u8]),
            image2: ImageFile::new("b.png", "image/png", vec![2u8]),
            params: StitchParameters::default(),
        }
    }

    fn ctx() -> StitchCtx {
        StitchCtx::new(1, "a.jpg", "b.png")
    }

    #[tokio::test]
    async fn test_success_is_decoded() {
        let service = ScriptedService::new(Ok(StitchReply {
            status: 200,
            media_type: Some("image/jpeg".to_string()),
            body: b"pano".to_vec(),
        }));
        let flow = StitchFlow::new(service.clone());

        let outcome = flow.run(&ctx(), payload()).await;

        assert_eq!(
            outcome,
            StitchOutcome::Stitched(DecodedImage {
                media_type: "image/jpeg".to_string(),
                bytes: b"pano".to_vec(),
            })
        );
        let seen = service.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 8);
    }

    #[tokio::test]
    async fn test_failure_reply_uses_detail() {
        let service = ScriptedService::new(Ok(StitchReply {
            status: 422,
            media_type: Some("application/json".to_string()),
            body: br#"{"detail":"could not decode image"}"#.to_vec(),
        }));
        let outcome = StitchFlow::new(service).run(&ctx(), payload()).await;
        assert_eq!(
            outcome,
            StitchOutcome::Failed {
                message: "could not decode image".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_decode_error_becomes_failure() {
        let service = ScriptedService::new(Ok(StitchReply {
            status: 200,
            media_type: Some("image/jpeg".to_string()),
            body: Vec::new(),
        }));
        match StitchFlow::new(service).run(&ctx(), payload()).await {
            StitchOutcome::Failed { message } => assert!(message.contains("响应体为空")),
            other => panic!("应该失败: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_becomes_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let service = ScriptedService::new(Err(StitchError::transport("http://x/stitch", io)));
        match StitchFlow::new(service).run(&ctx(), payload()).await {
            StitchOutcome::Failed { message } => assert!(message.contains("timed out")),
            other => panic!("应该失败: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_fault_message_uses_fallback() {
        let service = ScriptedService::new(Err(StitchError::Service {
            status: 500,
            message: "   ".to_string(),
        }));
        let outcome = StitchFlow::new(service).run(&ctx(), payload()).await;
        assert_eq!(
            outcome,
            StitchOutcome::Failed {
                message: FALLBACK_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_panic_is_caught() {
        let outcome = StitchFlow::new(Arc::new(PanickingService))
            .run(&ctx(), payload())
            .await;
        assert_eq!(
            outcome,
            StitchOutcome::Failed {
                message: FALLBACK_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_sends_exactly_one_completion() {
        let service = ScriptedService::new(Ok(StitchReply {
            status: 500,
            media_type: None,
            body: b"Internal Error".to_vec(),
        }));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        tokio_test::assert_ok!(StitchFlow::new(service).dispatch(ctx(), payload(), tx));

        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.ctx.generation, 1);
        assert_eq!(
            completion.outcome,
            StitchOutcome::Failed {
                message: "Internal Error".to_string()
            }
        );
        // 发送端已随任务结束被丢弃
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_dispatch_without_runtime_is_an_error() {
        let service = ScriptedService::new(Ok(StitchReply {
            status: 200,
            media_type: Some("image/jpeg".to_string()),
            body: b"pano".to_vec(),
        }));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        match StitchFlow::new(service.clone()).dispatch(ctx(), payload(), tx) {
            Err(StitchError::Dispatch { reason }) => assert!(!reason.is_empty()),
            other => panic!("应该返回 Dispatch 错误: {:?}", other),
        }
        assert!(service.seen.lock().unwrap().is_empty());
        // 发送端已随调用返回被丢弃，不会有完成消息
        assert!(rx.try_recv().is_err());
    }
}
