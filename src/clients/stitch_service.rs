//! 拼接服务接口
//!
//! 编排器只依赖此 trait，真实的 HTTP 客户端与测试用的模拟服务都实现它

use crate::error::StitchError;
use crate::models::image_file::ImageFile;
use crate::models::params::StitchParameters;
use futures::future::BoxFuture;

/// 一次拼接请求的完整内容
#[derive(Debug, Clone)]
pub struct StitchPayload {
    pub image1: ImageFile,
    pub image2: ImageFile,
    pub params: StitchParameters,
}

impl StitchPayload {
    /// 八个参数字段（十进制字符串）
    pub fn text_fields(&self) -> [(&'static str, String); 8] {
        self.params.form_fields()
    }
}

/// 拼接服务的原始响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchReply {
    pub status: u16,
    /// 响应声明的媒体类型
    pub media_type: Option<String>,
    pub body: Vec<u8>,
}

impl StitchReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 拼接服务
///
/// 每次调用恰好产生一个响应或一个错误
pub trait StitchService: Send + Sync {
    fn stitch(&self, payload: StitchPayload) -> BoxFuture<'_, Result<StitchReply, StitchError>>;
}
