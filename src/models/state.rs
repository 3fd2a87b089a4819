//! 请求状态与展示层投影

use std::fmt;

/// 请求状态
///
/// 每个会话只有一个实例，由编排器独占修改
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// 空闲
    Idle,
    /// 请求进行中
    InFlight,
    /// 拼接成功，持有结果资源
    Succeeded,
    /// 拼接失败，持有错误记录
    Failed,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::Idle => "空闲",
            RequestState::InFlight => "请求中",
            RequestState::Succeeded => "成功",
            RequestState::Failed => "失败",
        };
        write!(f, "{}", name)
    }
}

/// 可展示资源的只读描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceView {
    pub url: String,
    pub media_type: String,
    pub len: usize,
}

/// 展示层看到的请求状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Loading,
    Error(String),
    Success(ResourceView),
}

/// 会话投影：请求状态 + 两个输入槽的预览
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub status: ViewStatus,
    pub previews: [Option<ResourceView>; 2],
}

impl SessionView {
    /// 两个输入槽是否都已选择图片
    pub fn can_submit(&self) -> bool {
        self.status != ViewStatus::Loading && self.previews.iter().all(Option::is_some)
    }
}
