//! 拼接会话 - 编排层
//!
//! ## 职责
//!
//! 本模块是请求编排器，独占会话内的全部可变状态：
//!
//! 1. **输入槽**：两个 `InputSlot`，各自持有图片与预览
//! 2. **算法参数**：`StitchParameters`，提交时原样附带
//! 3. **请求状态**：`Idle` / `InFlight` / `Succeeded` / `Failed`
//! 4. **结果资源与错误记录**：只在对应状态下存在
//!
//! ## 状态机
//!
//! ```text
//! Idle      --submit(ready)-->          InFlight
//! InFlight  --响应成功-->                 Succeeded
//! InFlight  --响应失败 / 错误-->           Failed
//! Succeeded --submit(ready)-->          InFlight   (先释放旧结果)
//! Failed    --submit(ready)-->          InFlight   (先清除错误记录)
//! 任意状态   --reset()-->                Idle       (释放结果、错误记录和两个输入槽)
//! ```
//!
//! ## 单次在途
//!
//! 同一时刻最多一个请求在途。请求在后台任务中执行，结果通过通道送回，
//! 由会话所有者调用 `next_completion` 在单一上下文中应用。每次提交都会
//! 递增请求代号，代号不匹配或状态已不是 `InFlight` 的结果会被丢弃。

use crate::clients::{StitchPayload, StitchService};
use crate::error::ValidationError;
use crate::infrastructure::{BlobStore, DisplayHandle};
use crate::models::image_file::ImageFile;
use crate::models::params::StitchParameters;
use crate::models::state::{RequestState, SessionView, ViewStatus};
use crate::services::response_decoder::FALLBACK_MESSAGE;
use crate::services::{InputSlot, LogPresenter, Presenter, SlotIndex};
use crate::workflow::{Completion, StitchCtx, StitchFlow, StitchOutcome};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// 错误记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub message: String,
}

/// 请求状态及其附带的资源
enum Phase {
    Idle,
    InFlight,
    Succeeded(DisplayHandle),
    Failed(ErrorRecord),
}

/// 完成消息的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 已应用，附带应用后的状态
    Applied(RequestState),
    /// 过期结果，已丢弃
    Discarded,
}

/// 拼接会话
pub struct StitchSession {
    store: BlobStore,
    slots: [InputSlot; 2],
    params: StitchParameters,
    phase: Phase,
    generation: u64,
    pending: usize,
    flow: StitchFlow,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
    presenter: Box<dyn Presenter>,
}

impl StitchSession {
    /// 创建使用日志展示层的会话
    pub fn new(service: Arc<dyn StitchService>) -> Self {
        Self::with_presenter(service, Box::new(LogPresenter))
    }

    /// 创建使用自定义展示层的会话
    pub fn with_presenter(service: Arc<dyn StitchService>, presenter: Box<dyn Presenter>) -> Self {
        let store = BlobStore::new();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Self {
            slots: [
                InputSlot::new(SlotIndex::First, store.clone()),
                InputSlot::new(SlotIndex::Second, store.clone()),
            ],
            store,
            params: StitchParameters::default(),
            phase: Phase::Idle,
            generation: 0,
            pending: 0,
            flow: StitchFlow::new(service),
            completions_tx,
            completions_rx,
            presenter,
        }
    }

    // ========== 用户操作 ==========

    /// 为指定输入槽选择图片
    ///
    /// 成功后清除错误记录并释放已过期的拼接结果；校验失败时会话不受影响
    pub fn select_file(&mut self, slot: SlotIndex, file: ImageFile) -> Result<(), ValidationError> {
        self.slots[slot.position()].select_file(file)?;
        self.invalidate_result();
        self.render();
        Ok(())
    }

    /// 清空指定输入槽
    pub fn clear_slot(&mut self, slot: SlotIndex) {
        if !self.slots[slot.position()].is_ready() {
            return;
        }
        self.slots[slot.position()].clear();
        self.invalidate_result();
        self.render();
    }

    /// 替换算法参数，下一次提交生效
    pub fn set_params(&mut self, params: StitchParameters) {
        debug!("更新拼接参数: {:?}", params);
        self.params = params;
    }

    /// 提交拼接请求
    ///
    /// 两张图片未选齐或已有请求在途时为空操作，返回 `None`。
    /// 没有 tokio 运行时时请求无法发出，会话直接进入 `Failed`，同样返回 `None`
    pub fn submit(&mut self) -> Option<StitchCtx> {
        if matches!(self.phase, Phase::InFlight) {
            debug!("已有请求在途 (#{})，忽略本次提交", self.generation);
            return None;
        }

        let (image1, image2) = match (self.slots[0].source(), self.slots[1].source()) {
            (Some(image1), Some(image2)) => (image1.clone(), image2.clone()),
            _ => {
                debug!("两张图片尚未选齐，忽略本次提交");
                return None;
            }
        };

        self.transition(Phase::InFlight);
        self.generation += 1;

        let ctx = StitchCtx::new(self.generation, image1.name(), image2.name());
        let payload = StitchPayload {
            image1,
            image2,
            params: self.params,
        };

        if let Err(e) = self
            .flow
            .dispatch(ctx.clone(), payload, self.completions_tx.clone())
        {
            error!("{} ❌ 请求未发出: {}", ctx, e);
            self.transition(Phase::Failed(ErrorRecord {
                message: e.user_message(),
            }));
            self.render();
            return None;
        }

        self.pending += 1;
        self.render();

        Some(ctx)
    }

    /// 重置会话
    ///
    /// 不会中止在途请求，其结果到达后会被丢弃
    pub fn reset(&mut self) {
        if matches!(self.phase, Phase::InFlight) {
            warn!("请求 #{} 在途时重置，结果到达后将被丢弃", self.generation);
        }

        self.generation += 1;
        self.transition(Phase::Idle);
        for slot in &mut self.slots {
            slot.clear();
        }

        info!("🔄 会话已重置");
        self.render();
    }

    // ========== 结果处理 ==========

    /// 等待下一条完成消息并应用
    ///
    /// 没有未收回的请求时返回 `None`
    pub async fn next_completion(&mut self) -> Option<Disposition> {
        if self.pending == 0 {
            return None;
        }

        let completion = self.completions_rx.recv().await?;
        self.pending -= 1;
        Some(self.apply(completion))
    }

    /// 提交并等待请求结束，返回最终状态
    pub async fn submit_and_wait(&mut self) -> RequestState {
        self.submit();

        while matches!(self.phase, Phase::InFlight) {
            if self.next_completion().await.is_none() {
                break;
            }
        }

        self.state()
    }

    /// 应用一条完成消息
    pub fn apply(&mut self, completion: Completion) -> Disposition {
        let Completion { ctx, outcome } = completion;

        if ctx.generation != self.generation || !matches!(self.phase, Phase::InFlight) {
            info!(
                "{} 丢弃过期结果 (当前代号 #{}, 状态: {})",
                ctx,
                self.generation,
                self.state()
            );
            return Disposition::Discarded;
        }

        match outcome {
            StitchOutcome::Stitched(image) => {
                let output = self.store.create(image.media_type, Arc::from(image.bytes));
                let url = output.url();
                self.transition(Phase::Succeeded(output));
                self.render();
                self.presenter.focus_result(&url);
            }
            StitchOutcome::Failed { message } => {
                let message = if message.trim().is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    message
                };
                self.transition(Phase::Failed(ErrorRecord { message }));
                self.render();
            }
        }

        Disposition::Applied(self.state())
    }

    // ========== 查询 ==========

    pub fn state(&self) -> RequestState {
        match self.phase {
            Phase::Idle => RequestState::Idle,
            Phase::InFlight => RequestState::InFlight,
            Phase::Succeeded(_) => RequestState::Succeeded,
            Phase::Failed(_) => RequestState::Failed,
        }
    }

    /// 两个输入槽是否都已选择图片
    pub fn is_ready(&self) -> bool {
        self.slots.iter().all(InputSlot::is_ready)
    }

    pub fn slot(&self, slot: SlotIndex) -> &InputSlot {
        &self.slots[slot.position()]
    }

    pub fn params(&self) -> &StitchParameters {
        &self.params
    }

    /// 拼接结果，仅在 `Succeeded` 状态下存在
    pub fn output(&self) -> Option<&DisplayHandle> {
        match &self.phase {
            Phase::Succeeded(output) => Some(output),
            _ => None,
        }
    }

    /// 错误记录，仅在 `Failed` 状态下存在
    pub fn error(&self) -> Option<&ErrorRecord> {
        match &self.phase {
            Phase::Failed(record) => Some(record),
            _ => None,
        }
    }

    /// 当前请求代号
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 已发出但尚未收回的请求数量（包括过期请求）
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// 资源存储，用于检查存活资源数量
    pub fn store(&self) -> &BlobStore {
        &self.store
    }

    /// 展示层投影
    pub fn view(&self) -> SessionView {
        let status = match &self.phase {
            Phase::Idle => ViewStatus::Idle,
            Phase::InFlight => ViewStatus::Loading,
            Phase::Succeeded(output) => ViewStatus::Success(output.view()),
            Phase::Failed(record) => ViewStatus::Error(record.message.clone()),
        };

        SessionView {
            status,
            previews: [
                self.slots[0].preview().map(DisplayHandle::view),
                self.slots[1].preview().map(DisplayHandle::view),
            ],
        }
    }

    // ========== 内部辅助方法 ==========

    /// 切换状态，旧状态附带的结果资源在此释放
    fn transition(&mut self, next: Phase) {
        let previous = std::mem::replace(&mut self.phase, next);
        if let Phase::Succeeded(output) = previous {
            output.release();
        }
    }

    /// 输入变化后，旧结果与错误记录都不再有效
    fn invalidate_result(&mut self) {
        if matches!(self.phase, Phase::Succeeded(_) | Phase::Failed(_)) {
            debug!("输入已变更，清除上一次的结果 ({})", self.state());
            self.transition(Phase::Idle);
        }
    }

    fn render(&mut self) {
        let view = self.view();
        self.presenter.render(&view);
    }
}
