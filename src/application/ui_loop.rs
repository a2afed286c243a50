use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::PaymentResponseEvent;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// UI 线程上执行的命令
#[derive(Debug)]
pub enum UiCommand {
    /// 浏览器支持探测结果
    SupportResolved(bool),

    /// 按钮点击（仅在未绑定原生支付时由服务端处理）
    ButtonClicked,

    /// 原生支付窗口返回的响应
    PaymentResponse(PaymentResponseEvent),

    /// 网关处理结束，完成命令
    GatewayFinished {
        attempt_id: Uuid,
        outcome: DomainResult<()>,
    },

    /// 视图销毁
    Detach,
}

/// 运行在 UI 事件循环上的视图
#[async_trait]
pub trait UiView: Send {
    /// 视图创建
    async fn attach(&mut self) -> DomainResult<()>;

    /// 处理单条命令
    async fn handle(&mut self, command: UiCommand) -> DomainResult<()>;

    /// 视图销毁，释放挂起的任务
    async fn detach(&mut self);
}

/// 向 UI 事件循环投递命令的句柄
#[derive(Debug, Clone)]
pub struct UiHandle {
    sender: mpsc::Sender<UiCommand>,
}

impl UiHandle {
    /// 投递命令，邮箱满时等待
    pub async fn submit(&self, command: UiCommand) -> DomainResult<()> {
        self.sender
            .send(command)
            .await
            .map_err(|_| DomainError::MailboxClosed)
    }
}

/// 单消费者 UI 事件循环，所有 UI 变更都在这里串行执行
pub struct UiEventLoop {
    mailbox: mpsc::Receiver<UiCommand>,
}

impl UiEventLoop {
    /// 创建有界邮箱
    pub fn channel(capacity: usize) -> (Self, UiHandle) {
        let (sender, mailbox) = mpsc::channel(capacity);
        (Self { mailbox }, UiHandle { sender })
    }

    /// 运行直到收到 `Detach` 或所有句柄被丢弃
    pub async fn run<V: UiView>(mut self, mut view: V) {
        if let Err(e) = view.attach().await {
            warn!(error = %e, "View attach failed");
        }

        while let Some(command) = self.mailbox.recv().await {
            if matches!(command, UiCommand::Detach) {
                debug!("Detach received, stopping UI loop");
                break;
            }

            if let Err(e) = view.handle(command).await {
                warn!(error = %e, "UI command failed");
            }
        }

        self.mailbox.close();
        view.detach().await;
    }
}
