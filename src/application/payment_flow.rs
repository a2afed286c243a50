use crate::application::ui_loop::{UiCommand, UiHandle, UiView};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{
    Money, Notice, NoticePosition, PaymentAttempt, PaymentCompletion, PaymentDetails,
    PaymentMethodDescriptor, PaymentResponseEvent,
};
use crate::ports::{NotificationPort, PaymentGatewayPort, PaymentRequestPort};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const UNSUPPORTED_MESSAGE: &str = "Payment collection is not supported on your browser!";
pub const PROCESSING_MESSAGE: &str =
    "Please wait a moment while we finish the payment via our payment gateway.";
pub const INVALID_CARD_MESSAGE: &str =
    "Payment failed: we could not read the card number from your payment details.";
pub const GATEWAY_FAILED_MESSAGE: &str =
    "Payment failed: the payment gateway did not respond. You have not been charged.";

/// 购物车合计行标签
pub const CART_LABEL: &str = "Cart (10 items)";

/// 购物车合计金额
pub fn cart_total() -> Money {
    Money::from_euros(1337)
}

/// 通知显示参数
#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub notice_duration: Duration,
    pub notice_position: NoticePosition,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            notice_duration: Duration::from_millis(9000),
            notice_position: NoticePosition::Middle,
        }
    }
}

/// 按钮当前绑定的处理器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonBinding {
    /// 支持探测尚未返回
    Unarmed,
    /// 点击弹出原生支付窗口
    PaymentRequest,
    /// 点击显示不支持提示
    UnsupportedNotice,
}

struct ActiveAttempt {
    attempt: PaymentAttempt,
    response: PaymentResponseEvent,
    timer: JoinHandle<()>,
}

/// 支付流程控制器
///
/// 每个视图一个实例，只在该视图的 UI 事件循环上运行。
pub struct PaymentFlowController<P: PaymentRequestPort, N: NotificationPort, G: PaymentGatewayPort>
{
    payment_request: Arc<P>,
    notifier: Arc<N>,
    gateway: Arc<G>,
    ui: UiHandle,
    settings: FlowSettings,
    binding: ButtonBinding,
    active: Option<ActiveAttempt>,
}

impl<P: PaymentRequestPort, N: NotificationPort, G: PaymentGatewayPort>
    PaymentFlowController<P, N, G>
{
    pub fn new(
        payment_request: Arc<P>,
        notifier: Arc<N>,
        gateway: Arc<G>,
        ui: UiHandle,
        settings: FlowSettings,
    ) -> Self {
        Self {
            payment_request,
            notifier,
            gateway,
            ui,
            settings,
            binding: ButtonBinding::Unarmed,
            active: None,
        }
    }

    /// `[{supportedMethods: 'basic-card'}]`
    pub fn supported_methods() -> Vec<PaymentMethodDescriptor> {
        vec![PaymentMethodDescriptor::basic_card()]
    }

    /// `{total: {label: 'Cart (10 items)', amount: {currency: 'EUR', value: '1337'}}}`
    pub fn payment_details() -> PaymentDetails {
        PaymentDetails::total(CART_LABEL, cart_total())
    }

    async fn notify(&self, message: impl Into<String>) -> DomainResult<()> {
        self.notifier
            .show(Notice::new(
                message,
                self.settings.notice_duration,
                self.settings.notice_position,
            ))
            .await
    }

    /// 处理支持探测结果，只接受第一次
    async fn on_support_resolved(&mut self, supported: bool) -> DomainResult<()> {
        if self.binding != ButtonBinding::Unarmed {
            warn!(supported, "Support query already resolved, ignoring");
            return Ok(());
        }

        if supported {
            let methods = Self::supported_methods();
            let details = Self::payment_details();
            self.payment_request.install(&methods, &details).await?;
            self.binding = ButtonBinding::PaymentRequest;
            info!("Payment request handler installed");
        } else {
            self.binding = ButtonBinding::UnsupportedNotice;
            info!("Payment Request API not supported, falling back to notice");
        }

        Ok(())
    }

    async fn on_click(&mut self) -> DomainResult<()> {
        match self.binding {
            ButtonBinding::UnsupportedNotice => self.notify(UNSUPPORTED_MESSAGE).await,
            ButtonBinding::PaymentRequest => {
                debug!("Click handled by the native payment dialog");
                Ok(())
            }
            ButtonBinding::Unarmed => {
                debug!("Click before support query resolved, ignoring");
                Ok(())
            }
        }
    }

    async fn on_payment_response(&mut self, response: PaymentResponseEvent) -> DomainResult<()> {
        if self.binding != ButtonBinding::PaymentRequest {
            self.payment_request
                .complete(&response.response_id, PaymentCompletion::Fail)
                .await?;
            return Err(DomainError::NotArmed);
        }

        // 原生窗口是模态的，同一时间只允许一个尝试
        if self.active.is_some() {
            self.payment_request
                .complete(&response.response_id, PaymentCompletion::Fail)
                .await?;
            return Err(DomainError::AttemptInFlight);
        }

        self.notify(PROCESSING_MESSAGE).await?;

        let mut attempt = PaymentAttempt::new(response.response_id.clone());
        attempt.mark_as_processing()?;
        let timer = self.start_payment_gateway_query(attempt.id, response.clone());

        info!(
            attempt_id = %attempt.id,
            response_id = %attempt.response_id,
            "Payment response received, querying gateway"
        );

        self.active = Some(ActiveAttempt {
            attempt,
            response,
            timer,
        });
        Ok(())
    }

    /// 在后台任务中等待网关，结果投递回 UI 事件循环
    fn start_payment_gateway_query(
        &self,
        attempt_id: Uuid,
        response: PaymentResponseEvent,
    ) -> JoinHandle<()> {
        let gateway = self.gateway.clone();
        let ui = self.ui.clone();

        tokio::spawn(async move {
            let outcome = gateway.process(&response).await;
            if ui
                .submit(UiCommand::GatewayFinished {
                    attempt_id,
                    outcome,
                })
                .await
                .is_err()
            {
                debug!(%attempt_id, "UI loop stopped, dropping gateway outcome");
            }
        })
    }

    /// 完成命令：关闭原生窗口并显示结果
    async fn on_gateway_finished(
        &mut self,
        attempt_id: Uuid,
        outcome: DomainResult<()>,
    ) -> DomainResult<()> {
        let Some(active) = self
            .active
            .take_if(|active| active.attempt.id == attempt_id)
        else {
            warn!(%attempt_id, "Gateway outcome for unknown attempt, ignoring");
            return Ok(());
        };

        let ActiveAttempt {
            mut attempt,
            response,
            ..
        } = active;

        match outcome.and_then(|()| response.card_ending()) {
            Ok(card_ending) => {
                attempt.mark_as_succeeded(card_ending.clone())?;
                self.payment_request
                    .complete(&attempt.response_id, PaymentCompletion::Success)
                    .await?;

                info!(
                    attempt_id = %attempt.id,
                    card_ending = %card_ending,
                    "Payment completed"
                );

                self.notify(format!(
                    "Purchase complete! We have charged the total ({}) from your credit card ending in {}",
                    cart_total(),
                    card_ending
                ))
                .await
            }
            Err(e) => {
                attempt.mark_as_failed()?;
                warn!(attempt_id = %attempt.id, error = %e, "Payment attempt failed");

                self.payment_request
                    .complete(&attempt.response_id, PaymentCompletion::Fail)
                    .await?;

                let message = if e.is_malformed_response() {
                    INVALID_CARD_MESSAGE
                } else {
                    GATEWAY_FAILED_MESSAGE
                };
                self.notify(message).await
            }
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(active) = self.active.take() {
            active.timer.abort();
            info!(
                attempt_id = %active.attempt.id,
                "View detached, cancelled pending gateway query"
            );
        }
    }
}

#[async_trait]
impl<P: PaymentRequestPort, N: NotificationPort, G: PaymentGatewayPort> UiView
    for PaymentFlowController<P, N, G>
{
    async fn attach(&mut self) -> DomainResult<()> {
        self.payment_request.query_is_supported().await
    }

    async fn handle(&mut self, command: UiCommand) -> DomainResult<()> {
        match command {
            UiCommand::SupportResolved(supported) => self.on_support_resolved(supported).await,
            UiCommand::ButtonClicked => self.on_click().await,
            UiCommand::PaymentResponse(response) => self.on_payment_response(response).await,
            UiCommand::GatewayFinished {
                attempt_id,
                outcome,
            } => self.on_gateway_finished(attempt_id, outcome).await,
            // 事件循环在分发前拦截 Detach，清理在 `detach` 中完成
            UiCommand::Detach => {
                debug!("Detach reached the view, ignoring");
                Ok(())
            }
        }
    }

    async fn detach(&mut self) {
        self.cancel_pending();
    }
}
