use crate::domain::errors::DomainResult;
use crate::domain::{PaymentCompletion, PaymentDetails, PaymentMethodDescriptor};
use async_trait::async_trait;

/// 浏览器原生支付能力端口接口
#[async_trait]
pub trait PaymentRequestPort: Send + Sync {
    /// 询问浏览器是否支持原生支付
    ///
    /// 结果以 `UiCommand::SupportResolved` 异步返回。
    async fn query_is_supported(&self) -> DomainResult<()>;

    /// 将支付请求绑定到按钮，点击后弹出原生支付窗口
    async fn install(
        &self,
        methods: &[PaymentMethodDescriptor],
        details: &PaymentDetails,
    ) -> DomainResult<()>;

    /// 关闭原生支付窗口
    async fn complete(&self, response_id: &str, result: PaymentCompletion) -> DomainResult<()>;
}
