use thiserror::Error;

/// 领域层错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 支付响应中缺少卡号
    #[error("Payment response does not contain details.cardNumber")]
    CardNumberMissing,

    /// 卡号长度不足4位
    #[error("Card number too short: expected at least 4 characters, got {length}")]
    CardNumberTooShort { length: usize },

    /// 网关等待被中断
    #[error("Payment gateway interrupted: {0}")]
    GatewayInterrupted(String),

    /// 支付尝试状态错误
    #[error("Invalid attempt state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    /// 已有支付尝试在处理中
    #[error("Another payment attempt is already in flight")]
    AttemptInFlight,

    /// 按钮尚未绑定支付处理器
    #[error("Button is not armed for payment requests")]
    NotArmed,

    /// UI事件循环已停止
    #[error("UI mailbox is closed")]
    MailboxClosed,

    /// 浏览器会话已关闭
    #[error("Browser session is closed")]
    SessionClosed,

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl DomainError {
    /// 是否为支付响应数据本身的问题
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            DomainError::CardNumberMissing | DomainError::CardNumberTooShort { .. }
        )
    }
}

/// 领域结果类型
pub type DomainResult<T> = Result<T, DomainError>;
