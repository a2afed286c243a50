use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::CardEnding;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 浏览器原生支付窗口返回的支付响应
///
/// `data` 为浏览器 `PaymentResponse.toJSON()` 的原样内容，控制器只读不写。
#[derive(Clone, Serialize, Deserialize)]
pub struct PaymentResponseEvent {
    /// 浏览器端的 `requestId`，用于结束对应的原生窗口
    pub response_id: String,

    /// 原始响应数据
    pub data: serde_json::Value,
}

impl PaymentResponseEvent {
    pub fn new(response_id: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            response_id: response_id.into(),
            data,
        }
    }

    /// 读取 `details.cardNumber`
    pub fn card_number(&self) -> DomainResult<&str> {
        self.data
            .get("details")
            .and_then(|details| details.get("cardNumber"))
            .and_then(serde_json::Value::as_str)
            .ok_or(DomainError::CardNumberMissing)
    }

    /// 卡号末四位
    pub fn card_ending(&self) -> DomainResult<CardEnding> {
        CardEnding::from_card_number(self.card_number()?)
    }
}

// 卡号不得出现在日志中
impl fmt::Debug for PaymentResponseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentResponseEvent")
            .field("response_id", &self.response_id)
            .field("data", &"<redacted>")
            .finish()
    }
}
