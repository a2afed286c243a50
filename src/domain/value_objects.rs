use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 欧元货币代码
pub const CURRENCY_EUR: &str = "EUR";

/// 通用银行卡支付方式标识
pub const BASIC_CARD: &str = "basic-card";

/// 货币金额（欧分为单位，避免浮点数精度问题）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// 金额（分）
    pub amount_cents: i64,
}

impl Money {
    /// 创建新的金额对象（单位：欧元）
    pub fn from_euros(amount: i64) -> Self {
        Self {
            amount_cents: amount * 100,
        }
    }

    /// Payment Request API 使用的十进制金额字符串
    pub fn to_value_string(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        let (units, cents) = (abs / 100, abs % 100);
        if cents == 0 {
            format!("{}{}", sign, units)
        } else {
            format!("{}{}.{:02}", sign, units, cents)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}€", self.to_value_string())
    }
}

/// 支付方式描述（`{supportedMethods: "basic-card"}`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodDescriptor {
    #[serde(rename = "supportedMethods")]
    pub supported_methods: String,
}

impl PaymentMethodDescriptor {
    pub fn basic_card() -> Self {
        Self {
            supported_methods: BASIC_CARD.to_string(),
        }
    }
}

/// 金额及币种
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCurrencyAmount {
    pub currency: String,
    pub value: String,
}

/// 订单合计行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentItem {
    pub label: String,
    pub amount: PaymentCurrencyAmount,
}

/// 支付明细（`{total: {label, amount: {currency, value}}}`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub total: PaymentItem,
}

impl PaymentDetails {
    /// 以欧元合计创建支付明细
    pub fn total(label: impl Into<String>, amount: Money) -> Self {
        Self {
            total: PaymentItem {
                label: label.into(),
                amount: PaymentCurrencyAmount {
                    currency: CURRENCY_EUR.to_string(),
                    value: amount.to_value_string(),
                },
            },
        }
    }
}

/// 原生支付窗口的结束结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentCompletion {
    Success,
    Fail,
}

impl fmt::Display for PaymentCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentCompletion::Success => write!(f, "success"),
            PaymentCompletion::Fail => write!(f, "fail"),
        }
    }
}

/// 卡号末四位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEnding(String);

impl CardEnding {
    const LEN: usize = 4;

    /// 从完整卡号中截取末四位，长度不足时返回错误
    pub fn from_card_number(card_number: &str) -> DomainResult<Self> {
        let chars: Vec<char> = card_number.chars().collect();
        if chars.len() < Self::LEN {
            return Err(DomainError::CardNumberTooShort {
                length: chars.len(),
            });
        }

        Ok(Self(chars[chars.len() - Self::LEN..].iter().collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 通知显示位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticePosition {
    TopStretch,
    TopStart,
    TopCenter,
    TopEnd,
    Middle,
    BottomStart,
    BottomCenter,
    BottomEnd,
    BottomStretch,
}

/// 用户通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub duration: Duration,
    pub position: NoticePosition,
}

impl Notice {
    pub fn new(message: impl Into<String>, duration: Duration, position: NoticePosition) -> Self {
        Self {
            message: message.into(),
            duration,
            position,
        }
    }
}
