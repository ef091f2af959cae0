//! Payout destinations a chef can save for withdrawals.
//! Each variant carries exactly the fields its provider needs; the row stores
//! the serialized form in a JSONB column.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayoutMethod {
    BankTransfer {
        account_number: String,
        routing_number: String,
        account_name: String,
    },
    Paypal {
        email: String,
    },
    Venmo {
        phone_number: String,
        username: String,
    },
    Mpesa {
        phone_number: String,
    },
    Upi {
        upi_id: String,
    },
    Alipay {
        email: String,
    },
    WechatPay {
        phone_number: String,
    },
}

impl PayoutMethod {
    /// Display label matching what the marketplace shows chefs.
    pub fn label(&self) -> &'static str {
        match self {
            PayoutMethod::BankTransfer { .. } => "Bank Transfer",
            PayoutMethod::Paypal { .. } => "PayPal",
            PayoutMethod::Venmo { .. } => "Venmo",
            PayoutMethod::Mpesa { .. } => "M-Pesa",
            PayoutMethod::Upi { .. } => "UPI",
            PayoutMethod::Alipay { .. } => "Alipay",
            PayoutMethod::WechatPay { .. } => "WeChat Pay",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let method = PayoutMethod::Paypal {
            email: "chef@example.com".to_string(),
        };
        let value = serde_json::to_value(&method).unwrap();
        assert_eq!(value["type"], "paypal");
        assert_eq!(value["email"], "chef@example.com");
    }

    #[test]
    fn test_bank_transfer_round_trip() {
        let method = PayoutMethod::BankTransfer {
            account_number: "000123456789".to_string(),
            routing_number: "110000000".to_string(),
            account_name: "Julia Child".to_string(),
        };
        let json = serde_json::to_string(&method).unwrap();
        let back: PayoutMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(method, back);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let result: Result<PayoutMethod, _> =
            serde_json::from_str(r#"{"type": "cheque", "payee": "someone"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_labels() {
        let method = PayoutMethod::Mpesa {
            phone_number: "+254700000000".to_string(),
        };
        assert_eq!(method.label(), "M-Pesa");
    }
}
