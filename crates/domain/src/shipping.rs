//! Shipping form captured at checkout.

use serde::{Deserialize, Serialize};

/// Required shipping fields, named for validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingField {
    Name,
    Phone,
    Address,
}

impl ShippingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingField::Name => "name",
            ShippingField::Phone => "phone",
            ShippingField::Address => "address",
        }
    }
}

impl std::fmt::Display for ShippingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery details entered by the buyer. Notes are optional and only the
/// address and phone travel with the persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ShippingInfo {
    /// Checks that every required field has non-blank content. Returns the
    /// first missing field in form order.
    pub fn validate(&self) -> Result<(), ShippingField> {
        if self.name.trim().is_empty() {
            return Err(ShippingField::Name);
        }
        if self.phone.trim().is_empty() {
            return Err(ShippingField::Phone);
        }
        if self.address.trim().is_empty() {
            return Err(ShippingField::Address);
        }
        Ok(())
    }
}
