//! Inbound trade signal parsing and validation.
//!
//! Alerting tools send loosely typed JSON: prices and quantities may be JSON
//! numbers or numeric strings, enum values arrive in any case, and payloads
//! carry extra fields (`secret`, comments, template leftovers). `SignalCommand::parse`
//! turns such a payload into a strongly typed, immutable command before any
//! exchange interaction happens.
//!
//! Required fields are checked in a fixed order (`symbol`, `side`, `entry`,
//! `sl`, `tp`, `qty`); the first problem found is reported.

use crate::decimal::{parse_decimal, Price, Size};
use crate::order::{ClientOrderId, OrderSide, OrderType};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

pub const FIELD_SYMBOL: &str = "symbol";
pub const FIELD_SIDE: &str = "side";
pub const FIELD_ENTRY: &str = "entry";
pub const FIELD_STOP_LOSS: &str = "sl";
pub const FIELD_TAKE_PROFIT: &str = "tp";
pub const FIELD_QUANTITY: &str = "qty";
pub const FIELD_ORDER_TYPE: &str = "orderType";
pub const FIELD_CLIENT_ORDER_ID: &str = "clientOrderId";

/// Kind of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Required field absent or null.
    MissingField,
    /// Field present but not coercible to the expected type.
    InvalidType,
    /// Field well-typed but outside its allowed range (e.g. `qty <= 0`).
    OutOfRange,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => write!(f, "Missing field"),
            Self::InvalidType => write!(f, "Invalid field type"),
            Self::OutOfRange => write!(f, "Field out of range"),
        }
    }
}

/// Signal validation error. Surfaced to the sender as HTTP 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {field}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub field: String,
}

impl ValidationError {
    pub fn missing(field: &str) -> Self {
        Self {
            kind: ValidationErrorKind::MissingField,
            field: field.to_string(),
        }
    }

    pub fn invalid_type(field: &str) -> Self {
        Self {
            kind: ValidationErrorKind::InvalidType,
            field: field.to_string(),
        }
    }

    pub fn out_of_range(field: &str) -> Self {
        Self {
            kind: ValidationErrorKind::OutOfRange,
            field: field.to_string(),
        }
    }
}

/// Validated trade signal. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalCommand {
    symbol: String,
    side: OrderSide,
    entry_price: Price,
    stop_loss: Price,
    take_profit: Price,
    quantity: Size,
    order_type: OrderType,
    client_order_id: Option<ClientOrderId>,
}

impl SignalCommand {
    /// Build a command, enforcing the range invariants.
    ///
    /// `entry_price` must be positive only for limit entries; market entries
    /// carry it as a reference value.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        side: OrderSide,
        entry_price: Price,
        stop_loss: Price,
        take_profit: Price,
        quantity: Size,
        order_type: OrderType,
        client_order_id: Option<ClientOrderId>,
    ) -> Result<Self, ValidationError> {
        let symbol = symbol.into().trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::invalid_type(FIELD_SYMBOL));
        }
        if order_type == OrderType::Limit && !entry_price.is_positive() {
            return Err(ValidationError::out_of_range(FIELD_ENTRY));
        }
        if !stop_loss.is_positive() {
            return Err(ValidationError::out_of_range(FIELD_STOP_LOSS));
        }
        if !take_profit.is_positive() {
            return Err(ValidationError::out_of_range(FIELD_TAKE_PROFIT));
        }
        if !quantity.is_positive() {
            return Err(ValidationError::out_of_range(FIELD_QUANTITY));
        }

        Ok(Self {
            symbol,
            side,
            entry_price,
            stop_loss,
            take_profit,
            quantity,
            order_type,
            client_order_id,
        })
    }

    /// Parse and validate a raw JSON payload.
    pub fn parse(payload: &Value) -> Result<Self, ValidationError> {
        let obj = payload
            .as_object()
            .ok_or_else(|| ValidationError::invalid_type("payload"))?;

        let symbol = required_str(obj, FIELD_SYMBOL)?;
        let side = required_str(obj, FIELD_SIDE)?
            .parse::<OrderSide>()
            .map_err(|_| ValidationError::invalid_type(FIELD_SIDE))?;
        let entry_price = Price::new(required_decimal(obj, FIELD_ENTRY)?);
        let stop_loss = Price::new(required_decimal(obj, FIELD_STOP_LOSS)?);
        let take_profit = Price::new(required_decimal(obj, FIELD_TAKE_PROFIT)?);
        let quantity = Size::new(required_decimal(obj, FIELD_QUANTITY)?);

        let order_type = match optional_str(obj, FIELD_ORDER_TYPE)? {
            Some(s) => s
                .parse::<OrderType>()
                .map_err(|_| ValidationError::invalid_type(FIELD_ORDER_TYPE))?,
            None => OrderType::default(),
        };
        let client_order_id = optional_str(obj, FIELD_CLIENT_ORDER_ID)?
            .map(|s| {
                ClientOrderId::parse(s)
                    .map_err(|_| ValidationError::invalid_type(FIELD_CLIENT_ORDER_ID))
            })
            .transpose()?;

        Self::new(
            symbol,
            side,
            entry_price,
            stop_loss,
            take_profit,
            quantity,
            order_type,
            client_order_id,
        )
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn entry_price(&self) -> Price {
        self.entry_price
    }

    pub fn stop_loss(&self) -> Price {
        self.stop_loss
    }

    pub fn take_profit(&self) -> Price {
        self.take_profit
    }

    pub fn quantity(&self) -> Size {
        self.quantity
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn client_order_id(&self) -> Option<&ClientOrderId> {
        self.client_order_id.as_ref()
    }
}

fn field<'a>(obj: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    obj.get(name).filter(|v| !v.is_null())
}

fn required_str<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a str, ValidationError> {
    field(obj, name)
        .ok_or_else(|| ValidationError::missing(name))?
        .as_str()
        .ok_or_else(|| ValidationError::invalid_type(name))
}

fn optional_str<'a>(
    obj: &'a Map<String, Value>,
    name: &str,
) -> Result<Option<&'a str>, ValidationError> {
    match field(obj, name) {
        None => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| ValidationError::invalid_type(name)),
    }
}

fn required_decimal(obj: &Map<String, Value>, name: &str) -> Result<Decimal, ValidationError> {
    let value = field(obj, name).ok_or_else(|| ValidationError::missing(name))?;
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Err(ValidationError::invalid_type(name)),
    };
    parse_decimal(&text).map_err(|_| ValidationError::invalid_type(name))
}
