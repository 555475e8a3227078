//! Zone + distributor form
//!
//! Raw text as typed by the user. Conversion into request payloads is where
//! validation happens, so malformed input never reaches a store.

use rust_decimal::prelude::*;
use shared::models::{DistributorCreate, DistributorUpdate, Zone, ZoneCreate, ZoneUpdate};
use std::str::FromStr;
use thiserror::Error;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed delivery value (€1,000,000)
const MAX_DELIVERY_VALUE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} is not a valid amount: {value:?}")]
    InvalidAmount { field: &'static str, value: String },

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: String },

    #[error("{field} exceeds maximum allowed (1000000), got {value}")]
    AmountTooLarge { field: &'static str, value: String },
}

/// Validated distributor input, not yet bound to a zone
#[derive(Debug, Clone, PartialEq)]
pub struct DistributorFields {
    pub name: String,
    pub last_name: String,
    pub national_id: String,
    pub delivery_value: f64,
}

impl DistributorFields {
    pub fn into_create(self, zone_id: i64) -> DistributorCreate {
        DistributorCreate {
            name: self.name,
            last_name: self.last_name,
            national_id: self.national_id,
            delivery_value: self.delivery_value,
            zone_id,
        }
    }

    /// Update payload; `zone_id` is always carried
    pub fn into_update(self, zone_id: i64) -> DistributorUpdate {
        DistributorUpdate {
            name: self.name,
            last_name: self.last_name,
            national_id: self.national_id,
            delivery_value: self.delivery_value,
            zone_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneDistributorForm {
    pub zone_name: String,
    pub zone_description: String,
    pub distributor_name: String,
    pub distributor_last_name: String,
    pub distributor_national_id: String,
    pub distributor_delivery_value: String,
}

impl ZoneDistributorForm {
    /// Prefill from a loaded zone and its primary distributor
    pub fn for_zone(zone: &Zone) -> Self {
        let mut form = Self {
            zone_name: zone.name.clone(),
            zone_description: zone.description.clone().unwrap_or_default(),
            ..Self::default()
        };
        if let Some(d) = zone.distributor_link().primary() {
            form.distributor_name = d.name.clone();
            form.distributor_last_name = d.last_name.clone();
            form.distributor_national_id = d.national_id.clone();
            form.distributor_delivery_value = d.delivery_value.to_string();
        }
        form
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Any distributor field filled in
    pub fn has_distributor_input(&self) -> bool {
        [
            &self.distributor_name,
            &self.distributor_last_name,
            &self.distributor_national_id,
            &self.distributor_delivery_value,
        ]
        .iter()
        .any(|v| !v.trim().is_empty())
    }

    /// Create payload: name and description are both required
    pub fn zone_create(&self) -> Result<ZoneCreate, FormError> {
        Ok(ZoneCreate {
            name: required(&self.zone_name, "zone_name")?,
            description: Some(required(&self.zone_description, "zone_description")?),
        })
    }

    /// Update payload: blank description leaves the stored one untouched
    pub fn zone_update(&self) -> Result<ZoneUpdate, FormError> {
        Ok(ZoneUpdate {
            name: Some(required(&self.zone_name, "zone_name")?),
            description: optional(&self.zone_description),
        })
    }

    pub fn distributor_fields(&self) -> Result<DistributorFields, FormError> {
        Ok(DistributorFields {
            name: required(&self.distributor_name, "distributor_name")?,
            last_name: required(&self.distributor_last_name, "distributor_last_name")?,
            national_id: required(&self.distributor_national_id, "distributor_national_id")?,
            delivery_value: parse_delivery_value(
                &self.distributor_delivery_value,
                "distributor_delivery_value",
            )?,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a user-typed amount into a non-negative value rounded to cents
pub fn parse_delivery_value(raw: &str, field: &'static str) -> Result<f64, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FormError::MissingField(field));
    }
    let value = Decimal::from_str(raw).map_err(|_| FormError::InvalidAmount {
        field,
        value: raw.to_string(),
    })?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(FormError::NegativeAmount {
            field,
            value: raw.to_string(),
        });
    }
    if value > MAX_DELIVERY_VALUE {
        return Err(FormError::AmountTooLarge {
            field,
            value: raw.to_string(),
        });
    }
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .ok_or_else(|| FormError::InvalidAmount {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Distributor;

    fn filled() -> ZoneDistributorForm {
        ZoneDistributorForm {
            zone_name: "North".into(),
            zone_description: "Northern region".into(),
            distributor_name: "Ana".into(),
            distributor_last_name: "Lopez".into(),
            distributor_national_id: "123".into(),
            distributor_delivery_value: "15.50".into(),
        }
    }

    #[test]
    fn test_parse_delivery_value() {
        assert_eq!(parse_delivery_value("15.50", "v"), Ok(15.5));
        assert_eq!(parse_delivery_value(" 0 ", "v"), Ok(0.0));
        assert_eq!(parse_delivery_value("2.345", "v"), Ok(2.35));
        assert!(matches!(
            parse_delivery_value("-1", "v"),
            Err(FormError::NegativeAmount { .. })
        ));
        assert!(matches!(
            parse_delivery_value("abc", "v"),
            Err(FormError::InvalidAmount { .. })
        ));
        assert!(matches!(
            parse_delivery_value("1000000.01", "v"),
            Err(FormError::AmountTooLarge { .. })
        ));
        assert_eq!(
            parse_delivery_value("", "v"),
            Err(FormError::MissingField("v"))
        );
    }

    #[test]
    fn test_zone_create_requires_description() {
        let mut form = filled();
        form.zone_description = "  ".into();
        assert_eq!(
            form.zone_create(),
            Err(FormError::MissingField("zone_description"))
        );
    }

    #[test]
    fn test_zone_update_blank_description_is_none() {
        let form = ZoneDistributorForm {
            zone_name: " South ".into(),
            ..Default::default()
        };
        let update = form.zone_update().unwrap();
        assert_eq!(update.name.as_deref(), Some("South"));
        assert!(update.description.is_none());
    }

    #[test]
    fn test_distributor_fields_bind_zone() {
        let fields = filled().distributor_fields().unwrap();
        let create = fields.clone().into_create(4);
        let update = fields.into_update(4);
        assert_eq!(create.zone_id, 4);
        assert_eq!(update.zone_id, 4);
        assert_eq!(update.delivery_value, 15.5);
    }

    #[test]
    fn test_for_zone_prefill_and_clear() {
        let zone = Zone {
            id: 3,
            name: "North".into(),
            description: None,
            distributors: vec![Distributor {
                id: 9,
                name: "Ana".into(),
                last_name: "Lopez".into(),
                national_id: "123".into(),
                delivery_value: 15.5,
                zone_id: 3,
            }],
        };
        let mut form = ZoneDistributorForm::for_zone(&zone);
        assert_eq!(form.zone_description, "");
        assert_eq!(form.distributor_delivery_value, "15.5");
        assert!(form.has_distributor_input());

        form.clear();
        assert_eq!(form, ZoneDistributorForm::default());
        assert!(!form.has_distributor_input());
    }
}
