//! Per-zone-type completion contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SigningError;
use crate::model::zone::{SignatureZone, ZoneType};

/// Display format of date zones, e.g. `15/03/2025`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// What the signer submitted for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ZoneInput {
    /// Hand-drawn mark rasterized to an image data URL.
    Drawn { image: String },
    /// Typed name rendered in a script font, plus its rasterized image.
    Typed { name: String, image: String },
    /// Confirmed date, already formatted.
    Date(String),
    Text(String),
}

impl ZoneInput {
    /// Input of a keyboard-filled zone: a date for date zones, text otherwise.
    pub fn typed_in(zone_type: ZoneType, value: impl Into<String>) -> Self {
        match zone_type {
            ZoneType::Date => ZoneInput::Date(value.into()),
            _ => ZoneInput::Text(value.into()),
        }
    }

    /// Validates the input against `zone` and returns the value to store.
    pub fn into_value(self, zone: &SignatureZone) -> Result<String, SigningError> {
        let empty = || SigningError::EmptyValue(zone.id.clone());
        let mismatch = |expected| SigningError::InputMismatch {
            zone_id: zone.id.clone(),
            expected,
        };
        match (zone.zone_type, self) {
            (ZoneType::Signature | ZoneType::Initials, ZoneInput::Drawn { image }) => {
                if is_image_payload(&image) {
                    Ok(image)
                } else {
                    Err(empty())
                }
            }
            (ZoneType::Signature | ZoneType::Initials, ZoneInput::Typed { name, image }) => {
                if name.trim().is_empty() || !is_image_payload(&image) {
                    Err(empty())
                } else {
                    Ok(image)
                }
            }
            (ZoneType::Signature | ZoneType::Initials, _) => Err(mismatch("drawn or typed")),
            (ZoneType::Date, ZoneInput::Date(value)) => {
                let value = value.trim();
                if value.is_empty() {
                    Err(empty())
                } else {
                    Ok(value.to_string())
                }
            }
            (ZoneType::Date, _) => Err(mismatch("date")),
            (ZoneType::Text, ZoneInput::Text(value)) => {
                let value = value.trim();
                if value.is_empty() {
                    Err(empty())
                } else {
                    Ok(value.to_string())
                }
            }
            (ZoneType::Text, _) => Err(mismatch("text")),
        }
    }
}

fn is_image_payload(value: &str) -> bool {
    value
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(','))
        .is_some_and(|(_, data)| !data.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::zone::ZoneRole;

    fn zone(zone_type: ZoneType) -> SignatureZone {
        SignatureZone {
            id: "z".into(),
            template_id: "t".into(),
            zone_type,
            label: "z".into(),
            role: ZoneRole::Owner,
            page_number: 1,
            x_position: 0.0,
            y_position: 0.0,
            width: 100.0,
            height: 30.0,
            is_required: true,
            sort_order: 1,
            field_key: None,
        }
    }

    #[test]
    fn formats_dates_day_first() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(format_date(date), "15/03/2025");
    }

    #[test]
    fn blank_canvas_is_rejected() {
        let sig = zone(ZoneType::Signature);
        let blank = ZoneInput::Drawn {
            image: "data:image/png;base64,".into(),
        };
        assert_eq!(blank.into_value(&sig), Err(SigningError::EmptyValue("z".into())));
        let drawn = ZoneInput::Drawn {
            image: "data:image/png;base64,iVBORw0KGgo=".into(),
        };
        assert!(drawn.into_value(&sig).is_ok());
    }

    #[test]
    fn typed_signature_needs_a_name() {
        let initials = zone(ZoneType::Initials);
        let typed = ZoneInput::Typed {
            name: "   ".into(),
            image: "data:image/png;base64,AAAA".into(),
        };
        assert!(typed.into_value(&initials).is_err());
        let typed = ZoneInput::Typed {
            name: "C. M.".into(),
            image: "data:image/png;base64,AAAA".into(),
        };
        assert_eq!(typed.into_value(&initials).unwrap(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn keyboard_input_follows_the_zone_type() {
        let date = ZoneInput::typed_in(ZoneType::Date, "15/03/2025");
        assert_eq!(date, ZoneInput::Date("15/03/2025".into()));
        assert_eq!(date.into_value(&zone(ZoneType::Date)).unwrap(), "15/03/2025");
        let text = ZoneInput::typed_in(ZoneType::Text, " Bon séjour ");
        assert_eq!(text.into_value(&zone(ZoneType::Text)).unwrap(), "Bon séjour");
    }

    #[test]
    fn text_is_trimmed_and_required() {
        let text = zone(ZoneType::Text);
        assert_eq!(
            ZoneInput::Text("  Bon séjour ".into()).into_value(&text).unwrap(),
            "Bon séjour"
        );
        assert!(ZoneInput::Text(" \n".into()).into_value(&text).is_err());
    }

    #[test]
    fn input_kind_must_match_zone_type() {
        let date = zone(ZoneType::Date);
        assert_eq!(
            ZoneInput::Text("demain".into()).into_value(&date),
            Err(SigningError::InputMismatch {
                zone_id: "z".into(),
                expected: "date",
            })
        );
    }
}
