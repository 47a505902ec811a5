//! リスティングの型定義
//!
//! バックエンドの `GET /listings/{id}` のレスポンスと、
//! `PUT /listings/{id}` に送る更新レコード。

use crate::error::{Error, Result};
use crate::types::RemoteImage;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 物件種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Townhouse,
    Studio,
    Loft,
    Duplex,
    Room,
}

impl PropertyType {
    pub const ALL: [PropertyType; 8] = [
        PropertyType::Apartment,
        PropertyType::House,
        PropertyType::Condo,
        PropertyType::Townhouse,
        PropertyType::Studio,
        PropertyType::Loft,
        PropertyType::Duplex,
        PropertyType::Room,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::House => "House",
            PropertyType::Condo => "Condo",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Studio => "Studio",
            PropertyType::Loft => "Loft",
            PropertyType::Duplex => "Duplex",
            PropertyType::Room => "Room",
        }
    }
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PropertyType::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown property type: {}", s))
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// リスティング詳細（画像以外の項目は表示用）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingDetail {
    pub id: String,
    pub title: String,
    pub city: String,
    pub state: String,
    pub price: Option<f64>,
    pub images: Vec<RemoteImage>,
}

/// アップロードAPIが返す画像レコード
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    pub id: String,
    #[serde(default)]
    pub listing_id: String,
    pub image_url: String,
}

/// リスティング更新レコード
///
/// 未指定の項目は送らない。送信前に `validate` で検証する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<String>,
}

impl ListingUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("title", &self.title),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
        ] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(invalid(field, "空にはできません"));
            }
        }

        if let Some(price) = self.price {
            if !(price.is_finite() && price > 0.0) {
                return Err(invalid("price", "0より大きい値を指定してください"));
            }
        }
        if self.bedrooms == Some(0) {
            return Err(invalid("bedrooms", "1以上を指定してください"));
        }
        if let Some(bathrooms) = self.bathrooms {
            if !(bathrooms.is_finite() && bathrooms > 0.0) {
                return Err(invalid("bathrooms", "0より大きい値を指定してください"));
            }
        }
        if let (Some(from), Some(to)) = (self.available_from, self.available_to) {
            if from > to {
                return Err(invalid(
                    "available_to",
                    format!("開始日 {} より後の日付を指定してください", from),
                ));
            }
        }
        Ok(())
    }

    /// 検証してからJSONに変換
    pub fn to_json(&self) -> Result<serde_json::Value> {
        self.validate()?;
        Ok(serde_json::to_value(self)?)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> Error {
    Error::InvalidField {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_detail_from_backend() {
        let json = r#"{
            "id": "l1",
            "title": "Sunny room",
            "price": 1200.0,
            "city": "Austin",
            "state": "TX",
            "user": {"id": "u1"},
            "images": [
                {"id": "a", "image_url": "https://cdn/a.jpg", "listing_id": "l1"},
                {"id": "b", "image_url": "https://cdn/b.jpg", "listing_id": "l1"}
            ]
        }"#;
        let listing: ListingDetail = serde_json::from_str(json).unwrap();
        assert_eq!(listing.images.len(), 2);
        assert_eq!(listing.images[1].url, "https://cdn/b.jpg");
    }

    #[test]
    fn test_listing_detail_without_images() {
        let listing: ListingDetail = serde_json::from_str(r#"{"id": "l1"}"#).unwrap();
        assert!(listing.images.is_empty());
    }

    #[test]
    fn test_property_type_parse() {
        assert_eq!("studio".parse::<PropertyType>(), Ok(PropertyType::Studio));
        assert_eq!("Townhouse".parse::<PropertyType>(), Ok(PropertyType::Townhouse));
        assert!("castle".parse::<PropertyType>().is_err());
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = ListingUpdate {
            price: Some(950.0),
            property_type: Some(PropertyType::Loft),
            available_from: NaiveDate::from_ymd_opt(2025, 6, 1),
            ..Default::default()
        };
        let json = update.to_json().unwrap();
        assert_eq!(json["price"], 950.0);
        assert_eq!(json["property_type"], "Loft");
        assert_eq!(json["available_from"], "2025-06-01");
        assert!(json.get("title").is_none());
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let update = ListingUpdate {
            price: Some(0.0),
            ..Default::default()
        };
        let err = update.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "price", .. }));
    }

    #[test]
    fn test_validate_rejects_inverted_dates() {
        let update = ListingUpdate {
            available_from: NaiveDate::from_ymd_opt(2025, 9, 1),
            available_to: NaiveDate::from_ymd_opt(2025, 8, 1),
            ..Default::default()
        };
        assert!(matches!(
            update.validate(),
            Err(Error::InvalidField { field: "available_to", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_blank_title_and_zero_bedrooms() {
        let blank = ListingUpdate {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let zero = ListingUpdate {
            bedrooms: Some(0),
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_is_empty() {
        assert!(ListingUpdate::default().is_empty());
        let update = ListingUpdate {
            city: Some("Austin".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
