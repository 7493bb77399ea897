//! Wire types for the seller search endpoint.
//!
//! ## Request
//! `POST` with a JSON body `{limit, businessType, province?, page}`. `province`
//! is omitted entirely when no region filter is set; the API treats an empty
//! list as "match nothing".
//!
//! ## Response envelope
//! `{success: bool, data: {data: [record], totalPages, totalItems, hasNextPage}}`.
//! A falsy `success` or a missing/empty `data` means "no more usable data" and
//! is not an error. Anything that is not JSON, or whose `data` object has the
//! wrong shape, is a deserialization error.
//!
//! ## Records
//! Identifiers, house numbers, postal codes and phone numbers arrive as either
//! strings or numbers depending on who entered the listing, and any field may
//! be `null` or of an unexpected type. One odd record must not sink its page,
//! so record fields are read leniently and normalized to text.

use sellermap_core::Room;
use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Body of one page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest<'a> {
    pub limit: u32,
    pub business_type: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub province: &'a [String],
    pub page: u32,
}

/// The `data` object of a successful page response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePayload {
    /// Records on this page. May be shorter than `limit` on any page.
    #[serde(default, deserialize_with = "lenient::records")]
    pub data: Vec<RawSeller>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(default)]
    pub has_next_page: Option<bool>,
}

impl PagePayload {
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.has_next_page.unwrap_or(false)
    }
}

/// One raw seller record as returned by the API.
///
/// Every field is read leniently: a value of an unexpected type becomes
/// absent instead of failing the whole page. Numbers in text fields are
/// rendered as text.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeller {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name_th: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name_en: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub address_no: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub moo: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sub_district: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub postal_code: Option<String>,

    /// GeoJSON-style point: `{"type": "Point", "coordinates": [lon, lat]}`.
    #[serde(default, deserialize_with = "lenient::location")]
    pub location: Option<RawLocation>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub contact_mobile_phone_no: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub contact_additional_channel: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub biz_contact_website: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub biz_contact_facebook: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub biz_contact_instagram: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub biz_contact_line: Option<String>,

    #[serde(default, deserialize_with = "lenient::rooms")]
    pub rooms: Vec<Room>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub images: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLocation {
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub geometry_type: Option<String>,
    /// `[longitude, latitude]`, in that order. Non-numeric items are `None`.
    #[serde(default, deserialize_with = "lenient::numbers")]
    pub coordinates: Vec<Option<f64>>,
}

/// Field-level deserializers that never reject a value for its type.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use sellermap_core::Room;

    use super::{RawLocation, RawSeller};

    pub(super) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub(super) fn numbers<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Option<f64>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.iter().map(Value::as_f64).collect(),
            _ => Vec::new(),
        })
    }

    pub(super) fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub(super) fn location<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<RawLocation>, D::Error> {
        Ok(match Value::deserialize(d)? {
            value @ Value::Object(_) => RawLocation::deserialize(value).ok(),
            _ => None,
        })
    }

    pub(super) fn rooms<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Room>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| Room::deserialize(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    /// The record list itself must be an array (or null); items that are
    /// not objects are skipped.
    pub(super) fn records<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<RawSeller>, D::Error> {
        let items = Option::<Vec<Value>>::deserialize(d)?.unwrap_or_default();
        Ok(items
            .into_iter()
            .filter_map(|item| {
                let record = match item {
                    value @ Value::Object(_) => RawSeller::deserialize(value).ok(),
                    _ => None,
                };
                if record.is_none() {
                    tracing::warn!("skipping seller record that is not an object");
                }
                record
            })
            .collect())
    }
}

/// Extracts the page payload from a raw response body.
///
/// Returns `Ok(None)` when the envelope signals end-of-data (falsy `success`,
/// missing or empty `data`).
///
/// # Errors
///
/// Returns [`IngestError::Deserialize`] if `data` is present but does not have
/// the expected shape.
pub fn page_payload(raw: &serde_json::Value, page: u32) -> Result<Option<PagePayload>, IngestError> {
    let success = raw.get("success").is_some_and(is_truthy);
    let data = raw.get("data").filter(|d| is_truthy(d));

    let Some(data) = data.filter(|_| success) else {
        return Ok(None);
    };

    PagePayload::deserialize(data)
        .map(Some)
        .map_err(|e| IngestError::Deserialize {
            context: format!("seller page {page}"),
            source: e,
        })
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}
