//! Normalized seller listings and the pagination summary that accompanies
//! every fetched batch.
//!
//! Serialized field names follow the on-disk cache format: entity fields are
//! snake_case (`name_th`, `sub_district`, `contact_urls`), pagination fields
//! are camelCase (`totalPages`, `pagesFetched`), and room sub-records keep the
//! remote API's own camelCase keys.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserializes a JSON array that may also be `null` or absent.
///
/// Use together with `#[serde(default)]`.
///
/// # Errors
///
/// Propagates the deserializer error when the value is neither `null` nor an
/// array of `T`.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A scalar the remote API sends as either a string or a number depending on
/// the record (identifiers, house numbers, postal codes, prices).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{s}"),
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Float(n) => write!(f, "{n}"),
        }
    }
}

/// A seller listing normalized from one raw API record.
///
/// Entities belong to the batch that produced them; two categories may
/// contain the same seller and are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerEntity {
    /// Remote record identifier, rendered as text.
    pub id: Option<String>,
    pub name_th: Option<String>,
    pub name_en: Option<String>,
    /// Category label supplied by the caller (e.g. `"accommodation"`).
    pub business_category: String,
    pub address: Address,
    pub location: GeoLocation,
    pub contact: Contact,
    /// Canonical links derived from [`Contact`]. Only channels with a
    /// non-empty source value appear.
    #[serde(default)]
    pub contact_urls: ContactUrls,
    /// Room sub-records. Empty for categories without rooms.
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Image URLs in API order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl SellerEntity {
    /// Display name, preferring the Thai name and falling back to English.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name_th
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name_en.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Building / house number.
    pub no: Option<String>,
    /// Village sub-unit.
    pub moo: Option<String>,
    pub district: Option<String>,
    pub sub_district: Option<String>,
    /// Region (province).
    pub province: Option<String>,
    pub postal_code: Option<String>,
}

/// Point geometry of a seller.
///
/// Missing coordinates are `None`, never `0.0`: zero is a real coordinate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Geometry type reported by the API (usually `"Point"`).
    #[serde(rename = "type")]
    pub geometry_type: Option<String>,
}

impl GeoLocation {
    /// `(longitude, latitude)` when both are known.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.longitude.zip(self.latitude)
    }
}

/// Contact channels exactly as stored by the remote API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub mobile: Option<String>,
    pub email: Option<String>,
    /// Free-form "other channel" text.
    pub additional: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    /// LINE messaging id.
    pub line: Option<String>,
}

/// Channel name to canonical URL mapping.
///
/// Serializes as a JSON object that omits channels with no URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

impl ContactUrls {
    /// `(channel, url)` pairs for every channel that has a URL.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("website", self.website.as_deref()),
            ("facebook", self.facebook.as_deref()),
            ("instagram", self.instagram.as_deref()),
            ("line", self.line.as_deref()),
        ]
        .into_iter()
        .filter_map(|(channel, url)| url.map(|u| (channel, u)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// A room offered by an accommodation listing.
///
/// Only the fields the renderer reads are typed; everything else the API sends
/// is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_room: Option<Scalar>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Pagination bookkeeping for one fetched batch.
///
/// `total_pages` and `total_items` are the server's first-page figures;
/// `pages_fetched` and `total_sellers` come from the fetch loop itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSummary {
    pub total_pages: Option<u32>,
    pub total_items: Option<u64>,
    pub pages_fetched: u32,
    pub total_sellers: usize,
}

impl PaginationSummary {
    /// `true` when the loop stopped before the server-reported page count,
    /// i.e. the server said there was no next page earlier than advertised.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.total_pages
            .is_some_and(|total| self.pages_fetched < total)
    }
}
