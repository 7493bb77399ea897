//! Normalization from raw API records to [`sellermap_core::SellerEntity`].
//!
//! Every category shares the same entity shape; fields a category does not
//! use (rooms for restaurants, say) are simply empty. Contact links are
//! derived here so that cached entities already carry them.

use sellermap_core::{Address, Contact, ContactUrls, GeoLocation, SellerEntity};

use crate::types::{RawLocation, RawSeller};

const FACEBOOK_PROFILE_BASE: &str = "https://www.facebook.com/";
const INSTAGRAM_PROFILE_BASE: &str = "https://www.instagram.com/";
const LINE_DEEP_LINK_BASE: &str = "https://line.me/ti/p/";

/// Substrings that mark a social value as already being a link rather than a
/// bare handle. Checked in addition to the platform's own domain.
const GENERIC_DOMAIN_FRAGMENTS: [&str; 2] = [".com", ".co.th"];

/// Normalizes one raw record, tagging it with `category`.
#[must_use]
pub fn normalize_seller(raw: RawSeller, category: &str) -> SellerEntity {
    let contact = Contact {
        mobile: raw.contact_mobile_phone_no,
        email: raw.contact_email,
        additional: raw.contact_additional_channel,
        website: raw.biz_contact_website,
        facebook: raw.biz_contact_facebook,
        instagram: raw.biz_contact_instagram,
        line: raw.biz_contact_line,
    };
    let contact_urls = derive_contact_urls(&contact);

    SellerEntity {
        id: raw.id,
        name_th: raw.name_th,
        name_en: raw.name_en,
        business_category: category.to_string(),
        address: Address {
            no: raw.address_no,
            moo: raw.moo,
            district: raw.district,
            sub_district: raw.sub_district,
            province: raw.province,
            postal_code: raw.postal_code,
        },
        location: extract_location(raw.location),
        contact,
        contact_urls,
        rooms: raw.rooms,
        images: raw.images,
    }
}

/// Normalizes a whole page, preserving record order.
#[must_use]
pub fn normalize_page(records: Vec<RawSeller>, category: &str) -> Vec<SellerEntity> {
    records
        .into_iter()
        .map(|raw| normalize_seller(raw, category))
        .collect()
}

/// Reads `[longitude, latitude]`. Anything short of two numbers leaves both
/// coordinates absent.
fn extract_location(location: Option<RawLocation>) -> GeoLocation {
    let Some(location) = location else {
        return GeoLocation::default();
    };

    let (longitude, latitude) = match location.coordinates.as_slice() {
        [Some(lon), Some(lat), ..] => (Some(*lon), Some(*lat)),
        _ => (None, None),
    };

    GeoLocation {
        longitude,
        latitude,
        geometry_type: location.geometry_type,
    }
}

/// Builds canonical links for each contact channel that has a non-empty value.
#[must_use]
pub fn derive_contact_urls(contact: &Contact) -> ContactUrls {
    ContactUrls {
        website: non_empty(contact.website.as_deref()).map(website_url),
        facebook: non_empty(contact.facebook.as_deref())
            .map(|v| social_url(v, "facebook.com", FACEBOOK_PROFILE_BASE)),
        instagram: non_empty(contact.instagram.as_deref())
            .map(|v| social_url(v, "instagram.com", INSTAGRAM_PROFILE_BASE)),
        line: non_empty(contact.line.as_deref()).map(line_url),
    }
}

/// Prepends `https://` unless the value already carries an HTTP(S) scheme.
fn website_url(value: &str) -> String {
    if has_http_scheme(value) {
        value.to_string()
    } else {
        format!("https://{value}")
    }
}

/// Leaves values that already look like links alone; turns bare handles into
/// a profile URL under `profile_base`.
fn social_url(value: &str, platform_domain: &str, profile_base: &str) -> String {
    let lower = value.to_ascii_lowercase();
    let looks_like_link = lower.contains(platform_domain)
        || GENERIC_DOMAIN_FRAGMENTS.iter().any(|f| lower.contains(f))
        || has_http_scheme(value);

    if looks_like_link {
        value.to_string()
    } else {
        format!("{profile_base}{value}")
    }
}

/// LINE ids are always rewritten, verbatim, into a deep link.
fn line_url(id: &str) -> String {
    format!("{LINE_DEEP_LINK_BASE}{id}")
}

fn has_http_scheme(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
