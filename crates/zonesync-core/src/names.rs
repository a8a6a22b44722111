//! Conversion between fully qualified and zone-relative record names

/// Relative name of the zone apex
pub const APEX: &str = "@";

/// Convert a fully qualified name into a name relative to `zone_name`
///
/// The zone suffix and then one trailing "." are removed; an empty
/// remainder is the apex, [`APEX`].
pub fn to_zone_relative_name(fqdn: &str, zone_name: &str) -> String {
    let remainder = fqdn.strip_suffix(zone_name).unwrap_or(fqdn);
    let remainder = remainder.strip_suffix('.').unwrap_or(remainder);

    if remainder.is_empty() {
        APEX.to_string()
    } else {
        remainder.to_string()
    }
}

/// Convert a zone-relative name back into a fully qualified name
pub fn to_fqdn(relative_name: &str, zone_name: &str) -> String {
    if relative_name == APEX {
        zone_name.to_string()
    } else {
        format!("{relative_name}.{zone_name}")
    }
}
