// lib/src/services/emergency_numbers.rs

use std::collections::BTreeMap;

/// Country used when the requested one is not in the table.
pub const DEFAULT_COUNTRY: &str = "NG";

const NG: &[(&str, &str)] = &[
    ("ambulance", "112"),
    ("police", "101"),
    ("fire", "103"),
    ("poison_control", "+234-803-223-5353"),
    ("fema", "+234-805-114-8811"),
];
const US: &[(&str, &str)] = &[
    ("ambulance", "911"),
    ("police", "911"),
    ("fire", "911"),
    ("poison", "1-800-222-1222"),
];
const GB: &[(&str, &str)] = &[("ambulance", "999"), ("police", "999"), ("fire", "999")];

/// Emergency numbers for an ISO country code, case-insensitive.
/// Unknown codes get the Nigerian table.
pub fn emergency_numbers(country: &str) -> BTreeMap<&'static str, &'static str> {
    let table = match country.to_uppercase().as_str() {
        "US" => US,
        "GB" => GB,
        _ => NG,
    };
    table.iter().copied().collect()
}

/// The number to dial first: the ambulance line, or 112.
pub fn primary_number(numbers: &BTreeMap<&'static str, &'static str>) -> &'static str {
    numbers.get("ambulance").copied().unwrap_or("112")
}
