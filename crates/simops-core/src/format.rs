// ── Display formatting ──
//
// Human-readable rendering shared by every view: byte and megabyte
// volumes, thousands-separated counts, short dates, relative times,
// ICCID truncation, and the TADIG prefix tables for roaming networks.

use chrono::{DateTime, Duration, Utc};

const BYTE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Raw bytes as `"1.5 GB"`-style text. Absent or non-finite values
/// render as `"0 B"`.
pub fn format_bytes(bytes: Option<f64>) -> String {
    let Some(b) = bytes.filter(|b| b.is_finite()) else {
        return "0 B".to_owned();
    };
    if b == 0.0 {
        return "0 B".to_owned();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = ((b.abs().log2() / 10.0).floor().clamp(0.0, 5.0)) as usize;
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let value = b / 1024_f64.powi(idx as i32);
    if idx == 0 {
        format!("{value:.0} {}", BYTE_UNITS[idx])
    } else {
        format!("{value:.1} {}", BYTE_UNITS[idx])
    }
}

/// Megabytes as `"512.0 MB"` / `"5.0 GB"`.
pub fn format_mb(mb: Option<f64>) -> String {
    let Some(mb) = mb.filter(|m| m.is_finite()) else {
        return "0 MB".to_owned();
    };
    if mb >= 1024.0 {
        format!("{:.1} GB", mb / 1024.0)
    } else {
        format!("{mb:.1} MB")
    }
}

/// Thousands-separated count, e.g. `1234567` -> `"1,234,567"`.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Short date, e.g. `"14 Feb 2025"`. `None` renders as `"-"`.
pub fn format_date(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(t) => t.format("%-d %b %Y").to_string(),
        None => "-".to_owned(),
    }
}

/// Relative time, e.g. `"2 hours ago"`.
pub fn time_ago(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = at else {
        return "-".to_owned();
    };
    let seconds = (now - at).num_seconds();
    if seconds < 60 {
        return "just now".to_owned();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return pluralize(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return pluralize(hours, "hour");
    }
    let days = hours / 24;
    if days < 30 {
        return pluralize(days, "day");
    }
    pluralize(days / 30, "month")
}

fn pluralize(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// ICCIDs are 19-20 digits; tables show `"8944...0001"`.
pub fn truncate_iccid(iccid: &str) -> String {
    if iccid.is_empty() {
        return "-".to_owned();
    }
    let len = iccid.chars().count();
    if len <= 8 {
        return iccid.to_owned();
    }
    let head: String = iccid.chars().take(4).collect();
    let tail: String = iccid.chars().skip(len - 4).collect();
    format!("{head}...{tail}")
}

// ── Date-only query parameters ──────────────────────────────────────

/// ISO date `n` days in the past, for `from` query params.
pub fn days_ago(n: i64, now: DateTime<Utc>) -> String {
    (now.date_naive() - Duration::days(n)).to_string()
}

/// ISO date `n` days ahead, for `expiring_before` query params.
pub fn days_from_now(n: i64, now: DateTime<Utc>) -> String {
    (now.date_naive() + Duration::days(n)).to_string()
}

/// Today as an ISO date.
pub fn today(now: DateTime<Utc>) -> String {
    now.date_naive().to_string()
}

// ── TADIG roaming network codes ─────────────────────────────────────

/// Country name for a TADIG code via its 3-letter prefix, e.g.
/// `"GBRCN"` -> `"United Kingdom"`. Unknown codes are echoed back.
pub fn tadig_country(tadig: &str) -> &str {
    if tadig.is_empty() {
        return "Unknown";
    }
    if tadig.len() < 3 {
        return tadig;
    }
    let prefix = prefix3(tadig);
    country_name(&prefix).unwrap_or(tadig)
}

/// Compact country label for chart legends, e.g. `"GBRCN"` -> `"UK"`.
/// Falls back to the full name, then to the raw code.
pub fn tadig_country_short(tadig: &str) -> &str {
    if tadig.is_empty() {
        return "?";
    }
    if tadig.len() < 3 {
        return tadig;
    }
    let prefix = prefix3(tadig);
    short_name(&prefix)
        .or_else(|| country_name(&prefix))
        .unwrap_or(tadig)
}

fn prefix3(tadig: &str) -> String {
    tadig.chars().take(3).flat_map(char::to_uppercase).collect()
}

#[allow(clippy::too_many_lines)]
fn country_name(prefix: &str) -> Option<&'static str> {
    let name = match prefix {
        "GBR" => "United Kingdom",
        "USA" => "United States",
        "DEU" => "Germany",
        "FRA" => "France",
        "ESP" => "Spain",
        "ITA" => "Italy",
        "NLD" => "Netherlands",
        "BEL" => "Belgium",
        "PRT" => "Portugal",
        "IRL" => "Ireland",
        "CHE" => "Switzerland",
        "AUT" => "Austria",
        "SWE" => "Sweden",
        "NOR" => "Norway",
        "DNK" => "Denmark",
        "FIN" => "Finland",
        "POL" => "Poland",
        "CZE" => "Czech Republic",
        "HUN" => "Hungary",
        "ROU" => "Romania",
        "BGR" => "Bulgaria",
        "HRV" => "Croatia",
        "SVK" => "Slovakia",
        "SVN" => "Slovenia",
        "LTU" => "Lithuania",
        "LVA" => "Latvia",
        "EST" => "Estonia",
        "LUX" => "Luxembourg",
        "MLT" => "Malta",
        "CYP" => "Cyprus",
        "GRC" => "Greece",
        "TUR" => "Turkey",
        "ISR" => "Israel",
        "ARE" => "UAE",
        "SAU" => "Saudi Arabia",
        "QAT" => "Qatar",
        "KWT" => "Kuwait",
        "BHR" => "Bahrain",
        "OMN" => "Oman",
        "JOR" => "Jordan",
        "LBN" => "Lebanon",
        "EGY" => "Egypt",
        "MAR" => "Morocco",
        "TUN" => "Tunisia",
        "ZAF" => "South Africa",
        "KEN" => "Kenya",
        "NGA" => "Nigeria",
        "GHA" => "Ghana",
        "TZA" => "Tanzania",
        "UGA" => "Uganda",
        "ETH" => "Ethiopia",
        "SEN" => "Senegal",
        "CMR" => "Cameroon",
        "CIV" => "Cote d'Ivoire",
        "MOZ" => "Mozambique",
        "AGO" => "Angola",
        "COD" => "DR Congo",
        "CHN" => "China",
        "JPN" => "Japan",
        "KOR" => "South Korea",
        "IND" => "India",
        "IDN" => "Indonesia",
        "THA" => "Thailand",
        "MYS" => "Malaysia",
        "SGP" => "Singapore",
        "PHL" => "Philippines",
        "VNM" => "Vietnam",
        "TWN" => "Taiwan",
        "HKG" => "Hong Kong",
        "MAC" => "Macau",
        "MMR" => "Myanmar",
        "KHM" => "Cambodia",
        "LAO" => "Laos",
        "BGD" => "Bangladesh",
        "LKA" => "Sri Lanka",
        "PAK" => "Pakistan",
        "AUS" => "Australia",
        "NZL" => "New Zealand",
        "CAN" => "Canada",
        "MEX" => "Mexico",
        "BRA" => "Brazil",
        "ARG" => "Argentina",
        "CHL" => "Chile",
        "COL" => "Colombia",
        "PER" => "Peru",
        "URY" => "Uruguay",
        "PRY" => "Paraguay",
        "ECU" => "Ecuador",
        "VEN" => "Venezuela",
        "CRI" => "Costa Rica",
        "PAN" => "Panama",
        "DOM" => "Dominican Republic",
        "JAM" => "Jamaica",
        "TTO" => "Trinidad & Tobago",
        "GTM" => "Guatemala",
        "HND" => "Honduras",
        "SLV" => "El Salvador",
        "RUS" => "Russia",
        "UKR" => "Ukraine",
        "BLR" => "Belarus",
        "KAZ" => "Kazakhstan",
        "UZB" => "Uzbekistan",
        "GEO" => "Georgia",
        "ARM" => "Armenia",
        "AZE" => "Azerbaijan",
        "MDA" => "Moldova",
        "ISL" => "Iceland",
        "ALB" => "Albania",
        "MKD" => "North Macedonia",
        "SRB" => "Serbia",
        "MNE" => "Montenegro",
        "BIH" => "Bosnia & Herzegovina",
        "AND" => "Andorra",
        "MCO" => "Monaco",
        "LIE" => "Liechtenstein",
        "SMR" => "San Marino",
        "MNG" => "Mongolia",
        "NPL" => "Nepal",
        "AFG" => "Afghanistan",
        "IRQ" => "Iraq",
        "IRN" => "Iran",
        "SYR" => "Syria",
        "YEM" => "Yemen",
        "LBY" => "Libya",
        "SDN" => "Sudan",
        "SSD" => "South Sudan",
        "RWA" => "Rwanda",
        "BDI" => "Burundi",
        "MWI" => "Malawi",
        "ZMB" => "Zambia",
        "ZWE" => "Zimbabwe",
        "BWA" => "Botswana",
        "NAM" => "Namibia",
        "SWZ" => "Eswatini",
        "LSO" => "Lesotho",
        "MDG" => "Madagascar",
        "MUS" => "Mauritius",
        "REU" => "Reunion",
        "GLP" => "Guadeloupe",
        "MTQ" => "Martinique",
        "GUF" => "French Guiana",
        "PYF" => "French Polynesia",
        "NCL" => "New Caledonia",
        "FJI" => "Fiji",
        "PNG" => "Papua New Guinea",
        "PRI" => "Puerto Rico",
        "BMU" => "Bermuda",
        "CYM" => "Cayman Islands",
        "BRB" => "Barbados",
        "BHS" => "Bahamas",
        "CUB" => "Cuba",
        "HTI" => "Haiti",
        _ => return None,
    };
    Some(name)
}

fn short_name(prefix: &str) -> Option<&'static str> {
    let name = match prefix {
        "GBR" => "UK",
        "USA" => "US",
        "DEU" => "DE",
        "FRA" => "FR",
        "ESP" => "ES",
        "ITA" => "IT",
        "NLD" => "NL",
        "BEL" => "BE",
        "PRT" => "PT",
        "IRL" => "IE",
        "CHE" => "CH",
        "AUT" => "AT",
        "SWE" => "SE",
        "NOR" => "NO",
        "DNK" => "DK",
        "FIN" => "FI",
        "POL" => "PL",
        "CZE" => "CZ",
        "HUN" => "HU",
        "ROU" => "RO",
        "BGR" => "BG",
        "HRV" => "HR",
        "SVK" => "SK",
        "SVN" => "SI",
        "LTU" => "LT",
        "LVA" => "LV",
        "EST" => "EE",
        "LUX" => "LU",
        "GRC" => "GR",
        "TUR" => "TR",
        "ARE" => "UAE",
        "SAU" => "KSA",
        "ZAF" => "SA",
        "AUS" => "AU",
        "NZL" => "NZ",
        "CAN" => "CA",
        "MEX" => "MX",
        "BRA" => "BR",
        "ARG" => "AR",
        "CHN" => "CN",
        "JPN" => "JP",
        "KOR" => "KR",
        "IND" => "IN",
        "IDN" => "ID",
        "THA" => "TH",
        "MYS" => "MY",
        "SGP" => "SG",
        "PHL" => "PH",
        "VNM" => "VN",
        "TWN" => "TW",
        "HKG" => "HK",
        "RUS" => "RU",
        "UKR" => "UA",
        "DOM" => "Dom Rep",
        "TTO" => "T&T",
        "BIH" => "BiH",
        "MKD" => "N. Macedonia",
        _ => return None,
    };
    Some(name)
}
