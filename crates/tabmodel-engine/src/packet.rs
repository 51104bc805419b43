//! Packed date formatting
//!
//! Legacy exports store dates as digit runs (`240305`, `20240305`,
//! `20240305103000`). Packet fields turn them into display dates.

use tabmodel_core::KnownInputPacketFormat;

/// Format a packed date value
///
/// Empty values and `0` format to an empty string, as do formats this
/// function does not know.
pub fn format_packed(value: &str, format: &KnownInputPacketFormat) -> String {
    let value = value.trim();
    if value.is_empty() || value == "0" {
        return String::new();
    }

    match format {
        KnownInputPacketFormat::ShortDateFormat => {
            let v = fit(value, 6);
            format!("{}/{}/{}", &v[0..2], &v[2..4], &v[4..6])
        }
        KnownInputPacketFormat::LongDateFormat => {
            let v = fit(value, 8);
            format!("{}/{}/{}", &v[0..4], &v[4..6], &v[6..8])
        }
        KnownInputPacketFormat::FullDateFormat => {
            let v = fit(value, 14);
            format!(
                "{}/{}/{} {}:{}:{}",
                &v[6..8],
                &v[4..6],
                &v[0..4],
                &v[8..10],
                &v[10..12],
                &v[12..14]
            )
        }
        KnownInputPacketFormat::Other(name) => {
            tracing::debug!(format = %name, "unknown packet format");
            String::new()
        }
    }
}

/// Left-pad with zeros to `width`, keeping the rightmost `width` chars
///
/// Non-ASCII characters are replaced so the result can be sliced by byte.
fn fit(value: &str, width: usize) -> String {
    let ascii: Vec<char> = value
        .chars()
        .map(|c| if c.is_ascii() { c } else { '0' })
        .collect();
    let skip = ascii.len().saturating_sub(width);
    let kept: String = ascii[skip..].iter().collect();
    format!("{kept:0>width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_dates() {
        let f = KnownInputPacketFormat::ShortDateFormat;
        assert_eq!(format_packed("240305", &f), "24/03/05");
        assert_eq!(format_packed("40305", &f), "04/03/05");
        assert_eq!(format_packed("20240305", &f), "24/03/05");
    }

    #[test]
    fn long_dates() {
        let f = KnownInputPacketFormat::LongDateFormat;
        assert_eq!(format_packed("20240305", &f), "2024/03/05");
        assert_eq!(format_packed(" 990101 ", &f), "0099/01/01");
    }

    #[test]
    fn full_dates() {
        let f = KnownInputPacketFormat::FullDateFormat;
        assert_eq!(format_packed("20240305103000", &f), "05/03/2024 10:30:00");
    }

    #[test]
    fn empty_zero_and_unknown() {
        assert_eq!(format_packed("", &KnownInputPacketFormat::LongDateFormat), "");
        assert_eq!(format_packed(" 0 ", &KnownInputPacketFormat::ShortDateFormat), "");
        assert_eq!(format_packed("20240305", &KnownInputPacketFormat::Other("yyyy".into())), "");
    }
}
