//! BCD date encoding for clock synchronization

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Encode a calendar timestamp into the device's BCD clock payload
///
/// Seven bytes: century, year, month, day, hour, minute, second, each as a
/// two-digit BCD byte.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gatelink_types::datetime::encode_datetime;
///
/// let dt = NaiveDate::from_ymd_opt(2019, 8, 23)
///     .unwrap()
///     .and_hms_opt(14, 5, 9)
///     .unwrap();
/// assert_eq!(
///     encode_datetime(&dt),
///     [0x20, 0x19, 0x08, 0x23, 0x14, 0x05, 0x09]
/// );
/// ```
pub fn encode_datetime(dt: &NaiveDateTime) -> [u8; 7] {
    let year = dt.year() as u32;
    [
        bcd(year / 100),
        bcd(year % 100),
        bcd(dt.month()),
        bcd(dt.day()),
        bcd(dt.hour()),
        bcd(dt.minute()),
        bcd(dt.second()),
    ]
}

// Input is always 0..=99 coming from chrono's calendar accessors.
fn bcd(value: u32) -> u8 {
    (((value / 10) << 4) | (value % 10)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_known_timestamp() {
        let dt = NaiveDate::from_ymd_opt(2026, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 58)
            .unwrap();

        assert_eq!(
            encode_datetime(&dt),
            [0x20, 0x26, 0x12, 0x31, 0x23, 0x59, 0x58]
        );
    }

    #[test]
    fn test_single_digit_fields_zero_padded() {
        let dt = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();

        assert_eq!(
            encode_datetime(&dt),
            [0x20, 0x20, 0x01, 0x02, 0x03, 0x04, 0x05]
        );
    }
}
