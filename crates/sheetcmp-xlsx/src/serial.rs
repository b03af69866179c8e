//! Excel date serial numbers
//!
//! In the 1900 date system serial 1 is 1900-01-01 and serial 60 is the
//! nonexistent 1900-02-29, so serials from 61 on are one day ahead of a plain
//! day count. The 1904 system counts days from 1904-01-01 without that quirk.

use chrono::{Duration, NaiveDate, NaiveDateTime};

const MS_PER_DAY: f64 = 86_400_000.0;

/// First serial past 9999-12-31
const MAX_SERIAL: f64 = 2_958_466.0;

fn epoch(date1904: bool, early: bool) -> Option<NaiveDateTime> {
    let date = match (date1904, early) {
        (true, _) => NaiveDate::from_ymd_opt(1904, 1, 1)?,
        (false, true) => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        (false, false) => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    date.and_hms_opt(0, 0, 0)
}

/// Convert a serial to a timestamp, rounded to the millisecond
pub(crate) fn serial_to_datetime(serial: f64, date1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..MAX_SERIAL).contains(&serial) {
        return None;
    }
    let base = epoch(date1904, serial < 60.0)?;
    let ms = (serial * MS_PER_DAY).round() as i64;
    base.checked_add_signed(Duration::milliseconds(ms))
}

/// Convert a timestamp to a 1900-system serial
pub(crate) fn datetime_to_serial(dt: NaiveDateTime) -> Option<f64> {
    let late = epoch(false, false)?;
    let days = (dt - late).num_milliseconds() as f64 / MS_PER_DAY;
    if days < 0.0 {
        return None;
    }
    if days < 61.0 {
        Some(days - 1.0)
    } else {
        Some(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_1900_system() {
        assert_eq!(serial_to_datetime(1.0, false), Some(dt(1900, 1, 1, 0, 0, 0)));
        assert_eq!(serial_to_datetime(59.0, false), Some(dt(1900, 2, 28, 0, 0, 0)));
        assert_eq!(serial_to_datetime(61.0, false), Some(dt(1900, 3, 1, 0, 0, 0)));
        assert_eq!(
            serial_to_datetime(45_292.5, false),
            Some(dt(2024, 1, 1, 12, 0, 0))
        );
    }

    #[test]
    fn test_1904_system() {
        assert_eq!(serial_to_datetime(0.0, true), Some(dt(1904, 1, 1, 0, 0, 0)));
        assert_eq!(
            serial_to_datetime(43_830.25, true),
            Some(dt(2024, 1, 1, 6, 0, 0))
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(serial_to_datetime(-1.0, false), None);
        assert_eq!(serial_to_datetime(f64::NAN, false), None);
        assert_eq!(serial_to_datetime(3_000_000.0, false), None);
    }

    #[test]
    fn test_serial_from_datetime() {
        assert_eq!(datetime_to_serial(dt(1900, 1, 1, 0, 0, 0)), Some(1.0));
        assert_eq!(datetime_to_serial(dt(1900, 3, 1, 0, 0, 0)), Some(61.0));
        assert_eq!(datetime_to_serial(dt(2024, 1, 1, 12, 0, 0)), Some(45_292.5));
        assert_eq!(datetime_to_serial(dt(1899, 1, 1, 0, 0, 0)), None);
    }
}
