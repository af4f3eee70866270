#[cfg(feature = "chrono")]
use chrono::NaiveDate;

/// A DOS compatible date, as packed into a directory entry's date fields.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Date {
    /// Full year, `[1980, 2107]`.
    pub year: u16,
    /// Month of the year, `[1, 12]`.
    pub month: u16,
    /// Day of the month, `[1, 31]`.
    pub day: u16,
}

impl Date {
    pub(crate) fn decode(dos_date: u16) -> Self {
        let year = (dos_date >> 9) + 1980;
        let month = (dos_date >> 5) & 0xF;
        let day = dos_date & 0x1F;
        Date { year, month, day }
    }
}

#[cfg(feature = "chrono")]
impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        NaiveDate::from_ymd_opt(date.year as i32, date.month as u32, date.day as u32)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(1980, 1, 1).unwrap())
    }
}

/// A DOS compatible time, as packed into a directory entry's time fields.
///
/// The on-disk seconds field only has two-second resolution: the stored value is
/// doubled here to recover a `[0, 59]` seconds-after-the-minute count.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Time {
    /// Hours after midnight, `[0, 23]`.
    pub hour: u16,
    /// Minutes after the hour, `[0, 59]`.
    pub min: u16,
    /// Seconds after the minute, `[0, 58]` in steps of two.
    pub sec: u16,
}

impl Time {
    pub(crate) fn decode(dos_time: u16) -> Self {
        let hour = dos_time >> 11;
        let min = (dos_time >> 5) & 0x3F;
        let sec = (dos_time & 0x1F) * 2;
        Time { hour, min, sec }
    }
}

/// A DOS compatible date and time, decoded from a directory entry's creation fields.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
}

impl DateTime {
    pub(crate) fn decode(dos_date: u16, dos_time: u16) -> Self {
        DateTime { date: Date::decode(dos_date), time: Time::decode(dos_time) }
    }
}

#[cfg(feature = "chrono")]
impl From<DateTime> for chrono::NaiveDateTime {
    fn from(date_time: DateTime) -> Self {
        let date = NaiveDate::from(date_time.date);
        date.and_hms_opt(date_time.time.hour as u32, date_time.time.min as u32, date_time.time.sec as u32)
            .unwrap_or_else(|| date.and_hms_opt(0, 0, 0).unwrap())
    }
}
