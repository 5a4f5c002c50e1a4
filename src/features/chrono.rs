//! Compact timestamps for log messages.
//!
//! ```
//! use chrono::{NaiveDate, Utc};
//! use sllm::chrono::TimeFormat;
//!
//! let time = NaiveDate::from_ymd_opt(2019, 1, 11).unwrap().and_hms_opt(19, 32, 44).unwrap().and_utc();
//! let stamp = TimeFormat::DEFAULT.format(&time);
//! let message = sllm::expand("started at `time`", &sllm::positional(&[sllm::Value::Custom(&stamp)]));
//! assert_eq!(message.unwrap(), "started at `time:01-11 Fr 19:32:44`");
//! ```

use std::fmt::Write;

use bitflags::bitflags;
use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike};

use crate::{Appender, ArgWriter};

bitflags! {
	/// The parts of a timestamp to write.
	///
	/// The date is written if any of `DATE`, `YEAR` or `WEEKDAY` is set,
	/// the time of day if any of `CLOCK`, `MILLIS` or `MICROS` is set.
	///
	/// Written as `[YYYY-]MM-DD[ Wd] HH:MM:SS[.mmm|.uuuuuu]`.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct TimeFormat: u8 {
		/// Convert to UTC before formatting, instead of using the time zone of the timestamp.
		const UTC = 1 << 0;

		/// Write month and day.
		const DATE = 1 << 1;

		/// Write the first two letters of the weekday after the date.
		const WEEKDAY = 1 << 2;

		/// Write the year before month and day.
		const YEAR = 1 << 3;

		/// Write hours, minutes and seconds.
		const CLOCK = 1 << 4;

		/// Write milliseconds after the seconds.
		const MILLIS = 1 << 5;

		/// Write microseconds after the seconds.
		///
		/// Takes precedence over `MILLIS`.
		const MICROS = 1 << 6;

		/// Date, weekday and time of day.
		const DEFAULT = Self::DATE.bits() | Self::WEEKDAY.bits() | Self::CLOCK.bits();
	}
}

impl Default for TimeFormat {
	fn default() -> Self {
		Self::DEFAULT
	}
}

impl TimeFormat {
	/// Prepare a timestamp to be written as argument value in this format.
	pub fn format<Tz: TimeZone>(self, time: &DateTime<Tz>) -> Timestamp {
		let time = if self.contains(Self::UTC) {
			time.naive_utc()
		} else {
			time.naive_local()
		};
		Timestamp { format: self, time }
	}
}

/// A timestamp with a [`TimeFormat`], ready to be written as argument value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
	format: TimeFormat,
	time: NaiveDateTime,
}

impl Appender for Timestamp {
	fn append_sllm(&self, out: &mut ArgWriter<'_>) -> std::fmt::Result {
		let format = self.format;
		let time = &self.time;
		let with_clock = format.intersects(TimeFormat::CLOCK | TimeFormat::MILLIS | TimeFormat::MICROS);

		if format.intersects(TimeFormat::DATE | TimeFormat::YEAR | TimeFormat::WEEKDAY) {
			if format.contains(TimeFormat::YEAR) {
				write!(out, "{:04}-", time.year())?;
			}
			write!(out, "{:02}-{:02}", time.month(), time.day())?;
			if format.contains(TimeFormat::WEEKDAY) {
				let weekday = time.weekday().to_string();
				write!(out, " {}", &weekday[..2])?;
			}
			if with_clock {
				out.write_char(' ');
			}
		}

		if with_clock {
			write!(out, "{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())?;
			// Leap seconds are reported as nanoseconds beyond one second.
			let nanos = time.nanosecond() % 1_000_000_000;
			if format.contains(TimeFormat::MICROS) {
				write!(out, ".{:06}", nanos / 1_000)?;
			} else if format.contains(TimeFormat::MILLIS) {
				write!(out, ".{:03}", nanos / 1_000_000)?;
			}
		}
		Ok(())
	}
}
