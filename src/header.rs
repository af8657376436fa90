// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{csv::{Field, Row},
            ensure,
            error::{Error, Result}};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use getset::Getters;
use lazy_static::lazy_static;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;


/// First token of the first row.
pub const FORMAT_KEY: &str = "Format";
/// The only format we know how to read.
pub const AIM_CSV_FILE: &str = "AiM CSV File";


#[derive(Clone, Copy, Debug, PartialEq)]
enum Key {
  Vehicle,
  Racer,
  Track,
  Date,
  Time,
  Duration,
  SampleRate,
  LapTimestamps,
}

lazy_static! {
  static ref KEYS: HashMap<&'static str, Key> = {
    let mut keys = HashMap::new();
    keys.insert("Vehicle", Key::Vehicle);
    keys.insert("Racer", Key::Racer);
    keys.insert("Session", Key::Track);
    keys.insert("Date", Key::Date);
    keys.insert("Time", Key::Time);
    keys.insert("Duration", Key::Duration);
    keys.insert("Sample Rate", Key::SampleRate);
    keys.insert("Beacon Markers", Key::LapTimestamps);
    keys
  };
}

const DATE_FORMATS: [&str; 5] =
  ["%A, %B %d, %Y", "%B %d, %Y", "%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"];
const TIME_FORMATS: [&str; 4] = ["%I:%M %p", "%I:%M:%S %p", "%H:%M:%S", "%H:%M"];


/// Metadata from the header block of an export. Anything the export doesn't
/// mention stays `None`.
#[derive(Clone, Debug, Default, PartialEq, Getters, Serialize)]
#[getset(get = "pub")]
pub struct Headers {
  vehicle:        Option<String>,
  racer:          Option<String>,
  /// Named `Session` in the export; holds the track name.
  track:          Option<String>,
  date:           Option<String>,
  time:           Option<String>,
  /// Session duration in seconds.
  duration:       Option<f64>,
  /// Logging rate in Hz.
  sample_rate:    Option<f64>,
  /// Beacon markers, i.e. the instants (seconds since session start) at
  /// which the laps end.
  lap_timestamps: Option<Vec<f64>>,
}

impl Headers {
  /// Reads the header block.
  ///
  /// # Returns
  /// - the `Headers` together with the index of the first row after the blank
  ///   row terminating the header block
  /// - `Error::Format` if the first row doesn't announce an `AiM CSV File`
  /// - `Error::MissingLapMarkers` if no `Beacon Markers` row shows up before
  ///   the header block ends
  pub fn extract(rows: &[Row]) -> Result<(Self, usize)> {
    verify_format(rows.first().and_then(Option::as_ref))?;

    let mut headers = Self::default();
    for (idx, row) in rows.iter().enumerate().skip(1) {
      let row = match row {
        Some(row) => row,
        None => {
          ensure!(headers.lap_timestamps.is_some(), Error::MissingLapMarkers);
          return Ok((headers, idx + 1));
        }
      };
      headers.apply(row);
    }

    // document without a body, i.e. no blank row after the header block
    ensure!(headers.lap_timestamps.is_some(), Error::MissingLapMarkers);
    Ok((headers, rows.len()))
  }

  fn apply(&mut self, row: &[Field]) {
    let key = match row.first().and_then(|key| KEYS.get(key.text().trim())) {
      Some(key) => *key,
      None => return,
    };
    let value = row.get(1);
    let text = || value.map(|field| field.text().trim().to_string());
    let number = || value.and_then(Field::number);

    match key {
      Key::Vehicle => self.vehicle = text(),
      Key::Racer => self.racer = text(),
      Key::Track => self.track = text(),
      Key::Date => self.date = text(),
      Key::Time => self.time = text(),
      Key::Duration => self.duration = number(),
      Key::SampleRate => self.sample_rate = number(),
      Key::LapTimestamps => {
        let timestamps: Vec<f64> =
          row.iter().skip(1).filter_map(Field::number).collect();
        debug!("found {} beacon markers", timestamps.len());
        self.lap_timestamps = Some(timestamps);
      }
    }
  }

  /// Date the session was recorded on, if the `Date` header is readable.
  pub fn parsed_date(&self) -> Option<NaiveDate> {
    let date = self.date.as_deref()?;
    DATE_FORMATS.iter()
                .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
  }

  /// Time of day the session was recorded at, if the `Time` header is
  /// readable.
  pub fn parsed_time(&self) -> Option<NaiveTime> {
    let time = self.time.as_deref()?;
    TIME_FORMATS.iter()
                .find_map(|format| NaiveTime::parse_from_str(time, format).ok())
  }

  /// Convenience wrapper around `parsed_date` and `parsed_time`.
  pub fn datetime(&self) -> Option<NaiveDateTime> {
    Some(self.parsed_date()?.and_time(self.parsed_time()?))
  }
}

fn verify_format(row: Option<&Vec<Field>>) -> Result<()> {
  let row = row.ok_or(Error::Format(None))?;
  ensure!(row.first().map(|key| key.text().trim()) == Some(FORMAT_KEY),
          Error::Format(None));

  let format = row.get(1).map(|format| format.text().trim().to_string());
  ensure!(format.as_deref() == Some(AIM_CSV_FILE), Error::Format(format));
  Ok(())
}
