// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Jonas Reitemeyer <alumni@bmc-labs.com>
//   Florian Eich <florian@bmc-labs.com>

use crate::{channel::{Channels, TIME},
            csv::{Field, Row},
            error::{Error, Result},
            lap::{Lap, Sample}};
use log::debug;
use std::mem;


/// Rows of the body in front of the first sample: channel names, units and
/// one row we don't care about.
const LAYOUT_ROWS: usize = 3;


/// Reads the channel set from the body of an export, i.e. everything after
/// the blank row that ends the header block. The first row holds the channel
/// names, the second one the units.
pub fn channels(body: &[Row]) -> Channels {
  let texts = |row: Option<&Row>| -> Vec<String> {
    row.and_then(Option::as_ref)
       .map(|fields| fields.iter().map(|f| f.text().trim().to_string()).collect())
       .unwrap_or_default()
  };
  Channels::from_rows(&texts(body.first()), &texts(body.get(1)))
}

/// The sample rows of the body.
pub fn sample_rows(body: &[Row]) -> &[Row] {
  body.get(LAYOUT_ROWS..).unwrap_or(&[])
}


/// Splits `rows` into laps at the beacon markers in `boundaries`.
///
/// A sample belongs to the first lap whose end boundary it hasn't reached.
/// Its time is rebased on the start of that lap. Every channel of `channels`
/// gets a value in every sample; cells which are missing or not numeric, and
/// channels that don't come from the export, are NaN.
///
/// A lap is only kept if it ends after it started: laps in between two
/// boundaries end at the second one, the final lap ends at the (lap relative)
/// time of its last sample. Laps without samples are dropped as well. Laps
/// are numbered by their position among the kept laps.
pub fn segment(channels: &Channels,
               rows: &[Row],
               boundaries: &[f64])
               -> Result<Vec<Lap>> {
  channels.verify()?;
  let time = channels.position(TIME)
                     .ok_or_else(|| Error::MissingChannel(TIME.to_string()))?;
  let time_column = channels.column(time)
                            .ok_or_else(|| {
                              Error::MissingChannel(TIME.to_string())
                            })?;

  let mut candidates: Vec<Vec<Sample>> = Vec::new();
  let mut current = Vec::new();
  let mut lap = 0;
  for (idx, row) in rows.iter().enumerate() {
    let row = match row {
      Some(row) => row,
      None => continue,
    };
    let instant = match row.get(time_column).and_then(Field::number) {
      Some(instant) => instant,
      None => {
        debug!("sample row {} has no numeric time, skipping it", idx);
        continue;
      }
    };

    while lap < boundaries.len() && instant >= boundaries[lap] {
      candidates.push(mem::take(&mut current));
      lap += 1;
    }
    let offset = if lap == 0 { 0.0 } else { boundaries[lap - 1] };

    let cell = |channel: usize| {
      channels.column(channel)
              .and_then(|column| row.get(column))
              .and_then(Field::number)
              .unwrap_or(f64::NAN)
    };
    let mut values: Vec<f64> = (0..channels.len()).map(cell).collect();
    values[time] = instant - offset;
    current.push(Sample::new(values));
  }
  candidates.push(current);

  let last = candidates.len() - 1;
  let mut laps = Vec::with_capacity(candidates.len());
  for (candidate, samples) in candidates.into_iter().enumerate() {
    let start = if candidate == 0 {
      0.0
    } else {
      boundaries[candidate - 1]
    };
    let end = match samples.last() {
      Some(_) if candidate < last => boundaries[candidate],
      Some(sample) => sample.get(time),
      None => {
        debug!("lap candidate {} has no samples, dropping it", candidate);
        continue;
      }
    };

    if end > start {
      laps.push(Lap::new(laps.len(), start, end - start, samples));
    } else {
      debug!("lap candidate {} ends at {} before it starts at {}, dropping it",
             candidate, end, start);
    }
  }

  Ok(laps)
}
