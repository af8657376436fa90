// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Jonas Reitemeyer <alumni@bmc-labs.com>
//   Florian Eich <florian@bmc-labs.com>

use crate::{align::{self, ReferenceTrack},
            channel::{Channel, Channels, Layout, DISTANCE, SPEED},
            csv,
            error::{Error, Result},
            header::Headers,
            lap::Lap,
            options::SessionOptions,
            segment,
            speed};
use getset::Getters;
use log::info;
use serde::Serialize;
use std::str::FromStr;


/// Root object holding everything read from one export: the header block,
/// the laps and the channels every sample of every lap carries.
#[derive(Clone, Debug, PartialEq, Getters, Serialize)]
#[getset(get = "pub")]
pub struct Session {
  headers:  Headers,
  laps:     Vec<Lap>,
  channels: Channels,
}

impl Session {
  /// Builds a `Session` from the text of an AiM CSV export with default
  /// `SessionOptions`.
  pub fn parse(text: &str) -> Result<Self> {
    Self::parse_with(text, &SessionOptions::default())
  }

  /// Builds a `Session` from the text of an AiM CSV export.
  ///
  /// If the export has no `Distance` channel, it is synthesized by aligning
  /// all laps onto a reference track; laps which can't be aligned are not
  /// part of the session. If the export has no `GPS Speed` channel, it is
  /// derived from the positions.
  ///
  /// # Returns
  /// - the `Session`
  /// - `Error::Format`, `Error::MissingLapMarkers` or
  ///   `Error::MissingChannel` if the export can't be read
  /// - `Error::NoBestLap` if distances need to be synthesized, `options` have
  ///   no reference track and there are fewer than three laps
  pub fn parse_with(text: &str, options: &SessionOptions) -> Result<Self> {
    let rows = csv::parse(text);
    let (headers, body_start) = Headers::extract(&rows)?;
    let body = &rows[body_start..];

    let mut channels = segment::channels(body);
    let synthesize_distance = !channels.contains(DISTANCE);
    let synthesize_speed = !channels.contains(SPEED);
    channels.synthesize(DISTANCE, "m");
    channels.synthesize(SPEED, "km/h");

    let boundaries = headers.lap_timestamps().clone().unwrap_or_default();
    let mut laps =
      segment::segment(&channels, segment::sample_rows(body), &boundaries)?;

    let layout = Layout::resolve(&channels)?;
    if synthesize_distance {
      laps = align::align(laps, &layout, options)?;
    }
    if synthesize_speed {
      speed::derive(&mut laps, &layout);
    }

    info!("read session with {} laps and {} channels",
          laps.len(),
          channels.len());
    Ok(Self { headers,
              laps,
              channels })
  }

  pub fn number_of_laps(&self) -> usize {
    self.laps.len()
  }

  pub fn number_of_channels(&self) -> usize {
    self.channels.len()
  }

  pub fn channel_names(&self) -> &[String] {
    self.channels.names()
  }

  pub fn lap(&self, number: usize) -> Option<&Lap> {
    self.laps.get(number)
  }

  /// The lap all other laps were aligned onto, if this session picked one.
  pub fn reference_lap(&self) -> Option<&Lap> {
    self.laps.iter().find(|lap| lap.is_reference())
  }

  /// The path of the reference lap, e.g. to align another session of the
  /// same track against it via `SessionOptions::with_reference`.
  pub fn reference_track(&self) -> Option<ReferenceTrack> {
    let layout = Layout::resolve(&self.channels).ok()?;
    self.reference_lap()
        .map(|lap| ReferenceTrack::from_lap(lap, &layout))
  }

  /// Request the data of channel `name` within lap `number`.
  pub fn channel(&self, name: &str, number: usize) -> Option<Channel> {
    self.lap(number)?.channel(&self.channels, name)
  }
}

impl FromStr for Session {
  type Err = Error;

  fn from_str(text: &str) -> Result<Self> {
    Self::parse(text)
  }
}
