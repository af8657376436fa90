// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{channel::Layout,
            ensure,
            error::{Error, Result},
            geo::{haversine, Coordinate},
            lap::Lap,
            options::SessionOptions};
use getset::{CopyGetters, Getters};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};


/// Default alignment window in metres.
pub const DISTANCE_THRESHOLD: f64 = 3.0;


/// A point of the reference track and how far along the track it lies.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters, Deserialize, Serialize)]
#[getset(get_copy = "pub")]
pub struct TrackPoint {
  coordinate: Coordinate,
  distance:   f64,
}

impl TrackPoint {
  pub fn new(coordinate: Coordinate, distance: f64) -> Self {
    Self { coordinate,
           distance }
  }
}


/// The path of the reference lap, i.e. the distance axis every other lap is
/// aligned onto.
#[derive(Clone, Debug, Default, PartialEq, Getters, Deserialize, Serialize)]
#[getset(get = "pub")]
pub struct ReferenceTrack {
  points: Vec<TrackPoint>,
}

impl ReferenceTrack {
  pub fn new(points: Vec<TrackPoint>) -> Self {
    Self { points }
  }

  /// Builds the track from consecutive positions, summing up the distances
  /// between them. Steps which can't be measured (no GPS fix) count as zero,
  /// so the distance never decreases.
  pub fn from_coordinates<I>(coordinates: I) -> Self
    where I: IntoIterator<Item = Coordinate>
  {
    let mut points: Vec<TrackPoint> = Vec::new();
    for coordinate in coordinates {
      let distance = match points.last() {
        Some(last) => last.distance + step(last.coordinate, coordinate),
        None => 0.0,
      };
      points.push(TrackPoint::new(coordinate, distance));
    }
    Self { points }
  }

  /// Reads the track off a lap which already carries distances.
  pub fn from_lap(lap: &Lap, layout: &Layout) -> Self {
    Self::new(lap.samples()
                 .iter()
                 .map(|sample| {
                   TrackPoint::new(sample.coordinate(layout),
                                   sample.get(layout.distance()))
                 })
                 .collect())
  }

  /// Finds the point closest to `coordinate` among those whose distance lies
  /// less than `threshold` away from `cursor`. On equal distances the earlier
  /// point wins.
  pub fn closest(&self,
                 coordinate: Coordinate,
                 cursor: f64,
                 threshold: f64)
                 -> Option<&TrackPoint> {
    let mut closest: Option<(&TrackPoint, f64)> = None;
    for point in self.points.iter() {
      let in_window = (point.distance - cursor).abs() < threshold;
      if !in_window {
        continue;
      }

      let distance = haversine(coordinate, point.coordinate);
      let is_closer = match closest {
        Some((_, best)) => distance < best,
        None => distance < f64::MAX,
      };
      if is_closer {
        closest = Some((point, distance));
      }
    }
    closest.map(|(point, _)| point)
  }

  /// Total length of the track in metres.
  pub fn length(&self) -> f64 {
    self.points.last().map_or(0.0, |point| point.distance)
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }
}

fn step(from: Coordinate, to: Coordinate) -> f64 {
  let distance = haversine(from, to);
  if distance.is_finite() {
    distance
  } else {
    0.0
  }
}


/// Index of the fastest lap, leaving out the first and the last lap of the
/// session since those are usually out- and in-lap. On equal lap times the
/// earlier lap wins.
pub fn best_lap(laps: &[Lap]) -> Result<usize> {
  ensure!(laps.len() >= 3, Error::NoBestLap(laps.len()));

  let mut best = 1;
  for idx in 2..laps.len() - 1 {
    if laps[idx].duration() < laps[best].duration() {
      best = idx;
    }
  }
  Ok(best)
}


/// Writes the distance along its own path into every sample of the reference
/// lap and returns the resulting track.
fn measure(lap: &mut Lap, layout: &Layout) -> ReferenceTrack {
  let track =
    ReferenceTrack::from_coordinates(lap.samples()
                                        .iter()
                                        .map(|sample| sample.coordinate(layout)));
  for (sample, point) in lap.samples_mut().iter_mut().zip(track.points()) {
    sample.set(layout.distance(), point.distance());
  }
  track
}

/// Maps every sample of `lap` onto the distance axis of `track`, walking
/// forward from the start of the track.
fn align_lap(lap: &mut Lap,
             track: &ReferenceTrack,
             layout: &Layout,
             threshold: f64)
             -> Result<()> {
  let number = lap.number();
  let mut cursor = 0.0;
  for (idx, sample) in lap.samples_mut().iter_mut().enumerate() {
    let point = track.closest(sample.coordinate(layout), cursor, threshold)
                     .ok_or(Error::NoMatch { lap: number, sample: idx })?;
    cursor = point.distance();
    sample.set(layout.distance(), cursor);
  }
  Ok(())
}


/// Synthesizes the distance channel for all `laps`.
///
/// Unless `options` bring their own reference track, the fastest lap (see
/// `best_lap`) becomes the reference lap and its own path the reference
/// track. Every other lap is aligned onto that track; laps that can't be
/// aligned are logged and dropped. The laps that are left keep their order
/// and get renumbered from zero.
pub fn align(mut laps: Vec<Lap>,
             layout: &Layout,
             options: &SessionOptions)
             -> Result<Vec<Lap>> {
  let track = match options.reference() {
    Some(track) => track.clone(),
    None => {
      let best = best_lap(&laps)?;
      laps[best].set_as_reference();
      let track = measure(&mut laps[best], layout);
      info!("lap {} is the reference lap ({:.3}s, {:.1}m)",
            laps[best].number(),
            laps[best].duration(),
            track.length());
      track
    }
  };

  let threshold = options.threshold();
  let keep = |lap: &mut Lap| -> bool {
    if lap.is_reference() {
      return true;
    }
    match align_lap(lap, &track, layout, threshold) {
      Ok(()) => true,
      Err(err) => {
        warn!("dropping lap {}: {}", lap.number(), err);
        false
      }
    }
  };
  let decisions: Vec<bool> = if options.parallel() {
    laps.par_iter_mut().map(keep).collect()
  } else {
    laps.iter_mut().map(keep).collect()
  };

  Ok(laps.into_iter()
         .zip(decisions)
         .filter_map(|(lap, keep)| if keep { Some(lap) } else { None })
         .enumerate()
         .map(|(number, mut lap)| {
           lap.set_number(number);
           lap
         })
         .collect())
}
