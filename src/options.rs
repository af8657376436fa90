// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::align::{ReferenceTrack, DISTANCE_THRESHOLD};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};


/// Knobs for building a `Session`. Deserializes from partial documents, every
/// field left out keeps its default.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters, Deserialize,
         Serialize)]
#[serde(default)]
pub struct SessionOptions {
  /// Width of the window around the last matched distance, in metres, in
  /// which reference points are considered during alignment.
  #[getset(get_copy = "pub")]
  threshold: f64,
  /// Track to align against instead of the fastest lap of the session.
  #[getset(get = "pub")]
  reference: Option<ReferenceTrack>,
  /// Align laps on the rayon thread pool.
  #[getset(get_copy = "pub")]
  parallel:  bool,
}

impl Default for SessionOptions {
  fn default() -> Self {
    Self { threshold: DISTANCE_THRESHOLD,
           reference: None,
           parallel:  true }
  }
}

impl SessionOptions {
  pub fn with_threshold(mut self, threshold: f64) -> Self {
    self.threshold = threshold;
    self
  }

  pub fn with_reference(mut self, reference: ReferenceTrack) -> Self {
    self.reference = Some(reference);
    self
  }

  pub fn with_parallel(mut self, parallel: bool) -> Self {
    self.parallel = parallel;
    self
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::geo::Coordinate;
  use pretty_assertions::assert_eq;


  #[test]
  fn options_test() {
    let options = SessionOptions::default();
    assert_eq!(3.0, options.threshold());
    assert_eq!(&None, options.reference());
    assert_eq!(true, options.parallel());

    let track = ReferenceTrack::from_coordinates(vec![Coordinate::new(52.0,
                                                                      11.0)]);
    let options = options.with_threshold(5.0)
                         .with_parallel(false)
                         .with_reference(track.clone());
    assert_eq!(5.0, options.threshold());
    assert_eq!(false, options.parallel());
    assert_eq!(&Some(track), options.reference());
  }

  #[test]
  fn options_deserialize_test() {
    let options: SessionOptions =
      serde_json::from_str(r#"{ "threshold": 4.5 }"#).unwrap();
    assert_eq!(SessionOptions::default().with_threshold(4.5), options);

    let options: SessionOptions = serde_json::from_str(
      r#"{
        "parallel": false,
        "reference": { "points": [
          { "coordinate": { "latitude": 52.0, "longitude": 11.0 },
            "distance": 0.0 },
          { "coordinate": { "latitude": 52.0001, "longitude": 11.0 },
            "distance": 11.1 }
        ] }
      }"#,
    ).unwrap();
    assert_eq!(false, options.parallel());
    assert_eq!(2, options.reference().as_ref().unwrap().len());
  }
}
