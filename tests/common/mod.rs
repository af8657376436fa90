// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

#![allow(dead_code)]

use std::f64::consts::PI;


/// Samples per lap of the generated circuit.
pub const SAMPLES: usize = 200;
/// Radius of the generated circuit in metres.
pub const RADIUS: f64 = 50.0;

const CENTER: (f64, f64) = (52.0, 11.0);
const METRES_PER_DEGREE: f64 = 111_194.926_644_558_7;


/// A generated export: a session on a round circuit of radius `RADIUS`, one
/// lap per entry of `steps` (the sampling interval of that lap in seconds).
/// Every lap has `SAMPLES` samples at the same positions, so lap `k` takes
/// `SAMPLES * steps[k]` seconds.
pub struct Circuit {
  pub steps:    Vec<f64>,
  /// Laps whose GPS module loses the fix half way through.
  pub dropouts: Vec<usize>,
  pub extra:    String,
}

impl Circuit {
  pub fn new(steps: &[f64]) -> Self {
    Self { steps:    steps.to_vec(),
           dropouts: Vec::new(),
           extra:    String::new() }
  }

  pub fn with_dropout(mut self, lap: usize) -> Self {
    self.dropouts.push(lap);
    self
  }

  /// Rows inserted between the samples of the first lap.
  pub fn with_extra_rows(mut self, rows: &str) -> Self {
    self.extra = rows.to_string();
    self
  }

  pub fn position(idx: usize) -> (f64, f64) {
    let angle = 2.0 * PI * idx as f64 / SAMPLES as f64;
    let north = RADIUS * angle.cos();
    let east = RADIUS * angle.sin();
    (CENTER.0 + north / METRES_PER_DEGREE,
     CENTER.1 + east / (METRES_PER_DEGREE * CENTER.0.to_radians().cos()))
  }

  pub fn boundaries(&self) -> Vec<f64> {
    let mut boundaries = Vec::new();
    let mut end = 0.0;
    for step in self.steps.iter() {
      end = round(end + SAMPLES as f64 * step);
      boundaries.push(end);
    }
    boundaries
  }

  pub fn render(&self) -> String {
    let boundaries = self.boundaries();
    let markers: Vec<String> =
      boundaries.iter().map(|b| format!("\"{:.3}\"", b)).collect();

    let mut text = format!("\"Format\",\"AiM CSV File\"\n\
                            \"Vehicle\",\"Golf GTI TCR\"\n\
                            \"Racer\",\"042\"\n\
                            \"Session\",\"Circle\"\n\
                            \"Date\",\"2021-05-29\"\n\
                            \"Time\",\"09:59:44\"\n\
                            \"Duration\",\"{:.3}\"\n\
                            \"Beacon Markers\",{}\n\
                            \n\
                            \"Time\",\"GPS Latitude\",\"GPS Longitude\",\"RPM\"\n\
                            \"s\",\"deg\",\"deg\",\"rpm\"\n\
                            \n",
                           boundaries.last().copied().unwrap_or_default(),
                           markers.join(","));

    let mut start = 0.0;
    for (lap, step) in self.steps.iter().enumerate() {
      for idx in 0..SAMPLES {
        let time = round(start + idx as f64 * step);
        let (latitude, longitude) = Self::position(idx);
        if self.dropouts.contains(&lap) && idx >= SAMPLES / 2 {
          text += &format!("\"{:.3}\",\"\",\"\",\"{}\"\n", time, 5000 + idx);
        } else {
          text += &format!("\"{:.3}\",\"{:.9}\",\"{:.9}\",\"{}\"\n",
                           time,
                           latitude,
                           longitude,
                           5000 + idx);
        }
        if lap == 0 && idx == 10 {
          text += &self.extra;
        }
      }
      start = boundaries[lap];
    }

    // the logger keeps running for a moment after the last beacon
    let (latitude, longitude) = Self::position(0);
    text += &format!("\"{:.3}\",\"{:.9}\",\"{:.9}\",\"4000\"\n",
                     start, latitude, longitude);
    text
  }
}

fn round(time: f64) -> f64 {
  (time * 1000.0).round() / 1000.0
}
