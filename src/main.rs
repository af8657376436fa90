// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use aimcsv::{Session, SessionOptions};
use clap::Parser;
use eyre::{Result, WrapErr};
use std::{fs, path::PathBuf};


#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
  /// AiM CSV export to read
  file:      PathBuf,
  /// Print the whole session as JSON instead of a summary
  #[arg(short, long)]
  json:      bool,
  /// Alignment window in metres
  #[arg(short, long)]
  threshold: Option<f64>,
  /// JSON file with session options
  #[arg(short, long)]
  config:    Option<PathBuf>,
}


fn options(args: &Args) -> Result<SessionOptions> {
  let mut options = match &args.config {
    Some(path) => {
      let text = fs::read_to_string(path).wrap_err_with(|| {
                                           format!("unable to read config ({})",
                                                   path.display())
                                         })?;
      serde_json::from_str(&text).wrap_err_with(|| {
                                   format!("invalid config ({})",
                                           path.display())
                                 })?
    }
    None => SessionOptions::default(),
  };
  if let Some(threshold) = args.threshold {
    options = options.with_threshold(threshold);
  }
  Ok(options)
}

fn print_summary(session: &Session) {
  let headers = session.headers();
  let or_na = |value: &Option<String>| {
    value.clone().unwrap_or_else(|| "N/A".to_string())
  };
  println!("vehicle:  {}", or_na(headers.vehicle()));
  println!("racer:    {}", or_na(headers.racer()));
  println!("track:    {}", or_na(headers.track()));
  match headers.datetime() {
    Some(datetime) => println!("recorded: {}", datetime),
    None => println!("recorded: {} {}",
                     or_na(headers.date()),
                     or_na(headers.time())),
  }
  println!("channels: {}", session.channel_names().join(", "));
  println!();

  for lap in session.laps() {
    println!("{:>3}  {:>10.3}s  {:>6} samples{}",
             lap.number(),
             lap.duration(),
             lap.len(),
             if lap.is_reference() { "  (reference)" } else { "" });
  }
}


fn main() -> Result<()> {
  color_eyre::install()?;
  colog::init();

  let args = Args::parse();
  let options = options(&args)?;

  let text = fs::read_to_string(&args.file).wrap_err_with(|| {
                                              format!("unable to read file ({})",
                                                      args.file.display())
                                            })?;
  let session = Session::parse_with(&text, &options).wrap_err_with(|| {
                  format!("unable to read session ({})", args.file.display())
                })?;

  if args.json {
    println!("{}", serde_json::to_string_pretty(&session)?);
  } else {
    print_summary(&session);
  }
  Ok(())
}
