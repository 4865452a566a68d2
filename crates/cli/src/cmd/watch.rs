//! Implementation of the `pagekit watch` command.
//!
//! Blocks until something changes in any of the given directories, then
//! prints the event and exits. Meant to be looped from a shell script.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use pagekit_lib::watch::{DirectoryWatch, WatchTarget};

use crate::output::{print_detail, print_event};

pub fn cmd_watch(dirs: &[String]) -> Result<()> {
  let targets: Vec<WatchTarget> = dirs.iter().map(|d| WatchTarget::parse(d)).collect();

  debug!(?targets, "parsed watch targets");

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let started = Instant::now();
  let event = rt.block_on(async {
    let watch = DirectoryWatch::register(&targets).context("Failed to start watching")?;
    for path in watch.paths() {
      print_detail("watching", &path.display());
    }
    watch.wait().await.context("Failed while waiting for a change")
  })?;

  print_event(&event, started.elapsed());

  Ok(())
}
