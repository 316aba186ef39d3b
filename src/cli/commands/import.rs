//! Batch import command.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::playlist::{self, BatchReport, DuplicatePolicy, PlaylistTarget};

use super::{ImportArgs, fail, print_json, read_batch};

/// Match a batch and add the hits to a new or existing playlist
pub fn cmd_import(rt: &Runtime, config: &Config, args: &ImportArgs) -> anyhow::Result<()> {
    match import(rt, config, args) {
        Ok(report) if args.json => print_json(&report),
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => fail(e, args.json),
    }
}

fn import(rt: &Runtime, config: &Config, args: &ImportArgs) -> Result<BatchReport> {
    // Settle the target before reading anything or touching the network
    let target = match (&args.playlist, &args.name) {
        (Some(locator), _) => PlaylistTarget::existing(locator)?,
        (None, Some(name)) => {
            PlaylistTarget::new_playlist(name, args.description.as_deref(), &config.playlist)?
        }
        (None, None) => {
            return Err(Error::input_format(
                "either --name or --playlist is required",
            ));
        }
    };
    let policy = if args.add_new {
        DuplicatePolicy::AddNew
    } else {
        DuplicatePolicy::AddAll
    };

    let descriptors = read_batch(&args.input.input)?;

    rt.block_on(playlist::process_batch_with_credentials(
        &config.credentials,
        &config.http,
        &descriptors,
        &target,
        policy,
    ))
}

fn print_report(report: &BatchReport) {
    println!("Playlist: {}", report.playlist_url);
    if report.skipped_duplicates > 0 {
        println!(
            "Added {} tracks ({} already in the playlist)",
            report.added_count, report.skipped_duplicates
        );
    } else {
        println!("Added {} tracks", report.added_count);
    }

    if !report.unmatched.is_empty() {
        println!();
        println!("Could not find {} tracks:", report.unmatched.len());
        for track in &report.unmatched {
            println!("  {}", track);
        }
    }
}
