//! Discovery of unmanaged resources on a host.
//!
//! Discovery lists what podman knows about and filters the names
//! against a caller-supplied pattern. It never mutates anything; the
//! results feed adoption or cleanup decisions upstream.

use capstan_command::{container, image, network, pod};
use capstan_core::Result;
use regex::Regex;
use tracing::debug;

use crate::channel::Channel;
use crate::handler::run_checked;
use crate::live::{
    self, ContainerListEntry, ImageListEntry, NetworkListEntry, PodListEntry,
};

/// Lists container names matching the pattern, including stopped ones.
pub async fn containers(channel: &mut dyn Channel, pattern: &Regex) -> Result<Vec<String>> {
    let output = run_checked(channel, &container::ps()).await?;
    let entries: Vec<ContainerListEntry> = live::parse_listing(&output.stdout)?;
    let names: Vec<String> = entries
        .into_iter()
        .flat_map(|entry| entry.names)
        .filter(|name| pattern.is_match(name))
        .collect();
    debug!(host = %channel.host(), count = names.len(), "Discovered containers");
    Ok(names)
}

/// Lists pod names matching the pattern.
pub async fn pods(channel: &mut dyn Channel, pattern: &Regex) -> Result<Vec<String>> {
    let output = run_checked(channel, &pod::ps()).await?;
    let entries: Vec<PodListEntry> = live::parse_listing(&output.stdout)?;
    let names: Vec<String> = entries
        .into_iter()
        .map(|entry| entry.name)
        .filter(|name| pattern.is_match(name))
        .collect();
    debug!(host = %channel.host(), count = names.len(), "Discovered pods");
    Ok(names)
}

/// Lists network names matching the pattern.
pub async fn networks(channel: &mut dyn Channel, pattern: &Regex) -> Result<Vec<String>> {
    let output = run_checked(channel, &network::ls()).await?;
    let entries: Vec<NetworkListEntry> = live::parse_listing(&output.stdout)?;
    let names: Vec<String> = entries
        .into_iter()
        .map(|entry| entry.name)
        .filter(|name| pattern.is_match(name))
        .collect();
    debug!(host = %channel.host(), count = names.len(), "Discovered networks");
    Ok(names)
}

/// Lists image references matching the pattern. Dangling images carry
/// no reference and are never reported.
pub async fn images(channel: &mut dyn Channel, pattern: &Regex) -> Result<Vec<String>> {
    let output = run_checked(channel, &image::ls()).await?;
    let entries: Vec<ImageListEntry> = live::parse_listing(&output.stdout)?;
    let names: Vec<String> = entries
        .into_iter()
        .flat_map(|entry| entry.names)
        .filter(|name| pattern.is_match(name))
        .collect();
    debug!(host = %channel.host(), count = names.len(), "Discovered images");
    Ok(names)
}
