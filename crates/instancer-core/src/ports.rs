//! Port/host presentation for live deployments
//!
//! Turns a deployment's port mappings into something a player can act on:
//! a link for web services, an `nc` command for raw TCP services.

use crate::types::{Deployment, PortValue};

/// One actionable connection entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortEntry {
    /// Web service reachable in a browser
    Link { label: String, url: String },
    /// Raw TCP service
    Command { label: String, command: String },
}

impl PortEntry {
    pub fn label(&self) -> &str {
        match self {
            PortEntry::Link { label, .. } | PortEntry::Command { label, .. } => label,
        }
    }

    /// The text a player copies: the URL or the command line
    pub fn target(&self) -> &str {
        match self {
            PortEntry::Link { url, .. } => url,
            PortEntry::Command { command, .. } => command,
        }
    }
}

/// What the connection panel shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortsView {
    /// Ports are published but the instance may not be reachable yet
    Booting,
    /// Entries in the backend's mapping order
    Ready(Vec<PortEntry>),
}

/// Present a deployment's ports.
///
/// Nothing is computed until `now > start_delay`; the backend may publish
/// mappings before the instance answers.
pub fn present_ports(deployment: &Deployment, now: i64) -> PortsView {
    if now <= deployment.start_delay {
        return PortsView::Booting;
    }

    let entries = deployment
        .port_mappings
        .iter()
        .map(|(label, value)| present_port(label, value, &deployment.host))
        .collect();

    PortsView::Ready(entries)
}

fn present_port(label: &str, value: &PortValue, host: &str) -> PortEntry {
    match value {
        PortValue::Text(text) if !is_numeric(text) => PortEntry::Link {
            label: label.to_string(),
            url: with_scheme(text),
        },
        _ => PortEntry::Command {
            label: label.to_string(),
            command: format!("nc {} {}", host, value.to_string().trim()),
        },
    }
}

fn is_numeric(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

fn with_scheme(host: &str) -> String {
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
