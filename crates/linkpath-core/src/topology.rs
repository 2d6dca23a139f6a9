//! # Topology Snapshot
//!
//! The input side of the graph store: device, interface and link descriptors
//! as delivered by the topology source.
//!
//! Descriptors are deliberately loose (`Option` identifiers, defaulted
//! fields) so that one malformed entry can be skipped during ingestion
//! instead of rejecting the whole snapshot.

use crate::{Metadata, MetricValue};
use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

/// The full topology at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    #[serde(default)]
    pub devices: Vec<DeviceDescriptor>,
    #[serde(default)]
    pub links: Vec<LinkDescriptor>,
}

impl TopologySnapshot {
    #[must_use]
    pub fn new(devices: Vec<DeviceDescriptor>, links: Vec<LinkDescriptor>) -> Self {
        Self { devices, links }
    }

    /// A snapshot with neither devices nor links carries no topology at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && self.links.is_empty()
    }
}

/// A device (switch, host) and the interfaces it owns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceDescriptor>,
}

impl DeviceDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            interfaces: Vec::new(),
        }
    }

    /// Add interfaces by identifier.
    #[must_use]
    pub fn with_interfaces<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interfaces
            .extend(ids.into_iter().map(|id| InterfaceDescriptor { id: Some(id.into()) }));
        self
    }

    /// Add `count` interfaces named `<device>:1` .. `<device>:<count>`.
    #[must_use]
    pub fn with_numbered_interfaces(self, count: usize) -> Self {
        let prefix = self.id.clone().unwrap_or_default();
        self.with_interfaces((1..=count).map(|port| format!("{}:{}", prefix, port)))
    }
}

/// A port owned by a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    #[serde(default)]
    pub id: Option<String>,
}

/// A link between two endpoints, with its reported metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub endpoint_a: Option<String>,
    #[serde(default)]
    pub endpoint_b: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub metadata: Metadata,
}

impl LinkDescriptor {
    /// An active link between `a` and `b`, identified as `a<->b`.
    #[must_use]
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let a = a.into();
        let b = b.into();
        Self {
            id: Some(format!("{}<->{}", a, b)),
            endpoint_a: Some(a),
            endpoint_b: Some(b),
            active: true,
            metadata: Metadata::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_metric(mut self, name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_interfaces_follow_device_id() {
        let device = DeviceDescriptor::new("S1").with_numbered_interfaces(2);
        let ids: Vec<_> = device
            .interfaces
            .iter()
            .filter_map(|i| i.id.as_deref())
            .collect();
        assert_eq!(ids, vec!["S1:1", "S1:2"]);
    }

    #[test]
    fn link_defaults_to_active_when_field_missing() {
        let json = r#"{"endpoint_a": "a", "endpoint_b": "b"}"#;
        let link: LinkDescriptor = serde_json::from_str(json).expect("parse");
        assert!(link.active);
        assert!(link.metadata.is_empty());
        assert!(link.id.is_none());
    }

    #[test]
    fn snapshot_tolerates_missing_sections() {
        let snapshot: TopologySnapshot = serde_json::from_str("{}").expect("parse");
        assert!(snapshot.is_empty());
    }

    #[test]
    fn link_builder_sets_metrics() {
        let link = LinkDescriptor::new("a", "b")
            .with_metric("bandwidth", 100)
            .with_metric("ownership", "A");
        assert_eq!(link.id.as_deref(), Some("a<->b"));
        assert_eq!(link.metadata.len(), 2);
    }
}
