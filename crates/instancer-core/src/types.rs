//! Core domain type definitions

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Application lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    /// Event loop is running
    #[default]
    Running,
    /// Quit requested, the event loop exits on its next iteration
    Quitting,
}

/// Current wall-clock time in epoch seconds
pub fn now_epoch() -> i64 {
    chrono::Utc::now().timestamp()
}

// ─────────────────────────────────────────────────────────────────────────────
// Challenge metadata
// ─────────────────────────────────────────────────────────────────────────────

/// A tag attached to a challenge.
///
/// Categories and free-form tags share one collection and are told apart by
/// `is_category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub is_category: bool,
}

impl Tag {
    pub fn category(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_category: true,
        }
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_category: false,
        }
    }
}

/// Challenge metadata, read-only from the client's perspective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    /// Deployment is pooled across participants; per-viewer extend and
    /// terminate are unavailable.
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl ChallengeInfo {
    /// Names of the tags flagged as categories, in server order
    pub fn categories(&self) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|t| t.is_category)
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Names of the free-form (non-category) tags, in server order
    pub fn tags(&self) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|t| !t.is_category)
            .map(|t| t.name.as_str())
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Deployments
// ─────────────────────────────────────────────────────────────────────────────

/// Value side of a port mapping: a raw port number or a host string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u64),
    Text(String),
}

/// Whole-valued floats (`8080.0`) are taken as port numbers
impl<'de> Deserialize<'de> for PortValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Int(u64),
            Float(f64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Int(n) => Ok(PortValue::Number(n)),
            Wire::Float(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                Ok(PortValue::Number(f as u64))
            }
            Wire::Float(f) => Err(serde::de::Error::custom(format!("invalid port {}", f))),
            Wire::Text(s) => Ok(PortValue::Text(s)),
        }
    }
}

impl std::fmt::Display for PortValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortValue::Number(n) => write!(f, "{}", n),
            PortValue::Text(s) => f.write_str(s),
        }
    }
}

/// A live backend-provisioned instance of a challenge.
///
/// `port_mappings` keeps the backend's key order; display order must not be
/// re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Epoch seconds at which the backend tears the instance down
    #[serde(deserialize_with = "deserialize_epoch")]
    pub expiration: i64,
    #[serde(default)]
    pub host: String,
    /// Epoch seconds before which the ports are not expected to be reachable
    #[serde(default, deserialize_with = "deserialize_optional_epoch")]
    pub start_delay: i64,
    #[serde(default)]
    pub port_mappings: IndexMap<String, PortValue>,
}

impl Deployment {
    /// Whether this deployment counts as live at `now`
    pub fn is_live(&self, now: i64) -> bool {
        self.expiration > now && !self.port_mappings.is_empty()
    }
}

/// `deployed(d) := d is present ∧ d.expiration > now ∧ d.portMappings is non-empty`
///
/// Always recompute from the latest deployment; never store the result.
pub fn is_deployed(deployment: Option<&Deployment>, now: i64) -> bool {
    deployment.is_some_and(|d| d.is_live(now))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Epoch {
    Int(i64),
    Float(f64),
}

impl Epoch {
    fn seconds(self) -> i64 {
        match self {
            Epoch::Int(i) => i,
            Epoch::Float(f) => f.floor() as i64,
        }
    }
}

/// Accepts integer or fractional epoch seconds
fn deserialize_epoch<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Epoch::deserialize(deserializer)?.seconds())
}

/// Like `deserialize_epoch`, with `null` read as 0 (no start delay)
fn deserialize_optional_epoch<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Epoch>::deserialize(deserializer)?.map_or(0, Epoch::seconds))
}

/// Catalog entry: challenge metadata plus the viewer's current deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSummary {
    pub challenge_info: ChallengeInfo,
    #[serde(default)]
    pub deployment: Option<Deployment>,
}

impl ChallengeSummary {
    pub fn is_deployed(&self, now: i64) -> bool {
        is_deployed(self.deployment.as_ref(), now)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

/// Team profile as returned by `GET /api/accounts/profile`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub login_url: String,
}

/// Fields to change on `PATCH /api/accounts/profile`; `None` leaves a field as is
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployment(expiration: i64, ports: &[(&str, PortValue)]) -> Deployment {
        Deployment {
            expiration,
            host: "1.2.3.4".to_string(),
            start_delay: 0,
            port_mappings: ports
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_port_value_accepts_whole_floats() {
        let ports: IndexMap<String, PortValue> =
            serde_json::from_str(r#"{"a":8080.0,"b":31337,"c":"x.example"}"#).unwrap();
        assert_eq!(ports["a"], PortValue::Number(8080));
        assert_eq!(ports["b"], PortValue::Number(31337));
        assert_eq!(ports["c"], PortValue::Text("x.example".to_string()));

        assert!(serde_json::from_str::<PortValue>("80.5").is_err());
        assert!(serde_json::from_str::<PortValue>("-1").is_err());
    }

    #[test]
    fn test_null_start_delay_reads_as_zero() {
        let d: Deployment = serde_json::from_str(
            r#"{"expiration":10,"host":"h","start_delay":null,"port_mappings":{"p":1}}"#,
        )
        .unwrap();
        assert_eq!(d.start_delay, 0);
        assert!(serde_json::from_str::<Deployment>(r#"{"expiration":null}"#).is_err());
    }

    #[test]
    fn test_is_deployed_requires_presence() {
        assert!(!is_deployed(None, 100));
    }

    #[test]
    fn test_is_deployed_requires_future_expiration() {
        let d = deployment(100, &[("tcp", PortValue::Number(31337))]);
        assert!(is_deployed(Some(&d), 99));
        assert!(!is_deployed(Some(&d), 100));
        assert!(!is_deployed(Some(&d), 101));
    }

    #[test]
    fn test_is_deployed_requires_port_mappings() {
        let d = deployment(1_000, &[]);
        assert!(!is_deployed(Some(&d), 10));
    }

    #[test]
    fn test_deployment_preserves_port_order() {
        let json = r#"{
            "expiration": 1700000600,
            "host": "10.0.0.1",
            "start_delay": 1700000000,
            "port_mappings": {"web:80": "https://z.example", "admin:22": 2222, "api:8080": "a.example"}
        }"#;
        let d: Deployment = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = d.port_mappings.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["web:80", "admin:22", "api:8080"]);
        assert_eq!(d.port_mappings["admin:22"], PortValue::Number(2222));
    }

    #[test]
    fn test_deployment_accepts_fractional_epochs() {
        let json = r#"{"expiration": 1700000600.75, "host": "h", "start_delay": 1.5, "port_mappings": {}}"#;
        let d: Deployment = serde_json::from_str(json).unwrap();
        assert_eq!(d.expiration, 1_700_000_600);
        assert_eq!(d.start_delay, 1);
    }

    #[test]
    fn test_challenge_info_partitions_tags() {
        let info = ChallengeInfo {
            id: "baby-sqli".into(),
            name: "Baby SQLi".into(),
            author: "bliutech".into(),
            description: String::new(),
            is_shared: false,
            tags: vec![Tag::category("web"), Tag::tag("beginner"), Tag::tag("demo")],
        };
        assert_eq!(info.categories(), vec!["web"]);
        assert_eq!(info.tags(), vec!["beginner", "demo"]);
    }

    #[test]
    fn test_challenge_info_defaults_optional_fields() {
        let json = r#"{"id": "x", "name": "X"}"#;
        let info: ChallengeInfo = serde_json::from_str(json).unwrap();
        assert!(!info.is_shared);
        assert!(info.tags.is_empty());
    }

    #[test]
    fn test_profile_update_serializes_only_present_fields() {
        let update = ProfileUpdate {
            username: Some("team".into()),
            email: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"username": "team"}));
        assert!(ProfileUpdate::default().is_empty());
    }
}
