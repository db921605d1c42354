use serde::{Deserialize, Serialize};

/// A launch vehicle in the catalog, either fetched from the remote API or
/// created locally.
///
/// Remote payloads carry many more fields than this; anything not listed
/// here is dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Rocket {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub cost_per_launch: f64,
    #[serde(default)]
    pub active: bool,
    /// Set only on records created through the store's `add` action.
    #[serde(rename = "isLocal", default)]
    pub is_local: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_flight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikipedia: Option<String>,
}

impl Rocket {
    /// Create a record with the required fields and no descriptive extras.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
        cost_per_launch: f64,
        active: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            country: country.into(),
            cost_per_launch,
            active,
            is_local: false,
            company: None,
            description: None,
            first_flight: None,
            success_rate_pct: None,
            wikipedia: None,
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.active {
            "Active"
        } else {
            "Retired"
        }
    }

    pub fn source_label(&self) -> &'static str {
        if self.is_local {
            "local"
        } else {
            "remote"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_rocket_ignores_unknown_fields() {
        let json = r#"{
            "height": {"meters": 70, "feet": 229.6},
            "flickr_images": ["https://example.com/a.jpg"],
            "name": "Falcon 9",
            "type": "rocket",
            "active": true,
            "stages": 2,
            "cost_per_launch": 50000000,
            "success_rate_pct": 98,
            "first_flight": "2010-06-04",
            "country": "United States",
            "company": "SpaceX",
            "wikipedia": "https://en.wikipedia.org/wiki/Falcon_9",
            "description": "Two-stage rocket.",
            "id": "5e9d0d95eda69973a809d1ec"
        }"#;

        let rocket: Rocket = serde_json::from_str(json).unwrap();
        assert_eq!(rocket.id, "5e9d0d95eda69973a809d1ec");
        assert_eq!(rocket.name, "Falcon 9");
        assert_eq!(rocket.country, "United States");
        assert_eq!(rocket.cost_per_launch, 50_000_000.0);
        assert!(rocket.active);
        assert!(!rocket.is_local);
        assert_eq!(rocket.company.as_deref(), Some("SpaceX"));
        assert_eq!(rocket.success_rate_pct, Some(98.0));
    }

    #[test]
    fn test_is_local_serialized_as_camel_case() {
        let mut rocket = Rocket::new("a", "Falcon", "US", 100.0, true);
        rocket.is_local = true;

        let value = serde_json::to_value(&rocket).unwrap();
        assert_eq!(value["isLocal"], serde_json::Value::Bool(true));
        assert!(value.get("is_local").is_none());
        // Unset extras are left out so local records stay compact
        assert!(value.get("description").is_none());

        let back: Rocket = serde_json::from_value(value).unwrap();
        assert_eq!(back, rocket);
    }

    #[test]
    fn test_labels() {
        let mut rocket = Rocket::new("a", "Falcon 1", "US", 6_700_000.0, false);
        assert_eq!(rocket.status_label(), "Retired");
        assert_eq!(rocket.source_label(), "remote");
        rocket.is_local = true;
        rocket.active = true;
        assert_eq!(rocket.status_label(), "Active");
        assert_eq!(rocket.source_label(), "local");
    }
}
