use serde::{Deserialize, Deserializer};

/// A car alarm unit as reported by the vendor API.
///
/// Only the fields the shell renders are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Device {
    #[serde(rename = "device_id", deserialize_with = "de_device_id")]
    pub id: u64,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub state: Option<DeviceState>,
    #[serde(default)]
    pub common: Option<CommonMetrics>,
    #[serde(default)]
    pub obd: Option<ObdMetrics>,
    /// Unix timestamp of the unit's last contact with the server.
    #[serde(default)]
    pub activity_ts: Option<i64>,
}

impl Device {
    pub fn alias_or_id(&self) -> String {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias.to_string(),
            _ => self.id.to_string(),
        }
    }
}

/// Raw flags; `None` means the unit did not report the flag.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeviceState {
    #[serde(default, deserialize_with = "de_flag")]
    pub door: Option<bool>,
    #[serde(default, rename = "hbrake", deserialize_with = "de_flag")]
    pub parking_brake: Option<bool>,
    #[serde(default, deserialize_with = "de_flag")]
    pub hood: Option<bool>,
    #[serde(default, deserialize_with = "de_flag")]
    pub trunk: Option<bool>,
    #[serde(default, rename = "ign", deserialize_with = "de_flag")]
    pub ignition: Option<bool>,
    #[serde(default, deserialize_with = "de_flag")]
    pub arm: Option<bool>,
    #[serde(default, deserialize_with = "de_flag")]
    pub alarm: Option<bool>,
    #[serde(default, deserialize_with = "de_flag")]
    pub valet: Option<bool>,
    #[serde(default, rename = "stay_home", deserialize_with = "de_flag")]
    pub stay_home: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommonMetrics {
    #[serde(default, rename = "gsm_lvl")]
    pub gsm_level: Option<f32>,
    #[serde(default, rename = "gps_lvl")]
    pub gps_level: Option<f32>,
    #[serde(default, rename = "battery")]
    pub battery_voltage: Option<f32>,
    #[serde(default, rename = "ctemp")]
    pub module_temperature: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ObdMetrics {
    #[serde(default)]
    pub remaining_distance: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

fn de_device_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid device id '{}'", s))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
}

/// Flags arrive either as booleans or as 0/1 integers.
fn de_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawFlag>::deserialize(deserializer)?.map(|raw| match raw {
        RawFlag::Bool(b) => b,
        RawFlag::Int(i) => i != 0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_payload() {
        let device: Device = serde_json::from_value(json!({
            "device_id": 864326067148561u64,
            "alias": "Octavia",
            "activity_ts": 1694352000,
            "state": {
                "door": false, "hbrake": 1, "hood": false, "trunk": 0,
                "ign": false, "arm": true, "alarm": false, "valet": 0, "stay_home": false
            },
            "common": {"gsm_lvl": 25, "gps_lvl": 9.5, "battery": 12.5, "ctemp": 18},
            "obd": {"remaining_distance": 420}
        }))
        .unwrap();

        assert_eq!(device.id, 864326067148561);
        assert_eq!(device.alias.as_deref(), Some("Octavia"));
        let state = device.state.unwrap();
        assert_eq!(state.parking_brake, Some(true));
        assert_eq!(state.trunk, Some(false));
        assert_eq!(state.arm, Some(true));
        let common = device.common.unwrap();
        assert_eq!(common.gsm_level, Some(25.0));
        assert_eq!(common.battery_voltage, Some(12.5));
        assert_eq!(device.obd.unwrap().remaining_distance, Some(420));
    }

    #[test]
    fn test_decode_string_id_and_missing_sections() {
        let device: Device =
            serde_json::from_value(json!({"device_id": "1234", "alias": null})).unwrap();
        assert_eq!(device.id, 1234);
        assert!(device.alias.is_none());
        assert!(device.state.is_none());
        assert!(device.common.is_none());
        assert!(device.obd.is_none());
    }

    #[test]
    fn test_missing_flags_stay_unknown() {
        let state: DeviceState = serde_json::from_value(json!({"door": true})).unwrap();
        assert_eq!(state.door, Some(true));
        assert_eq!(state.hood, None);
        assert_eq!(state.alarm, None);
    }

    #[test]
    fn test_invalid_id_rejected() {
        let result: Result<Device, _> = serde_json::from_value(json!({"device_id": "car"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_alias_or_id() {
        let mut device = Device {
            id: 42,
            ..Default::default()
        };
        assert_eq!(device.alias_or_id(), "42");
        device.alias = Some("Niva".into());
        assert_eq!(device.alias_or_id(), "Niva");
    }
}
