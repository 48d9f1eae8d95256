//! Display-oriented view of a [`Device`].
//!
//! Everything here is a pure function of the device payload: labels are
//! returned as [`Message`] keys and only turned into text for a locale at the
//! very end, in [`DescriptiveDevice::fields`].

use std::fmt::Display;
use std::ops::RangeInclusive;

use chrono::{DateTime, Local, TimeZone};

use crate::l10n::{Locale, Message};
use crate::models::device::Device;

/// Coarse lifecycle state of the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Armed,
    Disarmed,
    Running,
    Alarm,
    Service,
    StayHome,
    Unknown,
}

impl Lifecycle {
    pub fn message(self) -> Message {
        match self {
            Lifecycle::Armed => Message::StateArmed,
            Lifecycle::Disarmed => Message::StateDisarmed,
            Lifecycle::Running => Message::StateRunning,
            Lifecycle::Alarm => Message::StateAlarm,
            Lifecycle::Service => Message::StateService,
            Lifecycle::StayHome => Message::StateStayHome,
            Lifecycle::Unknown => Message::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perimeter {
    Closed,
    Broken,
    Unknown,
}

impl Perimeter {
    pub fn message(self) -> Message {
        match self {
            Perimeter::Closed => Message::Closed,
            Perimeter::Broken => Message::BrokenPerimeter,
            Perimeter::Unknown => Message::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPair {
    pub on_true: Message,
    pub on_false: Message,
}

pub const OPEN_CLOSED: LabelPair = LabelPair {
    on_true: Message::Open,
    on_false: Message::Closed,
};

pub const ON_OFF: LabelPair = LabelPair {
    on_true: Message::On,
    on_false: Message::Off,
};

pub const YES_NO: LabelPair = LabelPair {
    on_true: Message::Yes,
    on_false: Message::No,
};

/// Ascending, non-overlapping closed ranges over the truncated value.
pub type LevelSteps = &'static [(RangeInclusive<i32>, Message)];

pub const GSM_STEPS: LevelSteps = &[
    (0..=19, Message::Poor),
    (20..=23, Message::Normal),
    (24..=28, Message::Good),
    (29..=100, Message::Excellent),
];

pub const GPS_STEPS: LevelSteps = &[
    (0..=3, Message::Poor),
    (4..=7, Message::Normal),
    (8..=10, Message::Good),
    (11..=100, Message::Excellent),
];

pub fn describe_bool(value: Option<bool>, labels: LabelPair) -> Message {
    match value {
        Some(true) => labels.on_true,
        Some(false) => labels.on_false,
        None => Message::Unknown,
    }
}

pub fn describe_level(value: Option<f32>, steps: LevelSteps) -> Message {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return Message::Unknown;
    };
    let level = value.trunc() as i32;
    steps
        .iter()
        .find(|(range, _)| range.contains(&level))
        .map(|(_, label)| *label)
        .unwrap_or(Message::Unknown)
}

pub fn with_unit<T: Display>(value: Option<T>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, suffix),
        None => format!("--{}", suffix),
    }
}

pub fn describe_timestamp<Tz>(ts: Option<i64>, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let utc = DateTime::from_timestamp(ts?, 0)?;
    Some(
        utc.with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    )
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptiveDevice {
    pub alias: Option<String>,
    pub doors_open: Option<bool>,
    pub parking_brake_engaged: Option<bool>,
    pub hood_open: Option<bool>,
    pub trunk_open: Option<bool>,
    pub ignition_powered: Option<bool>,
    pub is_armed: Option<bool>,
    pub alarm_triggered: Option<bool>,
    pub valet_mode_on: Option<bool>,
    pub stay_home_mode_on: Option<bool>,
    pub gsm_level: Option<f32>,
    pub gps_level: Option<f32>,
    pub remaining_distance: Option<i64>,
    pub battery_voltage: Option<f32>,
    pub temperature: Option<f32>,
    pub activity_ts: Option<i64>,
}

impl DescriptiveDevice {
    /// First match wins: alarm, valet, ignition, stay-home, then the arm flag.
    pub fn state(&self) -> Lifecycle {
        if self.alarm_triggered.unwrap_or(false) {
            return Lifecycle::Alarm;
        }
        if self.valet_mode_on.unwrap_or(false) {
            return Lifecycle::Service;
        }
        if self.ignition_powered.unwrap_or(false) {
            return Lifecycle::Running;
        }
        if self.stay_home_mode_on.unwrap_or(false) {
            return Lifecycle::StayHome;
        }
        match self.is_armed {
            Some(true) => Lifecycle::Armed,
            Some(false) => Lifecycle::Disarmed,
            None => Lifecycle::Unknown,
        }
    }

    pub fn perimeter(&self) -> Perimeter {
        match (self.doors_open, self.trunk_open, self.hood_open) {
            (Some(false), Some(false), Some(false)) => Perimeter::Closed,
            (Some(_), Some(_), Some(_)) => Perimeter::Broken,
            _ => Perimeter::Unknown,
        }
    }

    /// Labelled lines of the status block, in display order.
    pub fn fields(&self, locale: Locale) -> Vec<(Message, String)> {
        let text = |m: Message| m.text(locale).to_string();
        let last_activity = describe_timestamp(self.activity_ts, &Local)
            .unwrap_or_else(|| text(Message::Unknown));

        vec![
            (
                Message::AliasField,
                self.alias.clone().unwrap_or_else(|| text(Message::Unknown)),
            ),
            (Message::StateField, text(self.state().message())),
            (Message::PerimeterField, text(self.perimeter().message())),
            (
                Message::DoorsField,
                text(describe_bool(self.doors_open, OPEN_CLOSED)),
            ),
            (
                Message::HoodField,
                text(describe_bool(self.hood_open, OPEN_CLOSED)),
            ),
            (
                Message::TrunkField,
                text(describe_bool(self.trunk_open, OPEN_CLOSED)),
            ),
            (
                Message::ParkingBrakeField,
                text(describe_bool(self.parking_brake_engaged, ON_OFF)),
            ),
            (
                Message::IgnitionField,
                text(describe_bool(self.ignition_powered, ON_OFF)),
            ),
            (Message::ArmField, text(describe_bool(self.is_armed, ON_OFF))),
            (
                Message::AlarmField,
                text(describe_bool(self.alarm_triggered, YES_NO)),
            ),
            (
                Message::ValetField,
                text(describe_bool(self.valet_mode_on, ON_OFF)),
            ),
            (
                Message::StayHomeField,
                text(describe_bool(self.stay_home_mode_on, ON_OFF)),
            ),
            (
                Message::GsmField,
                text(describe_level(self.gsm_level, GSM_STEPS)),
            ),
            (
                Message::GpsField,
                text(describe_level(self.gps_level, GPS_STEPS)),
            ),
            (
                Message::BatteryField,
                with_unit(self.battery_voltage, Message::VoltSuffix.text(locale)),
            ),
            (
                Message::TemperatureField,
                with_unit(self.temperature, Message::CelsiusSuffix.text(locale)),
            ),
            (
                Message::DistanceField,
                with_unit(self.remaining_distance, Message::KilometerSuffix.text(locale)),
            ),
            (Message::LastActivityField, last_activity),
        ]
    }
}

impl From<&Device> for DescriptiveDevice {
    fn from(device: &Device) -> Self {
        let state = device.state.clone().unwrap_or_default();
        let common = device.common.clone().unwrap_or_default();
        Self {
            alias: device.alias.clone(),
            doors_open: state.door,
            parking_brake_engaged: state.parking_brake,
            hood_open: state.hood,
            trunk_open: state.trunk,
            ignition_powered: state.ignition,
            is_armed: state.arm,
            alarm_triggered: state.alarm,
            valet_mode_on: state.valet,
            stay_home_mode_on: state.stay_home,
            gsm_level: common.gsm_level,
            gps_level: common.gps_level,
            remaining_distance: device.obd.as_ref().and_then(|o| o.remaining_distance),
            battery_voltage: common.battery_voltage,
            temperature: common.module_temperature,
            activity_ts: device.activity_ts,
        }
    }
}

impl Device {
    pub fn descriptive(&self) -> DescriptiveDevice {
        DescriptiveDevice::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::device::{CommonMetrics, DeviceState, ObdMetrics};

    fn with_perimeter(door: Option<bool>, trunk: Option<bool>, hood: Option<bool>) -> DescriptiveDevice {
        DescriptiveDevice {
            doors_open: door,
            trunk_open: trunk,
            hood_open: hood,
            ..Default::default()
        }
    }

    #[test]
    fn test_perimeter_closed_only_when_all_closed() {
        assert_eq!(
            with_perimeter(Some(false), Some(false), Some(false)).perimeter(),
            Perimeter::Closed
        );
        assert_eq!(
            with_perimeter(Some(true), Some(false), Some(false)).perimeter(),
            Perimeter::Broken
        );
        assert_eq!(
            with_perimeter(Some(false), Some(true), Some(false)).perimeter(),
            Perimeter::Broken
        );
        assert_eq!(
            with_perimeter(Some(false), Some(false), Some(true)).perimeter(),
            Perimeter::Broken
        );
    }

    #[test]
    fn test_perimeter_unknown_when_any_flag_missing() {
        assert_eq!(
            with_perimeter(None, Some(false), Some(false)).perimeter(),
            Perimeter::Unknown
        );
        assert_eq!(
            with_perimeter(Some(false), None, Some(false)).perimeter(),
            Perimeter::Unknown
        );
        assert_eq!(
            with_perimeter(Some(true), Some(true), None).perimeter(),
            Perimeter::Unknown
        );
    }

    #[test]
    fn test_lifecycle_precedence() {
        let alarm_and_running = DescriptiveDevice {
            alarm_triggered: Some(true),
            ignition_powered: Some(true),
            is_armed: Some(true),
            ..Default::default()
        };
        assert_eq!(alarm_and_running.state(), Lifecycle::Alarm);

        let valet_and_running = DescriptiveDevice {
            valet_mode_on: Some(true),
            ignition_powered: Some(true),
            ..Default::default()
        };
        assert_eq!(valet_and_running.state(), Lifecycle::Service);

        let running_at_home = DescriptiveDevice {
            ignition_powered: Some(true),
            stay_home_mode_on: Some(true),
            ..Default::default()
        };
        assert_eq!(running_at_home.state(), Lifecycle::Running);

        let home_and_armed = DescriptiveDevice {
            stay_home_mode_on: Some(true),
            is_armed: Some(true),
            ..Default::default()
        };
        assert_eq!(home_and_armed.state(), Lifecycle::StayHome);
    }

    #[test]
    fn test_lifecycle_arm_flag_and_unknown() {
        let quiet = DescriptiveDevice {
            alarm_triggered: Some(false),
            valet_mode_on: Some(false),
            ignition_powered: Some(false),
            stay_home_mode_on: Some(false),
            ..Default::default()
        };
        assert_eq!(quiet.state(), Lifecycle::Unknown);

        let armed = DescriptiveDevice {
            is_armed: Some(true),
            ..quiet.clone()
        };
        assert_eq!(armed.state(), Lifecycle::Armed);

        let disarmed = DescriptiveDevice {
            is_armed: Some(false),
            ..quiet
        };
        assert_eq!(disarmed.state(), Lifecycle::Disarmed);
    }

    #[test]
    fn test_describe_bool_for_every_label_pair() {
        for pair in [OPEN_CLOSED, ON_OFF, YES_NO] {
            assert_eq!(describe_bool(Some(true), pair), pair.on_true);
            assert_eq!(describe_bool(Some(false), pair), pair.on_false);
            assert_eq!(describe_bool(None, pair), Message::Unknown);
        }
    }

    #[test]
    fn test_gsm_level_boundaries() {
        assert_eq!(describe_level(Some(0.0), GSM_STEPS), Message::Poor);
        assert_eq!(describe_level(Some(19.0), GSM_STEPS), Message::Poor);
        assert_eq!(describe_level(Some(19.9), GSM_STEPS), Message::Poor);
        assert_eq!(describe_level(Some(20.0), GSM_STEPS), Message::Normal);
        assert_eq!(describe_level(Some(23.0), GSM_STEPS), Message::Normal);
        assert_eq!(describe_level(Some(24.0), GSM_STEPS), Message::Good);
        assert_eq!(describe_level(Some(27.0), GSM_STEPS), Message::Good);
        assert_eq!(describe_level(Some(28.0), GSM_STEPS), Message::Good);
        assert_eq!(describe_level(Some(28.9), GSM_STEPS), Message::Good);
        assert_eq!(describe_level(Some(29.0), GSM_STEPS), Message::Excellent);
        assert_eq!(describe_level(Some(100.0), GSM_STEPS), Message::Excellent);
    }

    #[test]
    fn test_gps_level_boundaries() {
        assert_eq!(describe_level(Some(3.0), GPS_STEPS), Message::Poor);
        assert_eq!(describe_level(Some(4.0), GPS_STEPS), Message::Normal);
        assert_eq!(describe_level(Some(8.0), GPS_STEPS), Message::Good);
        assert_eq!(describe_level(Some(10.0), GPS_STEPS), Message::Good);
        assert_eq!(describe_level(Some(11.0), GPS_STEPS), Message::Excellent);
    }

    #[test]
    fn test_level_fallback() {
        assert_eq!(describe_level(None, GSM_STEPS), Message::Unknown);
        assert_eq!(describe_level(Some(101.0), GSM_STEPS), Message::Unknown);
        assert_eq!(describe_level(Some(-1.0), GSM_STEPS), Message::Unknown);
        assert_eq!(describe_level(Some(f32::NAN), GSM_STEPS), Message::Unknown);
    }

    #[test]
    fn test_level_steps_do_not_overlap() {
        for steps in [GSM_STEPS, GPS_STEPS] {
            for pair in steps.windows(2) {
                assert!(pair[0].0.end() < pair[1].0.start());
            }
        }
    }

    #[test]
    fn test_with_unit() {
        assert_eq!(with_unit(Some(12.5f32), " v."), "12.5 v.");
        assert_eq!(with_unit(Some(420i64), " km"), "420 km");
        assert_eq!(with_unit(None::<f32>, " v."), "-- v.");
    }

    #[test]
    fn test_describe_timestamp() {
        assert_eq!(
            describe_timestamp(Some(0), &chrono::Utc).as_deref(),
            Some("1970-01-01 00:00:00")
        );
        assert_eq!(describe_timestamp(None, &chrono::Utc), None);
    }

    #[test]
    fn test_from_device() {
        let device = Device {
            id: 7,
            alias: Some("Vesta".into()),
            state: Some(DeviceState {
                door: Some(false),
                hood: Some(false),
                trunk: Some(false),
                arm: Some(true),
                ..Default::default()
            }),
            common: Some(CommonMetrics {
                gsm_level: Some(24.0),
                battery_voltage: Some(12.5),
                ..Default::default()
            }),
            obd: Some(ObdMetrics {
                remaining_distance: Some(300),
            }),
            activity_ts: None,
        };
        let descriptive = device.descriptive();
        assert_eq!(descriptive.state(), Lifecycle::Armed);
        assert_eq!(descriptive.perimeter(), Perimeter::Closed);
        assert_eq!(descriptive.remaining_distance, Some(300));

        let fields = descriptive.fields(Locale::En);
        let value = |m: Message| {
            fields
                .iter()
                .find(|(field, _)| *field == m)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(value(Message::AliasField), "Vesta");
        assert_eq!(value(Message::StateField), "armed");
        assert_eq!(value(Message::PerimeterField), "closed");
        assert_eq!(value(Message::GsmField), "good");
        assert_eq!(value(Message::GpsField), "unknown");
        assert_eq!(value(Message::BatteryField), "12.5 v.");
        assert_eq!(value(Message::TemperatureField), "-- °C");
        assert_eq!(value(Message::DistanceField), "300 km");
        assert_eq!(value(Message::LastActivityField), "unknown");
    }

    #[test]
    fn test_fields_in_russian() {
        let descriptive = DescriptiveDevice {
            doors_open: Some(true),
            ..Default::default()
        };
        let fields = descriptive.fields(Locale::Ru);
        assert!(fields.contains(&(Message::DoorsField, "открыто".to_string())));
        assert!(fields.contains(&(Message::BatteryField, "-- в.".to_string())));
    }
}
