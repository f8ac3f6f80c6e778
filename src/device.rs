use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

// The device model returned by the Platform API device listing, as
// described at <https://developer.govee.com/reference/get-you-devices>

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Device {
    pub sku: String,
    /// The MAC-style address; this is what control requests target
    pub device: String,
    #[serde(default, rename = "deviceName")]
    pub device_name: String,
    #[serde(default, rename = "type")]
    pub device_type: DeviceType,
    pub capabilities: Vec<DeviceCapability>,
}

impl Device {
    pub fn capability_by_instance(&self, instance: &str) -> Option<&DeviceCapability> {
        self.capabilities.iter().find(|c| c.instance == instance)
    }

    pub fn supports_rgb(&self) -> bool {
        self.capability_by_instance("colorRgb").is_some()
    }

    pub fn supports_brightness(&self) -> bool {
        self.capability_by_instance("brightness").is_some()
    }

    /// The kelvin range advertised by the device. Informational only;
    /// commands are validated against fixed ranges.
    pub fn color_temperature_range(&self) -> Option<(i64, i64)> {
        let cap = self.capability_by_instance("colorTemperatureK")?;

        match cap.parameters {
            Some(DeviceParameters::Integer {
                range: IntegerRange { min, max, .. },
                ..
            }) => Some((min, max)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.device_name.is_empty() {
            write!(fmt, "{} ({})", self.device, self.sku)
        } else {
            write!(fmt, "{} ({} {})", self.device_name, self.device, self.sku)
        }
    }
}

/// Device category. Categories we don't know about are kept verbatim
/// so that they can still be displayed.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    #[default]
    Light,
    AirPurifier,
    Thermometer,
    Socket,
    Sensor,
    Heater,
    Humidifier,
    Dehumidifier,
    IceMaker,
    AromaDiffuser,
    Other(String),
}

impl DeviceType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Light => "devices.types.light",
            Self::AirPurifier => "devices.types.air_purifier",
            Self::Thermometer => "devices.types.thermometer",
            Self::Socket => "devices.types.socket",
            Self::Sensor => "devices.types.sensor",
            Self::Heater => "devices.types.heater",
            Self::Humidifier => "devices.types.humidifier",
            Self::Dehumidifier => "devices.types.dehumidifier",
            Self::IceMaker => "devices.types.ice_maker",
            Self::AromaDiffuser => "devices.types.aroma_diffuser",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for DeviceType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "devices.types.light" => Self::Light,
            "devices.types.air_purifier" => Self::AirPurifier,
            "devices.types.thermometer" => Self::Thermometer,
            "devices.types.socket" => Self::Socket,
            "devices.types.sensor" => Self::Sensor,
            "devices.types.heater" => Self::Heater,
            "devices.types.humidifier" => Self::Humidifier,
            "devices.types.dehumidifier" => Self::Dehumidifier,
            "devices.types.ice_maker" => Self::IceMaker,
            "devices.types.aroma_diffuser" => Self::AromaDiffuser,
            _ => Self::Other(s),
        }
    }
}

impl From<DeviceType> for String {
    fn from(t: DeviceType) -> String {
        match t {
            DeviceType::Other(s) => s,
            t => t.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.write_str(self.as_str())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCapabilityKind {
    #[serde(rename = "devices.capabilities.on_off")]
    OnOff,
    #[serde(rename = "devices.capabilities.toggle")]
    Toggle,
    #[serde(rename = "devices.capabilities.range")]
    Range,
    #[serde(rename = "devices.capabilities.mode")]
    Mode,
    #[serde(rename = "devices.capabilities.color_setting")]
    ColorSetting,
    #[serde(rename = "devices.capabilities.segment_color_setting")]
    SegmentColorSetting,
    #[serde(rename = "devices.capabilities.music_setting")]
    MusicSetting,
    #[serde(rename = "devices.capabilities.dynamic_scene")]
    DynamicScene,
    #[serde(rename = "devices.capabilities.work_mode")]
    WorkMode,
    #[serde(rename = "devices.capabilities.dynamic_setting")]
    DynamicSetting,
    #[serde(rename = "devices.capabilities.temperature_setting")]
    TemperatureSetting,
    #[serde(rename = "devices.capabilities.online")]
    Online,
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DeviceCapability {
    #[serde(rename = "type")]
    pub kind: DeviceCapabilityKind,
    pub instance: String,
    pub parameters: Option<DeviceParameters>,
    #[serde(rename = "alarmType")]
    pub alarm_type: Option<i64>,
    #[serde(rename = "eventState")]
    pub event_state: Option<JsonValue>,
}

impl DeviceCapability {
    pub fn enum_value_by_name(&self, name: &str) -> Option<&JsonValue> {
        self.parameters.as_ref()?.enum_value_by_name(name)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&StructField> {
        self.parameters.as_ref()?.field_by_name(name)
    }
}

/// The legal value space of a capability, keyed by its `dataType`.
/// Each variant carries only the members that make sense for it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "dataType")]
pub enum DeviceParameters {
    #[serde(rename = "ENUM")]
    Enum { options: Vec<EnumOption> },
    #[serde(rename = "INTEGER")]
    Integer {
        unit: Option<String>,
        range: IntegerRange,
    },
    #[serde(rename = "STRUCT")]
    Struct { fields: Vec<StructField> },
    #[serde(rename = "Array")]
    Array {
        size: Option<Bounds>,
        #[serde(rename = "elementRange")]
        element_range: Option<Bounds>,
        #[serde(rename = "elementType")]
        element_type: Option<String>,
        #[serde(default)]
        options: Vec<ArrayOption>,
    },
}

impl DeviceParameters {
    pub fn data_type(&self) -> &'static str {
        match self {
            Self::Enum { .. } => "ENUM",
            Self::Integer { .. } => "INTEGER",
            Self::Struct { .. } => "STRUCT",
            Self::Array { .. } => "Array",
        }
    }

    pub fn enum_value_by_name(&self, name: &str) -> Option<&JsonValue> {
        match self {
            Self::Enum { options } => options.iter().find(|o| o.name == name).map(|o| &o.value),
            _ => None,
        }
    }

    pub fn field_by_name(&self, name: &str) -> Option<&StructField> {
        match self {
            Self::Struct { fields } => fields.iter().find(|f| f.field_name == name),
            _ => None,
        }
    }

    /// A one-line human readable summary of the constraints,
    /// used when displaying a capability.
    pub fn describe(&self) -> String {
        match self {
            Self::Enum { options } => options
                .iter()
                .map(|o| o.name.as_str())
                .collect::<Vec<_>>()
                .join("|"),
            Self::Integer { unit, range } => {
                let mut result = format!("{}..={}", range.min, range.max);
                if let Some(unit) = unit {
                    result.push(' ');
                    result.push_str(unit);
                }
                result
            }
            Self::Struct { fields } => fields
                .iter()
                .map(|f| format!("{}: {}", f.field_name, f.field_type.describe()))
                .collect::<Vec<_>>()
                .join(", "),
            Self::Array {
                size,
                element_range,
                element_type,
                ..
            } => {
                let mut result = format!("[{}]", element_type.as_deref().unwrap_or("?"));
                if let Some(Bounds { min, max }) = element_range {
                    result.push_str(&format!(" {min}..={max}"));
                }
                if let Some(Bounds { min, max }) = size {
                    result.push_str(&format!(" size {min}..={max}"));
                }
                result
            }
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StructField {
    #[serde(rename = "fieldName")]
    pub field_name: String,

    #[serde(flatten)]
    pub field_type: DeviceParameters,

    #[serde(rename = "defaultValue")]
    pub default_value: Option<JsonValue>,

    #[serde(default)]
    pub required: bool,
}

/// Inclusive bounds on the elements of an array, or on its length.
/// Values are signed; nothing in the API promises otherwise.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerRange {
    pub min: i64,
    pub max: i64,
    #[serde(default)]
    pub precision: i64,
}

impl IntegerRange {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EnumOption {
    pub name: String,
    #[serde(default)]
    pub value: JsonValue,
    #[serde(flatten)]
    pub extras: HashMap<String, JsonValue>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayOption {
    pub value: i64,
}
