use crate::device::Device;
use crate::error::{GoveeError, Result};
use crate::opt_env_var;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::ops::RangeInclusive;
use std::time::Duration;

// This file implements the subset of the Govee Platform API V1
// that lists devices and sends control commands:
// <https://developer.govee.com/reference/get-you-devices>

pub const SERVER: &str = "https://openapi.api.govee.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const DEVICES_PATH: &str = "/router/api/v1/user/devices";
const CONTROL_PATH: &str = "/router/api/v1/device/control";

// Commands are checked against these fixed ranges rather than
// the range advertised by the device capability.
pub const BRIGHTNESS_RANGE: RangeInclusive<i64> = 1..=100;
pub const COLOR_TEMPERATURE_RANGE: RangeInclusive<i64> = 2000..=9000;
pub const COLOR_RGB_RANGE: RangeInclusive<i64> = 0..=0xff_ff_ff;

#[derive(clap::Parser, Debug)]
pub struct GoveeApiArguments {
    /// The Govee API Key. If not passed here, it will be read from
    /// the GOVEE_API_KEY environment variable.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// How long to wait for each request to the Govee API, in seconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    #[arg(long, global = true, hide = true, default_value = SERVER)]
    pub api_server: String,
}

impl GoveeApiArguments {
    pub fn opt_api_key(&self) -> Result<Option<String>> {
        match &self.api_key {
            Some(key) => Ok(Some(key.to_string())),
            None => Ok(opt_env_var::<String>("GOVEE_API_KEY")?.filter(|key| !key.is_empty())),
        }
    }

    pub fn api_key(&self) -> Result<String> {
        self.opt_api_key()?.ok_or_else(|| {
            GoveeError::Config(
                "Please specify the api key either via the \
                --api-key parameter or by setting $GOVEE_API_KEY"
                    .to_string(),
            )
        })
    }

    pub fn api_client(&self) -> Result<GoveeApiClient> {
        let key = self.api_key()?;
        GoveeApiClient::with_options(key, &self.api_server, Duration::from_secs(self.timeout))
    }
}

/// The capability instances that have a dedicated, validated
/// setter on [`GoveeApiClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::IntoStaticStr, strum_macros::Display)]
pub enum ControlInstance {
    #[strum(serialize = "powerSwitch")]
    PowerSwitch,
    #[strum(serialize = "brightness")]
    Brightness,
    #[strum(serialize = "colorTemperatureK")]
    ColorTemperatureK,
    #[strum(serialize = "colorRgb")]
    ColorRgb,
}

impl ControlInstance {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn valid_range(self) -> Option<RangeInclusive<i64>> {
        match self {
            Self::PowerSwitch => None,
            Self::Brightness => Some(BRIGHTNESS_RANGE),
            Self::ColorTemperatureK => Some(COLOR_TEMPERATURE_RANGE),
            Self::ColorRgb => Some(COLOR_RGB_RANGE),
        }
    }

    pub fn validate(self, value: i64) -> Result<i64> {
        match self.valid_range() {
            Some(range) if !range.contains(&value) => Err(GoveeError::Validation {
                instance: self.name(),
                value,
                min: *range.start(),
                max: *range.end(),
            }),
            _ => Ok(value),
        }
    }
}

pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Case-sensitive exact match on the display name
pub fn pick_device_by_name(devices: Vec<Device>, name: &str) -> Result<Device> {
    devices
        .into_iter()
        .find(|d| d.device_name == name)
        .ok_or_else(|| GoveeError::NotFound(name.to_string()))
}

pub struct GoveeApiClient {
    key: String,
    server: String,
    http: reqwest::Client,
}

impl GoveeApiClient {
    pub fn new<K: Into<String>>(key: K) -> Result<Self> {
        Self::with_options(key, SERVER, DEFAULT_TIMEOUT)
    }

    pub fn with_options<K: Into<String>, S: Into<String>>(
        key: K,
        server: S,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let server = server.into().trim_end_matches('/').to_string();
        Ok(Self {
            key: key.into(),
            server,
            http,
        })
    }

    fn endpoint(&self, url: &str) -> String {
        format!("{}{url}", self.server)
    }

    /// Fetches the device directory. Each call is a fresh request.
    pub async fn get_devices(&self) -> Result<Vec<Device>> {
        let url = self.endpoint(DEVICES_PATH);
        let body = self.request(Method::GET, url, None::<&()>).await?;

        // Check the status before looking at `data`, which failed
        // responses may omit, null out or shape differently.
        let status: StatusEnvelope = from_json(&body)?;
        if let Some(err) = status.failure(&body) {
            return Err(err);
        }

        let resp: GetDevicesResponse = from_json(&body)?;
        log::debug!("fetched {} devices", resp.data.len());
        Ok(resp.data)
    }

    pub async fn find_device_by_name(&self, name: &str) -> Result<Device> {
        let devices = self.get_devices().await?;
        pick_device_by_name(devices, name)
    }

    pub async fn get_device_by_id<I: AsRef<str>>(&self, id: I) -> Result<Device> {
        let id = id.as_ref();
        let devices = self.get_devices().await?;
        devices
            .into_iter()
            .find(|d| d.device == id)
            .ok_or_else(|| GoveeError::NotFound(id.to_string()))
    }

    /// Sends an unvalidated command naming `instance` to `device`.
    pub async fn send_command<V: Into<JsonValue>>(
        &self,
        device: &Device,
        instance: &str,
        value: V,
    ) -> Result<()> {
        let url = self.endpoint(CONTROL_PATH);
        let request = ControlDeviceRequest {
            request: ControlDevicePayload {
                device: device.device.to_string(),
                sku: device.sku.to_string(),
                name: instance.to_string(),
                value: value.into(),
            },
        };
        log::debug!(
            "control {device}: {instance}={}",
            request.request.value
        );

        let body = self.request(Method::POST, url, Some(&request)).await?;
        check_control_response(&body)
    }

    pub async fn set_power_state(&self, device: &Device, on: bool) -> Result<()> {
        self.send_command(
            device,
            ControlInstance::PowerSwitch.name(),
            if on { 1 } else { 0 },
        )
        .await
    }

    pub async fn set_brightness(&self, device: &Device, percent: i64) -> Result<()> {
        let instance = ControlInstance::Brightness;
        let value = instance.validate(percent)?;
        self.send_command(device, instance.name(), value).await
    }

    pub async fn set_color_temperature(&self, device: &Device, kelvin: i64) -> Result<()> {
        let instance = ControlInstance::ColorTemperatureK;
        let value = instance.validate(kelvin)?;
        self.send_command(device, instance.name(), value).await
    }

    /// `color` is 24-bit RGB packed as `0xRRGGBB`
    pub async fn set_solid_color(&self, device: &Device, color: i64) -> Result<()> {
        let instance = ControlInstance::ColorRgb;
        let value = instance.validate(color)?;
        self.send_command(device, instance.name(), value).await
    }

    pub async fn set_color_rgb(&self, device: &Device, r: u8, g: u8, b: u8) -> Result<()> {
        self.set_solid_color(device, pack_rgb(r, g, b).into()).await
    }

    async fn request<B: Serialize>(
        &self,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<Vec<u8>> {
        let mut request = self
            .http
            .request(method, url)
            .header("Govee-API-Key", &self.key);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        http_response_body(response).await
    }
}

#[derive(Serialize, Debug)]
struct ControlDeviceRequest {
    pub request: ControlDevicePayload,
}

#[derive(Serialize, Debug)]
struct ControlDevicePayload {
    pub device: String,
    pub sku: String,
    pub name: String,
    pub value: JsonValue,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GetDevicesResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Device>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<Device>, D::Error> {
    Ok(Option::<Vec<Device>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The status portion of any response envelope. The text has been
/// seen as both `message` and `msg`, and `code` isn't always a number.
#[derive(Deserialize, Debug)]
struct StatusEnvelope {
    code: Option<JsonValue>,
    message: Option<JsonValue>,
    msg: Option<JsonValue>,
}

impl StatusEnvelope {
    /// Returns the error reported by the envelope, if any.
    /// A missing code counts as success.
    fn failure(self, body: &[u8]) -> Option<GoveeError> {
        let code = self.code?;
        let numeric = match &code {
            JsonValue::Number(n) => n.as_i64(),
            JsonValue::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        if numeric == Some(200) {
            return None;
        }

        let message = [self.message, self.msg]
            .into_iter()
            .flatten()
            .find_map(|m| match m {
                JsonValue::String(s) => Some(s),
                JsonValue::Null => None,
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| String::from_utf8_lossy(body).to_string());

        Some(match numeric {
            Some(code) => GoveeError::Api { code, message },
            None => GoveeError::Api {
                code: 0,
                message: format!("unexpected status code {code}: {message}"),
            },
        })
    }
}

/// A 200 from the control endpoint may still carry a failure code
/// in its body. Bodies that aren't a JSON envelope count as accepted.
fn check_control_response(body: &[u8]) -> Result<()> {
    let Ok(envelope) = serde_json::from_slice::<StatusEnvelope>(body) else {
        return Ok(());
    };
    match envelope.failure(body) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

pub fn from_json<T: serde::de::DeserializeOwned, S: AsRef<[u8]>>(text: S) -> Result<T> {
    let text = text.as_ref();
    serde_json_path_to_error::from_slice(text).map_err(|err| {
        GoveeError::Decode(format!("{err}. Input: {}", String::from_utf8_lossy(text)))
    })
}

async fn http_response_body(response: reqwest::Response) -> Result<Vec<u8>> {
    let url = response.url().clone();
    let status = response.status();
    let body = response.bytes().await?;
    log::trace!(
        "request {url} status {}: {}",
        status.as_u16(),
        String::from_utf8_lossy(&body)
    );

    if status != StatusCode::OK {
        return Err(GoveeError::Api {
            code: status.as_u16().into(),
            message: String::from_utf8_lossy(&body).to_string(),
        });
    }
    Ok(body.to_vec())
}
