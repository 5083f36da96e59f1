//! Audio device enumeration.

use cpal::traits::{DeviceTrait, HostTrait};

use super::capture::DeviceInfo;
use crate::error::RecorderError;

/// List all available audio input devices on the system.
///
/// Device descriptions double as ids; cpal does not expose stable device
/// identifiers across hosts.
pub fn list_audio_devices() -> Result<Vec<DeviceInfo>, RecorderError> {
    let host = cpal::default_host();
    let default_device_name = host
        .default_input_device()
        .and_then(|d| d.description().ok())
        .map(|d| d.to_string());

    let mut devices = Vec::new();
    let inputs = host
        .input_devices()
        .map_err(|e| RecorderError::DeviceUnavailable {
            reason: e.to_string(),
        })?;
    for device in inputs {
        if let Ok(desc) = device.description() {
            let name = desc.to_string();
            devices.push(DeviceInfo {
                id: name.clone(),
                label: name.clone(),
                is_default: default_device_name.as_ref() == Some(&name),
            });
        }
    }

    if devices.is_empty() {
        return Err(RecorderError::DeviceUnavailable {
            reason: "no audio input devices found".to_string(),
        });
    }

    Ok(devices)
}
