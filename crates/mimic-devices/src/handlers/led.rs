//! LED handler.
//!
//! The LED keeps a composite `{state, color}` value in a Store emitter.
//! Reads report both fields as separate readings; the `state` and `color`
//! write actions replace one field each, under the emitter's lock so a
//! concurrent write to the other field is not lost.

use mimic_core::{Error, Result, Value, constants};
use tracing::debug;

use super::DeviceHandler;
use crate::device::{Device, WriteCommand};
use crate::reading::Reading;
use crate::services::Services;

const OUTPUT_STATE: &str = "led.state";
const OUTPUT_COLOR: &str = "led.color";

const VALID_STATES: [&str; 3] = [
    constants::LED_STATE_ON,
    constants::LED_STATE_OFF,
    constants::LED_STATE_BLINK,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedHandler;

impl DeviceHandler for LedHandler {
    fn name(&self) -> &'static str {
        "led"
    }

    async fn read(&self, services: &Services, device: &Device) -> Result<Vec<Reading>> {
        let value = services.emitters.sample(&device.id).await?;

        let field = |name: &str, output: &str| {
            value
                .field(name)
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::reading_construction(
                        output,
                        format!("LED value {value} has no {name} field"),
                    )
                })
        };
        let state = field(constants::LED_FIELD_STATE, OUTPUT_STATE)?;
        let color = field(constants::LED_FIELD_COLOR, OUTPUT_COLOR)?;

        Ok(vec![
            device.output(OUTPUT_STATE)?.make_reading(state)?,
            device.output(OUTPUT_COLOR)?.make_reading(color)?,
        ])
    }

    async fn write(&self, services: &Services, device: &Device, command: &WriteCommand) -> Result<()> {
        let (field, data) = match command.action.as_str() {
            constants::LED_ACTION_STATE => (constants::LED_FIELD_STATE, parse_state(command)?),
            constants::LED_ACTION_COLOR => (constants::LED_FIELD_COLOR, parse_color(command)?),
            other => return Err(Error::unsupported_command(device.kind, other)),
        };

        services
            .emitters
            .update(&device.id, |emitter| {
                let mut fields = emitter
                    .current()
                    .as_composite()
                    .cloned()
                    .unwrap_or_default();
                fields.insert(field.to_string(), data.clone());
                emitter.set(Value::Composite(fields));
            })
            .await?;

        debug!(device = %device.id, field, value = %data, "LED updated");
        Ok(())
    }
}

fn parse_state(command: &WriteCommand) -> Result<String> {
    let state = command.require_data()?.trim().to_lowercase();
    if VALID_STATES.contains(&state.as_str()) {
        Ok(state)
    } else {
        Err(Error::invalid_write_data(
            &command.action,
            format!("expected one of {VALID_STATES:?}, got {state:?}"),
        ))
    }
}

fn parse_color(command: &WriteCommand) -> Result<String> {
    let color = command.require_data()?.trim().to_lowercase();
    if color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(color)
    } else {
        Err(Error::invalid_write_data(
            &command.action,
            format!("expected 6 hex digits, got {color:?}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::SetupAction;
    use crate::strategy::StepConfig;
    use mimic_core::DeviceKind;
    use rstest::rstest;

    async fn setup(services: &Services) -> Device {
        let device = Device::new(DeviceKind::Led);
        SetupAction::for_kind(DeviceKind::Led)
            .run(&services.emitters, &device, StepConfig::default(), None)
            .await
            .unwrap();
        device
    }

    fn texts(readings: &[Reading]) -> Vec<(&str, &str)> {
        readings
            .iter()
            .map(|r| (r.output.as_str(), r.value.as_text().unwrap()))
            .collect()
    }

    #[tokio::test]
    async fn test_led_starts_off_and_black() {
        let services = Services::new();
        let device = setup(&services).await;

        let readings = LedHandler.read(&services, &device).await.unwrap();
        assert_eq!(
            texts(&readings),
            vec![("led.state", "off"), ("led.color", "000000")]
        );
    }

    #[tokio::test]
    async fn test_led_writes_keep_other_field() {
        let services = Services::new();
        let device = setup(&services).await;

        LedHandler
            .write(&services, &device, &WriteCommand::new("color").with_data("FF8800"))
            .await
            .unwrap();
        LedHandler
            .write(&services, &device, &WriteCommand::new("state").with_data("blink"))
            .await
            .unwrap();

        let readings = LedHandler.read(&services, &device).await.unwrap();
        assert_eq!(
            texts(&readings),
            vec![("led.state", "blink"), ("led.color", "ff8800")]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_state_and_color_writes_keep_both_fields() {
        let services = Services::new();
        let device = setup(&services).await;

        let states = {
            let services = services.clone();
            let device = device.clone();
            tokio::spawn(async move {
                for state in ["on", "off", "on", "off", "blink"].repeat(20) {
                    LedHandler
                        .write(&services, &device, &WriteCommand::new("state").with_data(state))
                        .await
                        .unwrap();
                }
            })
        };
        let colors = {
            let services = services.clone();
            let device = device.clone();
            tokio::spawn(async move {
                for color in ["ff0000", "0000ff", "00ff00"].repeat(20) {
                    LedHandler
                        .write(&services, &device, &WriteCommand::new("color").with_data(color))
                        .await
                        .unwrap();
                }
            })
        };
        states.await.unwrap();
        colors.await.unwrap();

        let readings = LedHandler.read(&services, &device).await.unwrap();
        assert_eq!(
            texts(&readings),
            vec![("led.state", "blink"), ("led.color", "00ff00")]
        );
    }

    #[rstest]
    #[case("state", Some("dim"))]
    #[case("state", None)]
    #[case("color", Some("fff"))]
    #[case("color", Some("zz0000"))]
    #[tokio::test]
    async fn test_led_rejects_bad_data(#[case] action: &str, #[case] data: Option<&str>) {
        let services = Services::new();
        let device = setup(&services).await;

        let mut command = WriteCommand::new(action);
        if let Some(data) = data {
            command = command.with_data(data);
        }

        let err = LedHandler.write(&services, &device, &command).await.unwrap_err();
        assert!(matches!(err, Error::InvalidWriteData { .. }));
    }

    #[tokio::test]
    async fn test_led_unknown_action() {
        let services = Services::new();
        let device = setup(&services).await;

        let err = LedHandler
            .write(&services, &device, &WriteCommand::new("strobe"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedCommand { .. }));
    }
}
