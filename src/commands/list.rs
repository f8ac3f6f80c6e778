use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use govee_devices::Device;

#[derive(clap::Parser, Debug)]
pub struct ListCommand {}

impl ListCommand {
    pub async fn run(&self, args: &crate::Args) -> anyhow::Result<()> {
        let client = args.api_args.api_client()?;
        let devices = client
            .get_devices()
            .await
            .context("Failed to fetch devices")?;

        if devices.is_empty() {
            println!("No devices found.");
            return Ok(());
        }

        println!("Found {} Govee device(s):\n", devices.len());
        println!("{}", device_table(&devices));
        Ok(())
    }
}

pub fn device_table(devices: &[Device]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Name", "Model", "MAC Address", "Type", "Features"]);

    for d in devices {
        table.add_row(vec![
            d.device_name.clone(),
            d.sku.clone(),
            d.device.clone(),
            d.device_type.to_string(),
            d.capabilities.len().to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod test {
    use super::*;

    fn lamp() -> Device {
        serde_json::from_value(serde_json::json!({
            "sku": "H706A",
            "device": "2F:FA:C6:24:9B:FA:ED:39",
            "deviceName": "52 York",
            "type": "devices.types.light",
            "capabilities": [
                {
                    "type": "devices.capabilities.on_off",
                    "instance": "powerSwitch",
                    "parameters": {
                        "dataType": "ENUM",
                        "options": [{"name": "on", "value": 1}, {"name": "off", "value": 0}]
                    }
                },
                {
                    "type": "devices.capabilities.range",
                    "instance": "brightness",
                    "parameters": {
                        "dataType": "INTEGER",
                        "range": {"min": 1, "max": 100, "precision": 1}
                    }
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn table_rows() {
        let rendered = device_table(&[lamp()]).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        for header in ["Name", "Model", "MAC Address", "Type", "Features"] {
            assert!(lines[1].contains(header), "{rendered}");
        }
        let row = lines
            .iter()
            .find(|line| line.contains("52 York"))
            .expect("device row");
        for cell in ["H706A", "2F:FA:C6:24:9B:FA:ED:39", "devices.types.light", "│ 2 "] {
            assert!(row.contains(cell), "{row}");
        }
    }

    #[test]
    fn table_is_bordered() {
        let rendered = device_table(&[lamp()]).to_string();
        assert!(rendered.starts_with('┌'), "{rendered}");
        assert!(rendered.trim_end().ends_with('┘'), "{rendered}");
    }
}
