use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use govee_devices::Device;

#[derive(clap::Parser, Debug)]
pub struct ShowCommand {
    /// The device name, exactly as shown by `list`
    pub name: String,
}

impl ShowCommand {
    pub async fn run(&self, args: &crate::Args) -> anyhow::Result<()> {
        let client = args.api_args.api_client()?;
        let device = client.find_device_by_name(&self.name).await?;

        println!("{device}");
        println!("Type: {}\n", device.device_type);
        println!("{}", capability_table(&device));
        Ok(())
    }
}

pub fn capability_table(device: &Device) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Instance", "Type", "Data Type", "Constraints"]);

    for cap in &device.capabilities {
        let (data_type, constraints) = match &cap.parameters {
            Some(params) => (params.data_type(), params.describe()),
            None => ("", String::new()),
        };
        table.add_row(vec![
            cap.instance.clone(),
            format!("{:?}", cap.kind),
            data_type.to_string(),
            constraints,
        ]);
    }
    table
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn capability_rows() {
        let device: Device = serde_json::from_value(serde_json::json!({
            "sku": "H706A",
            "device": "2F:FA:C6:24:9B:FA:ED:39",
            "deviceName": "52 York",
            "type": "devices.types.light",
            "capabilities": [
                {
                    "type": "devices.capabilities.color_setting",
                    "instance": "colorTemperatureK",
                    "parameters": {
                        "dataType": "INTEGER",
                        "unit": "unit.kelvin",
                        "range": {"min": 2000, "max": 9000, "precision": 1}
                    }
                },
                {
                    "type": "devices.capabilities.online",
                    "instance": "online"
                }
            ]
        }))
        .unwrap();

        let rendered = capability_table(&device).to_string();
        let row = rendered
            .lines()
            .find(|line| line.contains("colorTemperatureK"))
            .expect("colorTemperatureK row");
        assert!(row.contains("ColorSetting"), "{row}");
        assert!(row.contains("INTEGER"), "{row}");
        assert!(row.contains("2000..=9000 unit.kelvin"), "{row}");

        assert!(rendered.lines().any(|line| line.contains("Online")), "{rendered}");
    }
}
