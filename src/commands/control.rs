use clap_num::maybe_hex;
use govee_devices::platform_api::{pack_rgb, ControlInstance};

#[derive(clap::Parser, Debug)]
pub struct ControlCommand {
    /// The device name, exactly as shown by `list`
    pub name: String,

    #[command(subcommand)]
    cmd: SubCommand,
}

#[derive(clap::Parser, Debug, PartialEq)]
enum SubCommand {
    On,
    Off,
    Brightness {
        #[arg(allow_negative_numbers = true)]
        percent: i64,
    },
    Temperature {
        #[arg(allow_negative_numbers = true)]
        kelvin: i64,
    },
    /// Set a solid color given as a CSS color, eg: `green` or `#00ff00`
    Color { color: csscolorparser::Color },
    /// Set a solid color given as a packed 0xRRGGBB value
    Rgb {
        #[arg(value_parser=maybe_hex::<u32>)]
        value: u32,
    },
}

impl SubCommand {
    /// Checks the value locally so that a bad value doesn't
    /// cost a device list round trip.
    fn validate(&self) -> govee_devices::Result<()> {
        match self {
            Self::On | Self::Off | Self::Color { .. } => {}
            Self::Brightness { percent } => {
                ControlInstance::Brightness.validate(*percent)?;
            }
            Self::Temperature { kelvin } => {
                ControlInstance::ColorTemperatureK.validate(*kelvin)?;
            }
            Self::Rgb { value } => {
                ControlInstance::ColorRgb.validate((*value).into())?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for SubCommand {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::On => write!(fmt, "on"),
            Self::Off => write!(fmt, "off"),
            Self::Brightness { percent } => write!(fmt, "brightness {percent}%"),
            Self::Temperature { kelvin } => write!(fmt, "{kelvin}K"),
            Self::Color { color } => {
                let [r, g, b, _a] = color.to_rgba8();
                write!(fmt, "#{:06x}", pack_rgb(r, g, b))
            }
            Self::Rgb { value } => write!(fmt, "#{value:06x}"),
        }
    }
}

impl ControlCommand {
    pub async fn run(&self, args: &crate::Args) -> anyhow::Result<()> {
        self.cmd.validate()?;

        let client = args.api_args.api_client()?;
        let device = client.find_device_by_name(&self.name).await?;

        match &self.cmd {
            SubCommand::On | SubCommand::Off => {
                client
                    .set_power_state(&device, self.cmd == SubCommand::On)
                    .await?;
            }
            SubCommand::Brightness { percent } => {
                client.set_brightness(&device, *percent).await?;
            }
            SubCommand::Temperature { kelvin } => {
                client.set_color_temperature(&device, *kelvin).await?;
            }
            SubCommand::Color { color } => {
                let [r, g, b, _a] = color.to_rgba8();
                client.set_color_rgb(&device, r, g, b).await?;
            }
            SubCommand::Rgb { value } => {
                client.set_solid_color(&device, (*value).into()).await?;
            }
        }

        println!("{} → {}", device.device_name, self.cmd);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> ControlCommand {
        ControlCommand::try_parse_from(std::iter::once("control").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn parse_commands() {
        let cmd = parse(&["52 York", "on"]);
        assert_eq!(cmd.name, "52 York");
        assert_eq!(cmd.cmd, SubCommand::On);

        assert_eq!(
            parse(&["52 York", "brightness", "40"]).cmd,
            SubCommand::Brightness { percent: 40 }
        );
        assert_eq!(
            parse(&["52 York", "rgb", "0x00ff00"]).cmd,
            SubCommand::Rgb { value: 0x00ff00 }
        );
        assert_eq!(
            parse(&["52 York", "rgb", "255"]).cmd,
            SubCommand::Rgb { value: 255 }
        );

        match parse(&["52 York", "color", "green"]).cmd {
            SubCommand::Color { color } => {
                let [r, g, b, _a] = color.to_rgba8();
                assert_eq!(pack_rgb(r, g, b), 0x008000);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validate_before_lookup() {
        assert!(parse(&["x", "brightness", "100"]).cmd.validate().is_ok());
        assert!(parse(&["x", "brightness", "101"])
            .cmd
            .validate()
            .unwrap_err()
            .is_validation());
        assert!(parse(&["x", "temperature", "1500"])
            .cmd
            .validate()
            .unwrap_err()
            .is_validation());
        assert!(parse(&["x", "rgb", "0x1000000"])
            .cmd
            .validate()
            .unwrap_err()
            .is_validation());
        assert!(parse(&["x", "off"]).cmd.validate().is_ok());
    }

    #[test]
    fn rgb_value_parsing() {
        assert_eq!(
            parse(&["x", "rgb", "0xffffff"]).cmd,
            SubCommand::Rgb { value: 16777215 }
        );
        assert!(parse(&["x", "rgb", "0xffffff"]).cmd.validate().is_ok());

        let argv = ["control", "x", "rgb", "not-a-color"];
        assert!(ControlCommand::try_parse_from(argv).is_err());
        let argv = ["control", "x", "rgb", "0x100000000"];
        assert!(ControlCommand::try_parse_from(argv).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(SubCommand::Rgb { value: 0x00ff00 }.to_string(), "#00ff00");
        assert_eq!(
            SubCommand::Temperature { kelvin: 2700 }.to_string(),
            "2700K"
        );
    }
}
