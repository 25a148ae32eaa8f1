use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::aqara::{FanSpeed, Mode, Power, ProfileSet, StatusRegister, Swing};
use crate::wire::WireFormat;

mod aqara;
mod bits;
mod wire;

#[derive(Parser, Debug)]
#[command(name = "acpartner", about = "Decode and compose AC partner status registers")]
struct Cli {
    /// Device model whose mapping tables to use
    #[arg(long, global = true, default_value = "lumi.acpartner.v3")]
    model: String,

    /// Extra profile definitions (JSON array) added to the built-ins
    #[arg(long, global = true)]
    profiles: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read register strings from stdin, one per line, and print the decoded state
    Decode {
        /// Report unmapped raw values as the device being off instead of failing
        #[arg(long)]
        lossy: bool,
    },

    /// Compute the register to write back with the given fields changed
    Set {
        /// Current register value as read from the device
        register: String,

        #[arg(long)]
        power: Option<Power>,

        #[arg(long)]
        mode: Option<Mode>,

        #[arg(long)]
        fan: Option<FanSpeed>,

        #[arg(long)]
        swing: Option<Swing>,

        /// Target temperature in Celsius
        #[arg(long)]
        temp: Option<u8>,

        #[arg(long, value_enum, default_value_t = WireFormat::Decimal)]
        format: WireFormat,
    },

    /// List known device models
    Profiles,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut profiles = ProfileSet::builtin();
    if let Some(path) = &cli.profiles {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        profiles.merge_json(&json)?;
    }

    match cli.command {
        Command::Profiles => {
            for model in profiles.models() {
                println!("{}", model);
            }
        }

        Command::Decode { lossy } => {
            let profile = profiles.find(&cli.model)?;

            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }

                let register = StatusRegister(wire::parse_register(&line)?);
                if lossy {
                    println!("{:?}", register.state_lossy(profile));
                } else {
                    println!("{:?}", register.state(profile)?);
                }
                io::stdout().flush()?;
            }
        }

        Command::Set {
            register,
            power,
            mode,
            fan,
            swing,
            temp,
            format,
        } => {
            let profile = profiles.find(&cli.model)?;
            let mut register = StatusRegister(wire::parse_register(&register)?);

            if let Some(mode) = mode {
                register = register.set_mode(profile, mode)?;
            }
            if let Some(fan) = fan {
                register = register.set_fan_speed(profile, fan)?;
            }
            if let Some(temp) = temp {
                register = register.set_temperature(profile, temp)?;
            }
            if let Some(swing) = swing {
                register = register.set_swing(swing)?;
            }
            // Last, so an explicit --power off wins over the implicit
            // power-on of the other writes
            if let Some(power) = power {
                register = register.set_power(power)?;
            }

            println!("{}", format.format(register.0));
        }
    }

    Ok(())
}
