use clap::{Arg, Command};

use mff101_driver::{FlipMount, Position, Result};

fn run(port_name: &str, identify: bool) -> Result<()> {
    let mut mount = FlipMount::open(port_name)?;
    let info = mount.device_info();
    println!(
        "Connected to {} (serial {}, firmware {}, hardware {})",
        info.model_number_str(),
        info.serial_number,
        info.firmware_version,
        info.hardware_version
    );

    if identify {
        mount.identify()?;
        println!("Front panel LEDs flashing");
    }

    println!("Position: {:?}", mount.get_position()?);

    println!("Flipping to position 2...");
    mount.flip(Position::Two, true)?;
    println!("Position: {:?}", mount.get_position()?);

    println!("Flipping back to position 1...");
    mount.flip(Position::One, true)?;
    println!("Position: {:?}", mount.get_position()?);

    println!("Non-blocking flip to position 2...");
    mount.flip(Position::Two, false)?;
    println!("(doing something else while the mount moves)");
    mount.finish_flip()?;
    println!("Position: {:?}", mount.position());

    mount.close();
    Ok(())
}

fn main() {
    let matches = Command::new("MFF101 flip mount demo")
        .about("Connects to a Thorlabs MFF101 and runs through a flip cycle")
        .disable_version_flag(true)
        .arg(
            Arg::new("port")
                .help("The device path to a serial port, such as /dev/ttyUSB0")
                .use_value_delimiter(false)
                .required(true),
        )
        .arg(
            Arg::new("identify")
                .long("identify")
                .help("Flash the front panel LEDs after connecting"),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    let port_name = matches.value_of("port").unwrap();
    if let Err(e) = run(port_name, matches.is_present("identify")) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
