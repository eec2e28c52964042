//! Replays a candump log (`(1700000000.000000) can0 176#0000000000290000`) through a vehicle profile and prints the
//! resulting HID reports.
//!
//! Usage: `cargo run --example replay -- ID3_INTERNAL dump.log`
use v2g::gamepad::HidGamepad;
use v2g::interpreter::SignalInterpreter;
use v2g::selection::ProfileSelection;

fn parse_line(line: &str) -> Option<(u32, Vec<u8>)> {
    let frame = line.split_whitespace().last()?;
    let (id, data) = frame.split_once('#')?;
    let id = u32::from_str_radix(id, 16).ok()?;
    let data = hex::decode(data.trim_start_matches('#')).ok()?;
    Some((id, data))
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let selection: ProfileSelection = args.next().unwrap_or_default().parse().unwrap();
    let path = args.next().expect("missing log file");

    let name = match selection {
        ProfileSelection::Named(name) => name,
        ProfileSelection::AutoDetect => panic!("replay needs a vehicle name"),
    };
    let registry = v2g::vehicles::registry().unwrap();
    let profile = registry.get(&name).unwrap();

    let gamepad = HidGamepad::new(|report: &[u8]| println!("{}", hex::encode(report)));
    let interpreter = SignalInterpreter::new(profile, gamepad);

    for line in std::fs::read_to_string(path).unwrap().lines() {
        if let Some((id, data)) = parse_line(line) {
            interpreter.on_frame(id, &data);
        }
    }
}
