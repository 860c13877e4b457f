//! Host tool: negotiate a requested configuration against a hardware report.
//!
//! Loads an optional requested-values document, applies a hardware
//! capability snapshot, prints the clamped fields and the effective
//! configuration. With `--serve` the device stays up behind the inspection
//! endpoint until the process is killed.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin mlme-cfg -- hw.json requested.json --serve
//! MLME_CFG_PORT=9000 cargo run --bin mlme-cfg -- hw.json --no-11ax
//! ```

use log::{error, info, warn};
use std::process::exit;
use std::sync::Arc;
use std::time::Duration;
use wlan_mlme_cfg::{
    loader, CapabilityTag, DeviceRegistry, FeatureSet, HardwareCapabilitySnapshot, InspectServer,
    DEFAULT_INSPECT_PORT,
};

const DEVICE_ID: u32 = 0;

struct Args {
    hardware: String,
    requested: Option<String>,
    features: FeatureSet,
    serve: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    if let Err(e) = run(args) {
        error!("{}", e);
        exit(1);
    }
}

fn parse_args() -> Args {
    let argv: Vec<String> = std::env::args().collect();
    let mut paths = Vec::new();
    let mut features = FeatureSet::ALL;
    let mut serve = false;

    for arg in &argv[1..] {
        match arg.as_str() {
            "--no-11ax" => features = features.without(CapabilityTag::Dot11ax),
            "--no-fils" => features = features.without(CapabilityTag::Fils),
            "--no-oce" => features = features.without(CapabilityTag::Oce),
            "--serve" => serve = true,
            "--help" | "-h" => {
                usage(&argv[0]);
                exit(0);
            }
            flag if flag.starts_with('-') => {
                eprintln!("Unknown option: {}", flag);
                usage(&argv[0]);
                exit(2);
            }
            path => paths.push(path.to_string()),
        }
    }

    let mut paths = paths.into_iter();
    let hardware = match paths.next() {
        Some(path) => path,
        None => {
            usage(&argv[0]);
            exit(2);
        }
    };
    Args {
        hardware,
        requested: paths.next(),
        features,
        serve,
    }
}

fn usage(program: &str) {
    println!("MLME configuration negotiator");
    println!();
    println!("Usage:");
    println!("  {} <hardware.json> [requested.json] [OPTIONS]", program);
    println!();
    println!("Options:");
    println!("  --no-11ax   Build the store without HE items");
    println!("  --no-fils   Build the store without FILS items");
    println!("  --no-oce    Build the store without OCE items");
    println!("  --serve     Keep running and serve /devices over HTTP");
    println!("              (port from MLME_CFG_PORT, default {})", DEFAULT_INSPECT_PORT);
    println!("  --help      Show this help");
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(DeviceRegistry::new());
    let device = registry.create(DEVICE_ID, args.features)?;

    if let Some(path) = &args.requested {
        let report = loader::apply_json(device.store(), &std::fs::read_to_string(path)?)?;
        info!("Applied {} requested value(s) from {}", report.applied, path);
        for (item, e) in &report.rejected {
            warn!("Ignored {}: {}", item, e);
        }
    }

    let snapshot = HardwareCapabilitySnapshot::from_json(&std::fs::read_to_string(&args.hardware)?)?;
    let report = registry.report_hardware_capabilities(DEVICE_ID, &snapshot)?;
    for change in &report.changes {
        println!(
            "{}.{}: {} -> {}",
            change.group,
            change.item,
            change.requested.to_json(),
            change.effective.to_json()
        );
    }
    println!("{}", serde_json::to_string_pretty(&device.store().to_json())?);

    if !args.serve {
        return Ok(());
    }

    let port = match std::env::var("MLME_CFG_PORT") {
        Ok(value) => value.parse()?,
        Err(_) => DEFAULT_INSPECT_PORT,
    };
    let _server = InspectServer::start(None, port, registry.clone())?;
    info!("Serving device {} at http://localhost:{}/devices/{}", DEVICE_ID, port, DEVICE_ID);
    loop {
        std::thread::sleep(Duration::from_secs(60));
    }
}
