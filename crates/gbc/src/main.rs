use gbc::config::{RunConfig, USAGE};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let fps_override = std::env::var("GBC_FPS").ok();
    let config = match RunConfig::from_args(std::env::args().skip(1), fps_override.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err:#}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    log::info!("Playing ROM path: '{}'", config.rom_path.display());
    gbc::run(config)
}
