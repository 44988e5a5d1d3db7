use arix::SceneConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = arix::run(SceneConfig::new().with_env_overrides()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
