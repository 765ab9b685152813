use tracing_subscriber::EnvFilter;

pub fn setup(env_filter: &str) {
    tracing_subscriber::fmt()
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_env_filter(EnvFilter::new(env_filter))
        .compact()
        .init();
}
