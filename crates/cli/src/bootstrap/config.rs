use ferrous_route_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        dns_port = config.server.dns_port,
        bind = %config.server.bind_address,
        upstreams = config.upstream.servers.server_count(),
        aliases = config.aliases.len(),
        routes = config.routes.len(),
        fallback = config.fallback.as_str(),
        "Configuration loaded"
    );

    Ok(config)
}
