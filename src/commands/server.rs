use clap::{ArgMatches, Command};

use crate::api::server as api_server;
use crate::config::config::Config;

pub(crate) fn command_config() -> Command {
    Command::new("start")
        .about("Start the metrics exporter")
}

pub(crate) async fn execute(_args: &ArgMatches, configuration: Config) {
    info!("Start server");

    api_server::start(configuration).await;
}
