use std::process::Command as BaseCommand;
use std::env;
use clap::Command;

#[macro_use]
extern crate log;
extern crate env_logger;
extern crate ureq;

mod commands {
  pub(crate) mod metrics;
  pub(crate) mod server;
}

mod metrics {
  pub(crate) mod collector;
  pub(crate) mod error;
  pub(crate) mod provider;
}

mod cloud {
  pub(crate) mod error;
  pub(crate) mod hetzner;
  pub(crate) mod traffic;
}

mod api;

mod config {
    pub(crate) mod api;
    pub(crate) mod cloud;
    pub(crate) mod config;
    pub(crate) mod metrics;
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let app = Command::new("hostmon")
        .version("0.1.0")
        .author("Mlanawo Mbechezi <mlanawo.mbechezi@kemeter.io>")
        .about("Host metrics exporter sidecar")
        .subcommand(
            Command::new("server")
                .args_conflicts_with_subcommands(true)
                .flatten_help(true)
                .subcommand(
                    commands::server::command_config(),
                )
        )
        .subcommand(
            Command::new("metrics")
                .args_conflicts_with_subcommands(true)
                .flatten_help(true)
                .subcommand(
                    commands::metrics::get::command_config(),
                )
        );

    let matches = app.get_matches();
    let config = config::config::load_config();

    match matches.subcommand() {
        Some(("server", sub_matches)) => {
            let server_command = sub_matches.subcommand().unwrap_or(("start", sub_matches));
            match server_command {
                ("start", sub_matches) => {
                    commands::server::execute(
                        sub_matches,
                        config,
                    ).await
                }
                _ => {}
            }
        }
        Some(("metrics", sub_matches)) => {
            let metrics_command = sub_matches.subcommand().unwrap_or(("get", sub_matches));
            match metrics_command {
                ("get", sub_matches) => {
                    commands::metrics::get::execute(
                        sub_matches,
                        config,
                    );
                }
                _ => {}
            }
        }

        _ => {
            let process_args: Vec<String> = env::args().collect();
            let process_name = process_args[0].as_str().to_owned();

            let mut subprocess = BaseCommand::new(process_name.as_str())
                .arg("--help")
                .spawn()
                .expect("failed to execute process");

            subprocess
                .wait()
                .expect("failed to wait for process");
        }
    }
}
