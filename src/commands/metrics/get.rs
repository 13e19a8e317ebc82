use clap::{ArgMatches, Command};
use cli_table::{print_stdout, Table, WithTitle};

use crate::api::dto::snapshot::SnapshotDto;
use crate::config::config::Config;

pub(crate) fn command_config() -> Command {
    Command::new("get")
        .about("Fetch the latest snapshot from a running exporter")
}

#[derive(Table)]
struct MetricTableItem {
    #[table(title = "Metric")]
    name: String,

    #[table(title = "Value")]
    value: String,
}

pub(crate) fn execute(_args: &ArgMatches, mut configuration: Config) {
    let api_url = configuration.get_api_url();

    let response = ureq::get(&api_url).call();

    match response {
        Ok(res) => {
            match res.into_json::<SnapshotDto>() {
                Ok(snapshot) => print_snapshot(snapshot),
                Err(err) => {
                    eprintln!("Failed to parse JSON: {}", err);
                }
            }
        }
        Err(err) => {
            eprintln!("Failed to fetch metrics: {}", err);
        }
    }
}

fn print_snapshot(snapshot: SnapshotDto) {
    let mut rows = vec![
        row("Hostname", snapshot.hostname.clone()),
        row("RAM usage", format!("{} %", snapshot.ram_usage_percent)),
        row("Swap usage", format!("{} %", snapshot.swap_usage_percent)),
        row("Disk usage", format!("{} %", snapshot.disk_usage_percent)),
        row("CPU usage", format!("{} %", snapshot.cpu_usage_percent)),
        row(
            "Load average",
            format!(
                "{:.2}, {:.2}, {:.2}",
                snapshot.load1, snapshot.load5, snapshot.load15
            ),
        ),
        row("Network in", format!("{} MB", snapshot.network_in)),
        row("Network out", format!("{} MB", snapshot.network_out)),
    ];

    rows.push(match snapshot.traffic_used_percent {
        Some(percentage) => row("Traffic quota used", format!("{} %", percentage)),
        None => row("Traffic quota used", "-".to_string()),
    });

    let _ = print_stdout(rows.with_title());
}

fn row(name: &str, value: String) -> MetricTableItem {
    MetricTableItem {
        name: name.to_string(),
        value,
    }
}
