use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    #[arg(short, long, default_value = "/ws")]
    pub ws_path: String,

    // Repeatable; an empty list accepts any origin.
    #[arg(short, long = "allow-origin")]
    pub allow_origins: Vec<String>,

    // "0s" disables the per-connection read deadline.
    #[arg(short, long, default_value = "60s", value_parser = humantime::parse_duration)]
    pub read_timeout: Duration,
}

impl Args {
    pub fn read_deadline(&self) -> Option<Duration> {
        if self.read_timeout.is_zero() {
            None
        } else {
            Some(self.read_timeout)
        }
    }
}
