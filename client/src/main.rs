// ./nat-detect --server stun.ekiga.net:3478

use log::{debug, error};
use std::net::IpAddr;
use std::process;

use clap::builder::ValueParser;
use clap::{Arg, Command};
use nat_detect::{discovery_with, ClientConfig, NatType, DEFAULT_SERVER_ADDR};

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

fn parse_ip(s: &str) -> Result<IpAddr, String> {
    let ip = match s.parse::<IpAddr>() {
        Ok(v) => v,
        Err(e) => {
            return Err(format!("{}", e));
        }
    };
    // 不能是 0.0.0.0
    if ip.is_unspecified() {
        return Err(format!("{} not allow", ip));
    }

    Ok(ip)
}

fn parse_server(s: &str) -> Result<String, String> {
    // host:port, 解析留到运行时
    match s.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(s.to_string()),
        _ => Err(format!("{} is not host:port", s)),
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let app = Command::new(APP_NAME)
        .version(APP_VERSION)
        .about("a stun client for probing nat type (rfc 3489)")
        .arg(
            Arg::new("server")
                .long("server")
                .takes_value(true)
                .default_value(DEFAULT_SERVER_ADDR)
                .help("stun server address, host:port")
                .value_parser(ValueParser::new(parse_server)),
        )
        .arg(
            Arg::new("local_ip")
                .long("local_ip")
                .takes_value(true)
                .help("local ip, picked from the route to the server if absent")
                .value_parser(ValueParser::new(parse_ip)),
        )
        .get_matches();

    let server: &String = app.get_one("server").expect("wrong server address");
    let config = ClientConfig {
        local_ip: app.get_one::<IpAddr>("local_ip").copied(),
        ..Default::default()
    };
    debug!("server: {}, local_ip: {:?}", server, config.local_ip);

    match discovery_with(server, &config).await {
        Ok(nat_type) => {
            println!("{}", nat_type);
        }
        Err(e) => {
            error!("error, {}", e);
            println!("{}: {}", NatType::from(&e), e);
            process::exit(1);
        }
    }
}
