use std::io::BufRead;
use std::thread;
use std::time::Duration;

use tick_tcp::ClientConfig;
use tick_tcp::Error;
use tick_tcp::Result;
use tick_tcp::TcpClient;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

// ~60 fps host loop
const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    init_observability();

    let mut args = std::env::args().skip(1);
    let (host, port) = match (args.next(), args.next()) {
        (Some(host), Some(port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|e| Error::Fatal(format!("invalid port {port}: {e}")))?;
            (host, port)
        }
        _ => {
            eprintln!("usage: tick-tcp <address> <port>");
            std::process::exit(2);
        }
    };

    let config = ClientConfig::new()?.validate()?;
    let mut client = TcpClient::builder().set_config(config).build()?;
    client.on_message_received(|message| println!("<< {message}"));
    client.on_connection_failed(|reason| eprintln!("!! connection failed: {reason}"));

    client.connect(&host, port);
    info!("Application started. Type lines to send, EOF to quit.");

    let mut lines = spawn_stdin_reader();
    loop {
        loop {
            match lines.try_recv() {
                Ok(line) => client.send(&line),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Deliver whatever arrived during the last frame
                    client.tick();
                    println!("Exiting program.");
                    return Ok(());
                }
            }
        }
        client.tick();
        thread::sleep(FRAME);
    }
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(std::result::Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn init_observability() {
    let base_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(base_subscriber).init();
}
