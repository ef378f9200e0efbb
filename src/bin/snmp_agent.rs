//! snmp-agent: demo SNMP v1/v2c agent serving the MIB-II system group.
//!
//! Try it with:
//!
//! ```text
//! snmp-agent --bind 127.0.0.1:11161
//! snmpwalk -v2c -c public 127.0.0.1:11161 1.3.6.1.2.1.1
//! snmpset -v2c -c private 127.0.0.1:11161 1.3.6.1.2.1.1.6.0 s "rack 4"
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use clap::Parser;
use snmp_agent_core::prelude::*;
use snmp_agent_core::{Counters, OidRegistry};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Net-SNMP's Linux sysObjectID, used as a neutral placeholder.
const SYS_OBJECT_ID: &str = "1.3.6.1.4.1.8072.3.2.10";

/// Serve the MIB-II system group over SNMP v1/v2c.
#[derive(Debug, Parser)]
#[command(name = "snmp-agent", version, about)]
struct Args {
    /// JSON configuration file; command-line flags override its values.
    #[arg(short = 'C', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// UDP address to listen on.
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Read-only community.
    #[arg(short = 'c', long, value_name = "COMMUNITY")]
    read_community: Option<String>,

    /// Read-write community.
    #[arg(short = 'w', long, value_name = "COMMUNITY")]
    write_community: Option<String>,

    /// sysDescr.0 value.
    #[arg(long, default_value = "snmp-agent-core demo agent")]
    descr: String,

    /// sysContact.0 value.
    #[arg(long, default_value = "")]
    contact: String,

    /// sysName.0 value.
    #[arg(long, default_value = "Agent")]
    name: String,

    /// Initial sysLocation.0 value (writable).
    #[arg(long, default_value = "")]
    location: String,

    /// Enable debug logging (snmp_agent_core=debug).
    #[arg(short = 'd', long)]
    debug: bool,

    /// Enable trace logging (snmp_agent_core=trace).
    #[arg(short = 'D', long = "trace")]
    trace: bool,
}

impl Args {
    fn init_tracing(&self) {
        let default = if self.trace {
            "snmp_agent_core=trace,snmp_agent=trace"
        } else if self.debug {
            "snmp_agent_core=debug,snmp_agent=debug"
        } else {
            "snmp_agent_core=info,snmp_agent=info"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    fn load_config(&self) -> Result<AgentConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
                    target: None,
                    source,
                })?;
                serde_json::from_str(&text).map_err(|e| {
                    Error::Config(format!("{}: {}", path.display(), e).into())
                })?
            }
            None => AgentConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(c) = &self.read_community {
            config.read_community = c.clone();
        }
        if let Some(c) = &self.write_community {
            config.write_community = c.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Register the system group and the two packet counters, in ascending order.
fn system_registry(args: &Args, counters: Arc<Counters>) -> Result<OidRegistry> {
    let started = Instant::now();
    let descr = args.descr.clone();
    let contact = args.contact.clone();
    let name = args.name.clone();
    let location = Arc::new(Mutex::new(args.location.clone()));
    let object_id = Oid::parse(SYS_OBJECT_ID)?;

    let mut registry = OidRegistry::new();

    // sysDescr.0
    registry.insert("1.3.6.1.2.1.1.1.0", move |_, r| {
        let _ = r.send(descr.as_str());
    })?;
    // sysObjectID.0
    registry.insert("1.3.6.1.2.1.1.2.0", move |_, r| {
        let _ = r.send(object_id.clone());
    })?;
    // sysUpTime.0, TimeTicks wrap after ~497 days
    registry.insert("1.3.6.1.2.1.1.3.0", move |_, r| {
        let ticks = (started.elapsed().as_millis() / 10) as u32;
        let _ = r.send(Value::TimeTicks(ticks));
    })?;
    // sysContact.0
    registry.insert("1.3.6.1.2.1.1.4.0", move |_, r| {
        let _ = r.send(contact.as_str());
    })?;
    // sysName.0
    registry.insert("1.3.6.1.2.1.1.5.0", move |_, r| {
        let _ = r.send(name.as_str());
    })?;
    // sysLocation.0
    let current = Arc::clone(&location);
    registry.insert("1.3.6.1.2.1.1.6.0", move |_, r| {
        let _ = match current.lock() {
            Ok(text) => r.send(text.as_str()),
            Err(_) => r.reject(ErrorStatus::GenErr),
        };
    })?;
    registry.add_write_action("1.3.6.1.2.1.1.6.0", move |ctx, r| {
        let new_value = match ctx.set_value() {
            Some(Ok(Value::OctetString(bytes))) => String::from_utf8(bytes.to_vec()).ok(),
            _ => None,
        };
        let _ = match (new_value, location.lock()) {
            (Some(text), Ok(mut stored)) => {
                tracing::info!(target: "snmp_agent", { location = %text }, "sysLocation changed");
                *stored = text;
                r.send(stored.as_str())
            }
            (None, _) => r.reject(ErrorStatus::BadValue),
            (_, Err(_)) => r.reject(ErrorStatus::GenErr),
        };
    })?;
    // sysServices.0: applications + end-to-end
    registry.insert("1.3.6.1.2.1.1.7.0", |_, r| {
        let _ = r.send(Value::Integer(72));
    })?;
    // snmpInPkts.0
    let inbound = Arc::clone(&counters);
    registry.insert("1.3.6.1.2.1.11.1.0", move |_, r| {
        let _ = r.send(Value::Counter32(inbound.packets_received()));
    })?;
    // snmpOutPkts.0
    registry.insert("1.3.6.1.2.1.11.2.0", move |_, r| {
        let _ = r.send(Value::Counter32(counters.packets_sent()));
    })?;

    for entry in registry.iter() {
        tracing::trace!(target: "snmp_agent", { oid = %entry.oid(), writable = entry.is_writable() }, "registered");
    }
    Ok(registry)
}

async fn run(args: Args) -> Result<()> {
    let config = args.load_config()?;
    let builder = config.agent_builder();
    let registry = system_registry(&args, builder.counters())?;
    let agent = builder.registry(registry).build()?;
    let listener = UdpListener::from_config(&config).await?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    listener.run(&agent, cancel).await?;
    tracing::info!(
        target: "snmp_agent",
        { received = agent.counters().packets_received(), sent = agent.counters().packets_sent() },
        "stopped"
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.init_tracing();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
