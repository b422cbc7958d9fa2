use crate::{
    BrokerError, Config, ForecastRecord,
    broker::{remote::RemoteDataBroker, server::ServerDataBroker},
    store::ForecastStore,
};
use async_trait::async_trait;
use std::{
    convert::TryFrom,
    fmt::Debug,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use url::{Host, Url};
use uuid::Uuid;

pub mod remote;
pub mod server;

/// Which broker implementation to wire in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrokerKind {
    /// In-process store.
    Local,
    /// Another forecast API reached over HTTP.
    Remote,
}

impl BrokerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrokerKind::Local => "local",
            BrokerKind::Remote => "remote",
        }
    }

    pub const fn all() -> &'static [BrokerKind] {
        &[BrokerKind::Local, BrokerKind::Remote]
    }
}

impl std::fmt::Display for BrokerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BrokerKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "local" => Ok(BrokerKind::Local),
            "remote" => Ok(BrokerKind::Remote),
            _ => Err(anyhow::anyhow!(
                "Unknown broker '{value}'. Supported brokers: local, remote."
            )),
        }
    }
}

/// Uniform access to forecasts, wherever they live.
///
/// `Ok(false)` means the operation was understood and declined;
/// `Err` means the broker could not complete it at all.
#[async_trait]
pub trait DataBroker: Send + Sync + Debug {
    async fn add(&self, record: ForecastRecord) -> Result<bool, BrokerError>;

    async fn delete(&self, id: Uuid) -> Result<bool, BrokerError>;

    async fn list(&self) -> Result<Vec<ForecastRecord>, BrokerError>;
}

/// Construct a broker of the given kind.
///
/// `store` backs the local broker and is ignored for the remote one.
pub fn broker_from_config(
    kind: BrokerKind,
    config: &Config,
    store: Arc<ForecastStore>,
) -> anyhow::Result<Arc<dyn DataBroker>> {
    let broker: Arc<dyn DataBroker> = match kind {
        BrokerKind::Local => Arc::new(ServerDataBroker::new(store)),
        BrokerKind::Remote => {
            let base_url = config.remote.base_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!(
                    "No remote base URL configured for the '{kind}' broker.\n\
                     Hint: run `forecast configure` or pass `--upstream <url>`."
                )
            })?;
            let remote = RemoteDataBroker::new(base_url)?;

            let bind_addr = config.bind_addr()?;
            if targets_addr(remote.base_url(), bind_addr) {
                return Err(anyhow::anyhow!(
                    "Remote base URL '{base_url}' points at this server's own address {bind_addr}.\n\
                     Hint: pass `--upstream <url>` for a different API, or use the local broker."
                ));
            }

            Arc::new(remote)
        }
    };

    Ok(broker)
}

/// Whether `url` would reach a server listening on `addr`.
///
/// Loopback names match a loopback or wildcard bind.
fn targets_addr(url: &Url, addr: SocketAddr) -> bool {
    if url.port_or_known_default() != Some(addr.port()) {
        return false;
    }

    let bound_locally = addr.ip().is_loopback() || addr.ip().is_unspecified();
    let ip = match url.host() {
        Some(Host::Ipv4(ip)) => IpAddr::V4(ip),
        Some(Host::Ipv6(ip)) => IpAddr::V6(ip),
        Some(Host::Domain(name)) => return bound_locally && name.eq_ignore_ascii_case("localhost"),
        None => return false,
    };

    ip == addr.ip() || (bound_locally && ip.is_loopback())
}
