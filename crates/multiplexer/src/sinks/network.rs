//! NetworkSink - UDP fire-and-forget row streaming

use contracts::{Layout, Row, RowSink, TableError};
use std::collections::HashMap;
use std::net::{SocketAddr, UdpSocket};
use tracing::{debug, error, instrument, trace};

use super::keyed::KeyedRow;

/// Configuration for NetworkSink
#[derive(Debug, Clone)]
pub struct NetworkSinkConfig {
    /// Target address
    pub addr: SocketAddr,
    /// Max datagram payload (UDP typically 65507 for IPv4)
    pub max_packet_size: usize,
}

impl NetworkSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let addr_str = params
            .get("addr")
            .ok_or_else(|| "missing 'addr' parameter".to_string())?;

        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|e| format!("invalid address '{}': {}", addr_str, e))?;

        let max_packet_size = match params.get("max_packet_size") {
            Some(s) => s
                .parse()
                .map_err(|e| format!("invalid max_packet_size '{}': {}", s, e))?,
            None => 65000,
        };

        Ok(Self {
            addr,
            max_packet_size,
        })
    }
}

/// Sink that sends each row as a JSON datagram
pub struct NetworkSink {
    name: String,
    layout: Layout,
    config: NetworkSinkConfig,
    socket: Option<UdpSocket>,
}

impl NetworkSink {
    /// Create a new NetworkSink
    #[instrument(name = "network_sink_new", skip(name, layout, config))]
    pub fn new(
        name: impl Into<String>,
        layout: Layout,
        config: NetworkSinkConfig,
    ) -> std::io::Result<Self> {
        let name = name.into();
        // Bind to any available port of the target's address family
        let bind_addr: SocketAddr = if config.addr.is_ipv4() {
            ([0u8; 4], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(config.addr)?;

        debug!(
            sink = %name,
            target = %config.addr,
            "NetworkSink connected"
        );

        Ok(Self {
            name,
            layout,
            config,
            socket: Some(socket),
        })
    }

    /// Create from params (for factory)
    pub fn from_params(
        name: impl Into<String>,
        layout: Layout,
        params: &HashMap<String, String>,
    ) -> Result<Self, TableError> {
        let name = name.into();
        let config = NetworkSinkConfig::from_params(params)
            .map_err(|e| TableError::config_validation(format!("sinks[{}].params", name), e))?;

        Self::new(name.clone(), layout, config).map_err(|e| TableError::SinkConnection {
            sink_name: name,
            message: e.to_string(),
        })
    }

    fn socket(&self) -> Result<&UdpSocket, TableError> {
        self.socket
            .as_ref()
            .ok_or_else(|| TableError::sink_closed(&self.name))
    }

    fn prepare_payload(&self, row: &Row) -> Result<Vec<u8>, TableError> {
        let data = serde_json::to_vec(&KeyedRow {
            layout: &self.layout,
            row,
        })
        .map_err(|e| TableError::sink_write(&self.name, format!("json error: {}", e)))?;

        if data.len() > self.config.max_packet_size {
            return Err(TableError::sink_write(
                &self.name,
                format!(
                    "row payload of {} bytes exceeds max_packet_size {}",
                    data.len(),
                    self.config.max_packet_size
                ),
            ));
        }

        Ok(data)
    }

    fn transmit(&self, socket: &UdpSocket, data: &[u8]) {
        match socket.send(data) {
            Ok(sent) => {
                trace!(sink = %self.name, bytes = sent, "Sent");
            }
            Err(e) => {
                // Log but don't fail - UDP is best-effort
                error!(sink = %self.name, error = %e, "UDP send failed");
            }
        }
    }
}

impl RowSink for NetworkSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn write_row(&mut self, row: &Row) -> Result<(), TableError> {
        let socket = self.socket()?;
        self.layout.check_row(&self.name, row)?;
        let data = self.prepare_payload(row)?;
        self.transmit(socket, &data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TableError> {
        // UDP doesn't buffer
        self.socket().map(|_| ())
    }

    #[instrument(name = "network_sink_close", skip(self), fields(sink = %self.name))]
    fn close(&mut self) -> Result<(), TableError> {
        self.socket
            .take()
            .ok_or_else(|| TableError::sink_closed(&self.name))?;
        debug!(sink = %self.name, "NetworkSink closed");
        Ok(())
    }
}
