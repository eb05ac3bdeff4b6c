//! HTTP client for the relay device protocol.
//!
//! The device exposes two GET endpoints:
//! - `/get_output_status?format=1` -> `{"data": {"outputs": {"state": 0|1}}}`
//! - `/set_output?address=<relay>&state=<0|1>` -> 2xx on success
//!
//! Every request carries a timeout so a hung device cannot stall the caller
//! unboundedly.

use serde::Deserialize;
use tracing::debug;

use lampgate_core::config::RelayConfig;
use lampgate_core::ActuatorState;

use crate::error::RelayError;
use crate::RelayDevice;

#[derive(Debug, Deserialize)]
struct StatusResponse {
    data: StatusData,
}

#[derive(Debug, Deserialize)]
struct StatusData {
    outputs: OutputStatus,
}

#[derive(Debug, Deserialize)]
struct OutputStatus {
    state: u8,
}

/// Relay device client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    http: reqwest::Client,
    base_url: String,
    address: u8,
}

impl HttpRelayClient {
    /// Build a client from the relay section of the configuration.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| RelayError::DeviceUnreachable(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            address: config.address,
        })
    }
}

impl RelayDevice for HttpRelayClient {
    async fn get_state(&self) -> Result<ActuatorState, RelayError> {
        let url = format!("{}/get_output_status?format=1", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RelayError::DeviceUnreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RelayError::DeviceUnreachable(format!(
                "status request returned {}",
                response.status()
            )));
        }

        let body: StatusResponse = response
            .json()
            .await
            .map_err(|e| RelayError::Protocol(e.to_string()))?;

        let state = ActuatorState::from_wire(body.data.outputs.state).ok_or_else(|| {
            RelayError::Protocol(format!("unknown relay state {}", body.data.outputs.state))
        })?;

        debug!(state = %state, "Relay state read");
        Ok(state)
    }

    async fn set_state(&self, state: ActuatorState) -> Result<(), RelayError> {
        let url = format!(
            "{}/set_output?address={}&state={}",
            self.base_url,
            self.address,
            state.as_wire()
        );
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RelayError::DeviceUnreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RelayError::DeviceUnreachable(format!(
                "set request returned {}",
                response.status()
            )));
        }

        debug!(state = %state, "Relay state written");
        Ok(())
    }
}
