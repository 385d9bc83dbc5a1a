//! Generic per-service action proxy.

use soap_client::{ActionParams, ActionResponse, SoapClient};

use crate::error::Result;
use crate::service::{merge_params, Service};

/// Binds one service on one device to the SOAP invoker.
///
/// Every call merges the service's implicit defaults under the supplied
/// parameters and performs a single SOAP exchange. No business logic lives
/// here; failures propagate unchanged from the invoker.
#[derive(Debug, Clone)]
pub struct ServiceProxy {
    service: Service,
    host: String,
    port: u16,
    client: SoapClient,
}

impl ServiceProxy {
    pub(crate) fn new(service: Service, host: String, port: u16, client: SoapClient) -> Self {
        Self {
            service,
            host,
            port,
            client,
        }
    }

    /// The service this proxy addresses.
    pub fn service(&self) -> Service {
        self.service
    }

    /// Invoke a named action with the given parameters.
    pub fn action(&self, action: &str, params: ActionParams) -> Result<ActionResponse> {
        let info = self.service.info();
        let merged = merge_params(&self.service.default_params(), &params);
        self.client
            .call(
                &self.host,
                self.port,
                info.control_path,
                info.service_uri,
                action,
                &merged,
            )
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn proxy_for(server: &mockito::ServerGuard, service: Service) -> ServiceProxy {
        let host_with_port = server.host_with_port();
        let (host, port) = host_with_port.split_once(':').unwrap();
        ServiceProxy::new(
            service,
            host.to_string(),
            port.parse().unwrap(),
            SoapClient::new(),
        )
    }

    #[test]
    fn action_merges_service_defaults_into_the_request() {
        let mut server = mockito::Server::new();

        let mock = server
            .mock("POST", "/MediaRenderer/RenderingControl/Control")
            .match_body(mockito::Matcher::Regex(
                "<InstanceID>0</InstanceID><Channel>Master</Channel><DesiredVolume>25</DesiredVolume>"
                    .to_string(),
            ))
            .with_status(200)
            .with_body(
                r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
                    <s:Body><u:SetVolumeResponse xmlns:u="urn:schemas-upnp-org:service:RenderingControl:1"/></s:Body>
                </s:Envelope>"#,
            )
            .create();

        let proxy = proxy_for(&server, Service::RenderingControl);
        proxy
            .action(
                "SetVolume",
                ActionParams::new().with("DesiredVolume", "25"),
            )
            .unwrap();

        mock.assert();
    }

    #[test]
    fn failures_propagate_from_the_invoker() {
        let mut server = mockito::Server::new();
        server.mock("POST", "/MediaRenderer/AVTransport/Control")
            .with_status(503)
            .create();

        let proxy = proxy_for(&server, Service::AVTransport);
        let result = proxy.action("Play", ActionParams::new().with("Speed", "1"));

        assert!(matches!(result, Err(ApiError::Status(503))));
    }
}
