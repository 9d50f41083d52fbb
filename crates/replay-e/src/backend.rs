use crate::webdriver::WebDriverClient;
use async_trait::async_trait;
use replay_bridge::{BRIDGE_CHECK, BRIDGE_JS, BridgeRequest, BridgeResponse};
use replay_engine::backend::{
    Backend, BackendError, ElementHandle, HighlightStyle, NavigationResult,
};
use replay_engine::selector::Selector;
use std::time::Duration;
use tracing::{debug, info, warn};

const MAX_BRIDGE_ATTEMPTS: u32 = 3;
const BRIDGE_RETRY_DELAY: Duration = Duration::from_millis(200);

const PROCESS_SCRIPT: &str = "return window.__replayBridge.process(arguments[0]);";

/// Any W3C WebDriver endpoint (chromedriver, geckodriver, WPEWebDriver, ...).
pub struct WebDriverBackend {
    client: Option<WebDriverClient>,
    webdriver_url: String,
    capabilities: Option<serde_json::Map<String, serde_json::Value>>,
}

impl WebDriverBackend {
    pub fn with_url(webdriver_url: impl Into<String>) -> Self {
        Self {
            client: None,
            webdriver_url: webdriver_url.into(),
            capabilities: None,
        }
    }

    /// Extra session capabilities, e.g. `goog:chromeOptions`.
    pub fn with_capabilities(
        mut self,
        capabilities: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    async fn get_navigation_result(
        client: &WebDriverClient,
    ) -> Result<NavigationResult, BackendError> {
        let title = client.client.title().await.unwrap_or_default();
        let url = client
            .client
            .current_url()
            .await
            .map(|u| u.to_string())
            .unwrap_or_default();

        Ok(NavigationResult {
            url,
            title,
            status: 200,
        })
    }

    async fn bridge(&self, request: BridgeRequest) -> Result<Option<ElementHandle>, BackendError> {
        let client = self.client.as_ref().ok_or(BackendError::NotReady)?;
        let args = vec![serde_json::to_value(&request)?];

        let mut last_error = None;
        for attempt in 1..=MAX_BRIDGE_ATTEMPTS {
            if attempt > 1 {
                warn!("Retrying {} (attempt {})...", request.op(), attempt);
                tokio::time::sleep(BRIDGE_RETRY_DELAY).await;
            }

            let injected = match client.execute(&format!("return {};", BRIDGE_CHECK), vec![]).await {
                Ok(value) => value.as_bool().unwrap_or(false),
                Err(_) => false,
            };
            if !injected {
                debug!("Injecting replay bridge");
                if let Err(e) = client.execute(BRIDGE_JS, vec![]).await {
                    last_error = Some(BackendError::Bridge(format!(
                        "Failed to inject bridge: {}",
                        e
                    )));
                    continue;
                }
            }

            match client.execute(PROCESS_SCRIPT, args.clone()).await {
                // The document went away under us; a click that navigates does this.
                Ok(serde_json::Value::Null) => {
                    if matches!(request, BridgeRequest::Click { .. }) {
                        debug!("Bridge returned null after click, assuming navigation");
                        return Ok(None);
                    }
                    last_error = Some(BackendError::Bridge(format!(
                        "{} returned null",
                        request.op()
                    )));
                }
                Ok(value) => {
                    return BridgeResponse::from_value(value)?.into_result(&request);
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if err_msg.contains("undefined is not an object")
                        || err_msg.contains("__replayBridge is undefined")
                        || err_msg.contains("Cannot read properties of undefined")
                    {
                        last_error = Some(BackendError::Bridge(err_msg));
                        continue;
                    }
                    return Err(BackendError::Script(format!(
                        "{} failed: {}",
                        request.op(),
                        err_msg
                    )));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            BackendError::Bridge(format!("{} failed after maximum retries", request.op()))
        }))
    }
}

#[async_trait]
impl Backend for WebDriverBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!("Connecting to WebDriver at {}...", self.webdriver_url);
        let client = WebDriverClient::connect(&self.webdriver_url, self.capabilities.clone())
            .await
            .map_err(|e| BackendError::Other(e.to_string()))?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| BackendError::Other(e.to_string()))?;
        }
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn current_url(&mut self) -> Result<String, BackendError> {
        let client = self.client.as_ref().ok_or(BackendError::NotReady)?;
        client
            .client
            .current_url()
            .await
            .map(|u| u.to_string())
            .map_err(|e| BackendError::Other(format!("Failed to read location: {}", e)))
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let client = self.client.as_ref().ok_or(BackendError::NotReady)?;

        info!("Navigating to: {}", url);
        client
            .client
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        Self::get_navigation_result(client).await
    }

    async fn query(&mut self, selector: &Selector) -> Result<Option<ElementHandle>, BackendError> {
        self.bridge(BridgeRequest::query(selector)).await
    }

    async fn click(&mut self, element: ElementHandle) -> Result<(), BackendError> {
        self.bridge(BridgeRequest::Click { handle: element.0 })
            .await
            .map(drop)
    }

    async fn focus(&mut self, element: ElementHandle) -> Result<(), BackendError> {
        self.bridge(BridgeRequest::Focus { handle: element.0 })
            .await
            .map(drop)
    }

    async fn set_value(
        &mut self,
        element: ElementHandle,
        value: &str,
    ) -> Result<(), BackendError> {
        self.bridge(BridgeRequest::SetValue {
            handle: element.0,
            value: value.to_string(),
        })
        .await
        .map(drop)
    }

    async fn dispatch_key(&mut self, key: &str) -> Result<(), BackendError> {
        self.bridge(BridgeRequest::DispatchKey {
            key: key.to_string(),
        })
        .await
        .map(drop)
    }

    async fn highlight(
        &mut self,
        element: ElementHandle,
        style: &HighlightStyle,
    ) -> Result<(), BackendError> {
        self.bridge(BridgeRequest::highlight(element, style))
            .await
            .map(drop)
    }
}
