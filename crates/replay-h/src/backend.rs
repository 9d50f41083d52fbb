use crate::cdp::CdpClient;
use crate::inject::call_bridge;
use async_trait::async_trait;
use replay_bridge::BridgeRequest;
use replay_engine::backend::{
    Backend, BackendError, ElementHandle, HighlightStyle, NavigationResult,
};
use replay_engine::selector::Selector;
use tracing::info;

/// Chromium driven over CDP, headless unless asked otherwise.
pub struct HeadlessBackend {
    client: Option<CdpClient>,
    visible: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::new_with_visibility(false)
    }

    pub fn new_with_visibility(visible: bool) -> Self {
        Self {
            client: None,
            visible,
        }
    }

    pub fn get_client(&self) -> Option<&CdpClient> {
        self.client.as_ref()
    }

    fn page(&self) -> Result<&chromiumoxide::Page, BackendError> {
        self.client
            .as_ref()
            .map(|client| &client.page)
            .ok_or(BackendError::NotReady)
    }

    async fn bridge(&self, request: BridgeRequest) -> Result<Option<ElementHandle>, BackendError> {
        let response = call_bridge(self.page()?, &request).await?;
        response.into_result(&request)
    }

    async fn get_navigation_result(
        page: &chromiumoxide::Page,
    ) -> Result<NavigationResult, BackendError> {
        let title = page
            .get_title()
            .await
            .unwrap_or_default()
            .unwrap_or_default();
        let url = page
            .url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?
            .unwrap_or_default();
        Ok(NavigationResult {
            url,
            title,
            status: 200,
        })
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for HeadlessBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!("Launching Headless Backend (Chromium)...");
        let client = CdpClient::launch(self.visible)
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
        self.page()?
            .url()
            .await
            .map_err(|e| BackendError::Other(format!("Failed to read location: {}", e)))?
            .ok_or_else(|| BackendError::Other("Page has no location".into()))
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let page = self.page()?;

        info!("Navigating to: {}", url);
        page.goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        Self::get_navigation_result(page).await
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
