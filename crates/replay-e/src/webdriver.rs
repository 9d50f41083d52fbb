use fantoccini::{Client, ClientBuilder};

pub struct WebDriverClient {
    pub client: Client,
}

impl WebDriverClient {
    /// Open a W3C session at `url`, merging any extra capabilities.
    pub async fn connect(
        url: &str,
        capabilities: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let caps = capabilities.unwrap_or_default();

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(url)
            .await
            .map_err(|e| format!("Failed to connect to WebDriver at {}: {}", url, e))?;

        Ok(Self { client })
    }

    /// Evaluate `script` as a function body; `arguments[0..]` are `args`.
    pub async fn execute(
        &self,
        script: &str,
        args: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, fantoccini::error::CmdError> {
        self.client.execute(script, args).await
    }

    pub async fn close(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.client
            .close()
            .await
            .map_err(|e| format!("Failed to close session: {}", e))?;
        Ok(())
    }
}
