//! Chromium session over the DevTools protocol.

use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;

type CdpResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub struct CdpClient {
    pub browser: Browser,
    pub page: Page,
    handler_task: JoinHandle<()>,
    profile: Profile,
}

/// Chromium user-data dir; throwaway unless REPLAY_USER_DATA_DIR pins one.
struct Profile {
    dir: PathBuf,
    temporary: bool,
}

impl CdpClient {
    pub async fn launch(visible: bool) -> CdpResult<Self> {
        let profile = Profile::resolve()?;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .user_data_dir(&profile.dir);
        if visible {
            tracing::info!("Launching Chromium with a visible window");
            builder = builder.with_head();
        } else {
            tracing::info!("Launching headless Chromium");
        }
        if let Ok(chrome_bin) = std::env::var("CHROME_BIN") {
            tracing::info!("Using Chrome binary from CHROME_BIN: {}", chrome_bin);
            builder = builder.chrome_executable(chrome_bin);
        }
        let config = builder
            .build()
            .map_err(|e| format!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| format!("Failed to launch browser: {}", e))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::error!("Browser handler error (ignoring): {}", e);
                }
            }
            tracing::debug!("Browser handler task ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| format!("Failed to create page: {}", e))?;

        forward_console(&page).await?;
        accept_dialogs(&page).await?;

        Ok(Self {
            browser,
            page,
            handler_task,
            profile,
        })
    }

    pub async fn close(mut self) -> CdpResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| format!("Error closing browser: {}", e))?;
        self.handler_task
            .await
            .map_err(|e| format!("Error awaiting handler: {}", e))?;
        self.profile.cleanup();
        Ok(())
    }
}

async fn forward_console(page: &Page) -> CdpResult<()> {
    let mut events = page
        .event_listener::<EventConsoleApiCalled>()
        .await
        .map_err(|e| format!("Failed to subscribe to console events: {}", e))?;

    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let args: Vec<String> = event
                .args
                .iter()
                .map(|arg| arg.description.clone().unwrap_or_else(|| "unknown".into()))
                .collect();
            tracing::debug!("Browser console [{:?}]: {}", event.r#type, args.join(" "));
        }
    });
    Ok(())
}

/// A blocking alert/confirm/prompt would stall every evaluation, so accept them all.
async fn accept_dialogs(page: &Page) -> CdpResult<()> {
    let mut events = page
        .event_listener::<EventJavascriptDialogOpening>()
        .await
        .map_err(|e| format!("Failed to subscribe to dialog events: {}", e))?;

    let page = page.clone();
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            tracing::info!(
                "Accepting JavaScript dialog: {} ({:?})",
                event.message,
                event.r#type
            );
            if let Err(e) = page.execute(HandleJavaScriptDialogParams::new(true)).await {
                tracing::error!("Failed to accept dialog: {}", e);
            }
        }
    });
    Ok(())
}

impl Profile {
    fn resolve() -> CdpResult<Self> {
        if let Ok(dir) = std::env::var("REPLAY_USER_DATA_DIR") {
            let dir = PathBuf::from(dir);
            std::fs::create_dir_all(&dir)?;
            tracing::info!("Using user data dir from REPLAY_USER_DATA_DIR: {}", dir.display());
            return Ok(Self {
                dir,
                temporary: false,
            });
        }

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| format!("System clock error: {}", e))?
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "replay-chromium-profile-{}-{}",
            std::process::id(),
            nanos
        ));
        std::fs::create_dir_all(&dir)?;
        tracing::debug!("Using isolated user data dir: {}", dir.display());
        Ok(Self {
            dir,
            temporary: true,
        })
    }

    fn cleanup(&self) {
        if self.temporary
            && let Err(e) = std::fs::remove_dir_all(&self.dir)
        {
            tracing::debug!("Failed to clean up user-data-dir {}: {}", self.dir.display(), e);
        }
    }
}
