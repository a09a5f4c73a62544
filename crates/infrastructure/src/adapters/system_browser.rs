//! Desktop browser adapter.
//!
//! Opens portals with the platform URL opener and posts signouts to the
//! in-process signout channel.

use async_trait::async_trait;
use crossportal_application::ports::{BrowserError, PortalBrowser, redact_url};
use crossportal_domain::CrossPortalMessage;
use tokio::process::Command;
use tracing::debug;
use url::Url;

use super::SignoutChannel;

/// Program and leading arguments used to open a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    program: String,
    args: Vec<String>,
}

impl Launcher {
    /// A launcher running `program args.. <url>`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The platform's default URL opener.
    #[must_use]
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("open", Vec::new())
        } else if cfg!(target_os = "windows") {
            Self::windows_protocol_handler()
        } else {
            Self::new("xdg-open", Vec::new())
        }
    }

    /// The Windows URL protocol handler. No shell sits in between, so the
    /// `&` separating query pairs reaches the browser intact.
    fn windows_protocol_handler() -> Self {
        Self::new("rundll32.exe", vec!["url.dll,FileProtocolHandler".to_string()])
    }

    /// Builds the command that opens `url`.
    fn command(&self, url: &Url) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(url.as_str());
        command
    }
}

/// Portal browser for desktop processes.
#[derive(Debug, Clone)]
pub struct SystemBrowser {
    launcher: Launcher,
    channel: SignoutChannel,
}

impl SystemBrowser {
    /// Creates a browser using the platform opener.
    #[must_use]
    pub fn new(channel: SignoutChannel) -> Self {
        Self::with_launcher(Launcher::platform_default(), channel)
    }

    /// Creates a browser with a custom launcher.
    #[must_use]
    pub const fn with_launcher(launcher: Launcher, channel: SignoutChannel) -> Self {
        Self { launcher, channel }
    }

    /// The signout channel this browser posts to.
    #[must_use]
    pub const fn channel(&self) -> &SignoutChannel {
        &self.channel
    }
}

#[async_trait]
impl PortalBrowser for SystemBrowser {
    async fn open_remote_session(&self, url: &Url) -> Result<(), BrowserError> {
        let launch_error = |message: String| BrowserError::Launch {
            url: redact_url(url),
            message,
        };

        let status = self
            .launcher
            .command(url)
            .status()
            .await
            .map_err(|e| launch_error(e.to_string()))?;

        if !status.success() {
            return Err(launch_error(format!("{} exited with {status}", self.launcher.program)));
        }
        Ok(())
    }

    async fn broadcast_local_signout(
        &self,
        message: &CrossPortalMessage,
    ) -> Result<(), BrowserError> {
        let delivered = self.channel.post(message.clone());
        debug!(delivered, portal = %message.portal(), "Posted signout");
        Ok(())
    }
}
