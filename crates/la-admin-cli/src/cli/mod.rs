//! Command dispatch and the root controller shared by every screen.

pub mod args;
pub mod commands;
pub mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use la_admin_core::AdminError;
use la_admin_core::http::{AbortHandle, AbortSignal, RequestClient, RequestError};
use la_admin_core::session::{FileStore, SessionGuard, SessionState, SystemClock};
use secrecy::SecretString;

use crate::config::ResolvedConfig;
use args::{AuthorityCommands, Commands};

/// Root controller: owns the session and the abort handle every screen's
/// requests listen to.
pub struct App {
    config: ResolvedConfig,
    session: SessionGuard,
    session_path: PathBuf,
    abort: AbortHandle,
}

impl App {
    /// Builds the controller and derives the session from disk.
    pub fn new(config: ResolvedConfig, session_path: PathBuf) -> Self {
        let store = Arc::new(FileStore::new(session_path.clone()));
        let session = SessionGuard::new(store, Arc::new(SystemClock));
        session.initialize();

        Self {
            config,
            session,
            session_path,
            abort: AbortHandle::new(),
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    pub fn session_path(&self) -> &PathBuf {
        &self.session_path
    }

    pub fn signal(&self) -> AbortSignal {
        self.abort.signal()
    }

    /// Cancels every in-flight request.
    pub fn abort(&self) {
        self.abort.abort();
    }

    /// Gate for protected screens.
    pub fn require_session(&self) -> Result<SecretString> {
        match (self.session.state(), self.session.token()) {
            (SessionState::Authenticated { .. }, Some(token)) => Ok(token),
            _ => bail!("{}. Run 'la-admin login' first.", AdminError::NotAuthenticated),
        }
    }

    /// Creates the request client for one screen.
    pub fn client(&self) -> Result<RequestClient> {
        let token = self.require_session()?;
        Ok(RequestClient::new(&self.config.server)
            .with_timeout(self.config.timeout)
            .with_bearer_token(&token))
    }
}

/// Run a command, aborting in-flight requests on Ctrl-C.
pub async fn run_command(app: &App, command: Commands) -> Result<()> {
    let Some(command) = prepare(app, command)? else {
        return Ok(());
    };

    let work = dispatch(app, command);
    tokio::pin!(work);

    tokio::select! {
        result = &mut work => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::debug!("Interrupted, aborting requests");
            app.abort();
            work.await
        }
    }
}

/// Runs everything that reads from the terminal. This happens before the
/// Ctrl-C listener is installed, so Ctrl-C at a prompt still ends the
/// process. Returns the command left to dispatch, if any.
fn prepare(app: &App, command: Commands) -> Result<Option<Commands>> {
    match command {
        Commands::Login { token } => commands::session::login(app, token).map(|()| None),
        Commands::Logout => commands::session::logout(app).map(|()| None),
        Commands::Status => commands::session::status(app).map(|()| None),
        Commands::Authority(AuthorityCommands::Delete { id, yes }) => {
            if yes || commands::authority::confirm_delete(app, &id)? {
                Ok(Some(Commands::Authority(AuthorityCommands::Delete { id, yes: true })))
            } else {
                Ok(None)
            }
        }
        command => Ok(Some(command)),
    }
}

async fn dispatch(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Login { .. } | Commands::Logout | Commands::Status => {
            unreachable!("Session commands handled in prepare")
        }
        Commands::Dashboard => commands::dashboard::show(app).await,
        Commands::Authority(cmd) => commands::authority::handle_authority_command(app, cmd).await,
        Commands::User(cmd) => commands::user::handle_user_command(app, cmd).await,
        Commands::Payment(cmd) => commands::payment::handle_payment_command(app, cmd).await,
        Commands::Config(_) => unreachable!("Config commands handled in main.rs"),
    }
}

/// Turns an aborted request into a short message instead of an error chain.
pub fn describe(err: AdminError) -> anyhow::Error {
    match err.as_request() {
        Some(RequestError::Aborted) => anyhow::anyhow!("Interrupted"),
        _ => err.into(),
    }
}
