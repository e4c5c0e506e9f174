//! Application shell: session, tab navigation and the four screens.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    client::{
        rpc_client::{JsonRpcClient, Provider},
        wallet::{Wallet, WalletEvent},
    },
    config::Config,
    error::{ConnectionError, ProviderError},
    links::{BUTTON_HEAD, BUTTON_TAIL, Explorer, short_address},
    screens::{
        Services, dashboard::Dashboard, governance::GovernanceScreen, nfts::NftsScreen,
        tokens::TokensScreen,
    },
    session::{Session, SessionProvider},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Tokens,
    Nfts,
    Governance,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Tokens, Tab::Nfts, Tab::Governance];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Tokens => "Tokens",
            Tab::Nfts => "Build Proofs",
            Tab::Governance => "Governance",
        }
    }
}

/// What the shell should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Replaces every screen while no wallet is connected.
    ConnectPrompt,
    Screen(Tab),
}

pub struct BuilderHub {
    config: Config,
    sessions: SessionProvider,
    wallet: Arc<dyn Wallet>,
    tab: Tab,
    pub dashboard: Dashboard,
    pub tokens: TokensScreen,
    pub nfts: NftsScreen,
    pub governance: GovernanceScreen,
}

impl BuilderHub {
    /// Wires the screens to a JSON-RPC provider built from `config`.
    pub fn new(config: Config, wallet: Arc<dyn Wallet>) -> Result<Self, ProviderError> {
        let provider = Arc::new(JsonRpcClient::from_config(&config)?);
        Ok(Self::with_provider(config, wallet, provider))
    }

    pub fn with_provider(
        config: Config,
        wallet: Arc<dyn Wallet>,
        provider: Arc<dyn Provider>,
    ) -> Self {
        let sessions = SessionProvider::from_config(&config);
        let services = Services {
            provider,
            wallet: Arc::clone(&wallet),
            session: sessions.handle(),
            policy: config.receipt,
            explorer: Explorer::from_config(&config),
        };

        info!(rpc_url = %config.rpc_url, chain = %config.chain, "BuilderHub initialised");

        Self {
            dashboard: Dashboard::new(&services),
            tokens: TokensScreen::new(&services),
            nfts: NftsScreen::new(&services),
            governance: GovernanceScreen::new(&services),
            config,
            sessions,
            wallet,
            tab: Tab::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> Session {
        self.sessions.current()
    }

    pub async fn connect(&self) -> Result<Session, ConnectionError> {
        self.sessions.connect(self.wallet.as_ref()).await
    }

    pub async fn disconnect(&self) {
        self.sessions.disconnect(self.wallet.as_ref()).await;
    }

    pub fn handle_wallet_event(&self, event: WalletEvent) {
        self.sessions.handle_event(event);
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Switching tabs never waits on reads or writes.
    pub fn select_tab(&mut self, tab: Tab) {
        debug!(tab = tab.title(), "Selecting tab");
        self.tab = tab;
    }

    pub fn view(&self) -> View {
        if self.sessions.current().is_connected() {
            View::Screen(self.tab)
        } else {
            View::ConnectPrompt
        }
    }

    pub fn wallet_button_label(&self) -> String {
        let session = self.sessions.current();
        match session.account {
            Some(account) if session.is_connected() => {
                short_address(account, BUTTON_HEAD, BUTTON_TAIL)
            }
            _ => "Connect Wallet".to_string(),
        }
    }

    /// Subscribes every read to session changes. Abort the handles to stop.
    pub fn bind(&self) -> Vec<JoinHandle<()>> {
        let mut tasks = self.dashboard.bind();
        tasks.extend(self.tokens.bind());
        tasks.extend(self.nfts.bind());
        tasks.extend(self.governance.bind());
        tasks
    }

    /// Issues every screen's reads once, concurrently.
    pub async fn refresh(&self) {
        tokio::join!(
            self.dashboard.refresh(),
            self.tokens.refresh(),
            self.nfts.refresh(),
            self.governance.refresh(),
        );
    }
}
