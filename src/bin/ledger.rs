use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use clap::{Parser, Subcommand};
use maud::Markup;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use ledger_view::{
    AccountId, ActiveAccount, AppRefresh, ClientConfig, Collaborators, ConfirmDialog, Error,
    HttpAccountApi, HttpTransactionApi, PageAction, PageRoot, RenderOptions, TransactionId,
    TransactionsView, page,
};

/// Show or edit the transactions of an account in the finance tracker.
///
/// The resulting page is printed to stdout as HTML, logs go to stderr.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the finance tracker API.
    #[arg(long, env = "LEDGER_API_URL", default_value = "http://localhost:8000/")]
    api_url: String,

    /// The canonical timezone to display dates in, e.g. "Europe/Moscow".
    #[arg(long, env = "LEDGER_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the transactions page of an account.
    Show { account_id: String },
    /// Delete one transaction of an account and print the refreshed page.
    RemoveTransaction {
        account_id: String,
        transaction_id: String,
    },
    /// Delete an account.
    RemoveAccount { account_id: String },
}

impl Command {
    fn account_id(&self) -> AccountId {
        match self {
            Command::Show { account_id }
            | Command::RemoveTransaction { account_id, .. }
            | Command::RemoveAccount { account_id } => AccountId::from(account_id.as_str()),
        }
    }
}

/// Asks for confirmation on stderr and reads the answer from stdin.
struct TerminalDialog;

impl ConfirmDialog for TerminalDialog {
    fn confirm(&self, message: &str) -> bool {
        eprint!("{message} [y/N] ");
        if let Err(error) = io::stderr().flush() {
            tracing::warn!("Could not flush prompt: {error}");
        }

        let mut answer = String::new();
        if let Err(error) = io::stdin().lock().read_line(&mut answer) {
            tracing::error!("Could not read answer: {error}");
            return false;
        }

        matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes" | "д" | "да"
        )
    }
}

/// The account given on the command line stands in for the sidebar selection.
struct SelectedAccount(AccountId);

impl ActiveAccount for SelectedAccount {
    fn active_account_id(&self) -> Option<AccountId> {
        Some(self.0.clone())
    }
}

/// Remembers that a refresh was requested so the page can be rendered again
/// once the current action has finished.
#[derive(Default)]
struct RefreshRequest(AtomicBool);

impl RefreshRequest {
    fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

impl AppRefresh for RefreshRequest {
    fn update(&self) {
        tracing::debug!("Refresh requested");
        self.0.store(true, Ordering::SeqCst);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    match run(args).await {
        Ok(markup) => {
            println!("{}", markup.into_string());
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<Markup, Error> {
    let config = ClientConfig::new(&args.api_url, &args.timezone)?;
    let client = config.request_client()?;
    let account_id = args.command.account_id();
    let refresh = Arc::new(RefreshRequest::default());

    let collaborators = Collaborators {
        accounts: Arc::new(HttpAccountApi::new(client.clone())),
        transactions: Arc::new(HttpTransactionApi::new(client)),
        app: refresh.clone(),
        dialog: Arc::new(TerminalDialog),
        active_account: Arc::new(SelectedAccount(account_id.clone())),
    };

    let view = TransactionsView::new(Some(PageRoot::default()), collaborators)?
        .with_local_offset(config.local_offset());

    let action = match args.command {
        Command::Show { .. } => None,
        Command::RemoveTransaction { transaction_id, .. } => Some(PageAction::RemoveTransaction(
            TransactionId::from(transaction_id),
        )),
        Command::RemoveAccount { .. } => Some(PageAction::RemoveAccount),
    };

    let rendered = view.render(Some(RenderOptions::new(account_id))).await;

    match (rendered, &action) {
        (Err(error), None) => return Err(error),
        // The page stays bound to the account even if it could not be
        // displayed, so the delete can go ahead.
        (Err(error), Some(_)) => {
            tracing::warn!("Could not display account before deleting: {error}");
        }
        (Ok(()), _) => {}
    }

    if let Some(action) = action {
        let removal = view.handle(action).await?;
        tracing::info!("Delete finished: {removal:?}");
    }

    if refresh.take()
        && let Err(error) = view.update().await
    {
        tracing::warn!("Could not refresh page: {error}");
    }

    let root = view.root()?;
    Ok(page(root.title(), &root.html()))
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(filter),
        )
        .init();
}
