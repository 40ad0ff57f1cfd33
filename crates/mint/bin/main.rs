//! The `basemint` CLI: stats, free mints, and paid mints for the drop.

use alloy_network::EthereumWallet;
use alloy_primitives::{
    Address, U256,
    utils::{format_ether, format_units},
};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use basemint::{
    ContractReads, MintClient, MintConfig, MintDropClient, MintEvent, MintMode, Minter,
    SessionHandle, TxSummary,
};
use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr, ensure};
use figment::{
    Metadata, Profile,
    value::{Dict, Map},
};
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "basemint", version, about = "Mint client for the basemint drop on Base")]
struct BasemintArgs {
    #[command(subcommand)]
    cmd: BasemintSubcommand,

    #[command(flatten)]
    connection: ConnectionOpts,
}

#[derive(Debug, Subcommand)]
enum BasemintSubcommand {
    /// Print the drop's stats: mint price, total supply and the caller's
    /// balance.
    #[command(visible_alias = "s")]
    Stats,

    /// Submit a free mint and wait for its confirmation.
    #[command(visible_alias = "f")]
    Free {
        /// The number of tokens to mint.
        #[arg(default_value = "1")]
        quantity: u32,

        #[command(flatten)]
        tx: TxOpts,
    },

    /// Submit a paid mint at the on-chain unit price and wait for its
    /// confirmation.
    #[command(visible_alias = "p")]
    Paid {
        /// The number of tokens to mint.
        #[arg(default_value = "1")]
        quantity: u32,

        #[command(flatten)]
        tx: TxOpts,
    },
}

#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Connection options")]
struct ConnectionOpts {
    /// The RPC endpoint to read and submit through.
    #[arg(long, env = "ETH_RPC_URL", global = true)]
    rpc_url: Option<String>,

    /// The EIP-155 chain id the drop is deployed on.
    #[arg(long, env = "CHAIN", global = true)]
    chain_id: Option<u64>,

    /// The drop contract's address.
    #[arg(long, global = true)]
    contract: Option<Address>,

    /// The private key to sign mints with.
    #[arg(long, env = "PRIVATE_KEY", global = true)]
    private_key: Option<String>,
}

// Make the CLI flags a `Figment` provider so they merge over the config file
// and environment.
impl figment::Provider for ConnectionOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("ConnectionOpts")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = Dict::new();
        if let Some(rpc_url) = &self.rpc_url {
            dict.insert("rpc_url".into(), rpc_url.clone().into());
        }
        if let Some(chain_id) = self.chain_id {
            dict.insert("chain_id".into(), chain_id.into());
        }
        if let Some(contract) = self.contract {
            dict.insert("contract".into(), contract.to_string().into());
        }
        Ok(Map::from([(Profile::Default, dict)]))
    }
}

#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Transaction options")]
struct TxOpts {
    /// The number of confirmations until the mint counts as confirmed.
    #[arg(long)]
    confirmations: Option<u64>,

    /// The maximum time to wait for the receipt, in seconds.
    #[arg(long, env = "TRANSACTION_TIMEOUT")]
    timeout: Option<u64>,
}

impl figment::Provider for TxOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("TxOpts")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = Dict::new();
        if let Some(confirmations) = self.confirmations {
            dict.insert("confirmations".into(), confirmations.into());
        }
        if let Some(timeout) = self.timeout {
            dict.insert("tx_timeout".into(), timeout.into());
        }
        Ok(Map::from([(Profile::Default, dict)]))
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let _ = dotenvy::dotenv();
    subscriber();
    let args = BasemintArgs::parse();

    let mut figment = MintConfig::figment().merge(args.connection.clone());
    if let BasemintSubcommand::Free { tx, .. } | BasemintSubcommand::Paid { tx, .. } = &args.cmd {
        figment = figment.merge(tx.clone());
    }
    let config: MintConfig = figment.extract()?;

    let url: Url = config
        .rpc_url
        .parse()
        .wrap_err_with(|| format!("invalid rpc url: {}", config.rpc_url))?;
    let signer = args
        .connection
        .private_key
        .as_deref()
        .map(|key| key.trim().parse::<PrivateKeySigner>().wrap_err("invalid private key"))
        .transpose()?;

    let session = SessionHandle::new();
    let provider = match &signer {
        Some(signer) => {
            session.connecting();
            ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect_http(url)
                .erased()
        }
        None => ProviderBuilder::new().connect_http(url).erased(),
    };

    match provider.get_chain_id().await {
        Ok(id) if id != config.chain_id => warn!(
            expected = config.chain_id,
            actual = id,
            "the rpc endpoint disagrees with the configured chain id"
        ),
        Ok(_) => {}
        Err(err) => warn!(%err, "could not query the endpoint's chain id"),
    }

    if let Some(signer) = &signer {
        session.connect(signer.address(), config.chain_id);
    }

    let client = MintDropClient::new(provider, config.contract)
        .with_confirmations(config.confirmations)
        .with_timeout(Duration::from_secs(config.tx_timeout));
    let minter = Minter::new(client, session, &config);

    match args.cmd {
        BasemintSubcommand::Stats => {
            let reads = minter.stats().await;
            print_stats(&reads);
            Ok(())
        }
        BasemintSubcommand::Free { quantity, .. } => mint(&minter, MintMode::Free, quantity).await,
        BasemintSubcommand::Paid { quantity, .. } => mint(&minter, MintMode::Paid, quantity).await,
    }
}

async fn mint<C: MintClient>(minter: &Minter<C>, mode: MintMode, quantity: u32) -> Result<()> {
    ensure!(
        minter.session().is_connected(),
        "a private key is required to mint; set PRIVATE_KEY or pass --private-key"
    );

    let mut events = minter.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let done = matches!(
                event,
                MintEvent::Confirmed { .. }
                    | MintEvent::Failed { .. }
                    | MintEvent::Rejected { .. }
            );
            print_event(&event);
            if done {
                break;
            }
        }
    });

    minter.set_quantity(mode, quantity);
    let outcome = minter.mint(mode).await;

    // The printer stops on a terminal event; precondition failures never
    // produce one.
    if outcome.is_ok() || outcome.as_ref().is_err_and(|err| !err.is_precondition()) {
        printer.await?;
    } else {
        printer.abort();
    }

    let summary = outcome?;
    print_summary(&summary)?;
    println!();
    print_stats(&minter.reads());
    Ok(())
}

fn print_event(event: &MintEvent) {
    match event {
        MintEvent::Submitting { request, value } => {
            if value.is_zero() {
                println!("Submitting {} mint of {}...", request.mode, request.quantity);
            } else {
                println!(
                    "Submitting {} mint of {} for {} ETH...",
                    request.mode,
                    request.quantity,
                    format_ether(*value)
                );
            }
        }
        MintEvent::Submitted { hash, .. } => println!("Transaction submitted: {hash}"),
        MintEvent::Rejected { reason, .. } => println!("Submission rejected: {reason}"),
        MintEvent::Confirmed { .. } => println!("Transaction confirmed!"),
        MintEvent::Failed { hash, reason, .. } => println!("Transaction {hash} failed: {reason}"),
        MintEvent::ReadsRefreshed(_) => {}
    }
}

fn print_summary(summary: &TxSummary) -> Result<()> {
    let gas_price = U256::from(summary.effective_gas_price);
    let paid = format_ether(gas_price.saturating_mul(U256::from(summary.gas_used)));
    let gas_price = format_units(gas_price, 9)?;

    println!("\nHash: {}", summary.hash);
    match summary.block_number {
        Some(block) => println!("Block: {block}"),
        None => println!("Block: pending"),
    }
    println!("Paid: {paid} ETH ({} gas * {gas_price} gwei)", summary.gas_used);
    Ok(())
}

fn print_stats(reads: &ContractReads) {
    let price = reads
        .mint_price
        .map_or_else(|| "---".into(), |price| format!("{} ETH", format_ether(price)));
    println!("Mint price:   {price}");
    println!("Total minted: {}", or_unknown(reads.total_supply));
    println!("Your balance: {}", or_unknown(reads.caller_balance));
}

fn or_unknown(value: Option<U256>) -> String {
    value.map_or_else(|| "---".into(), |value| value.to_string())
}

fn subscriber() {
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}
