//! Interactive single-session wallet CLI.
//!
//! Prompts for a password (or a mnemonic plus a new password on first run),
//! then loops over a numbered menu. Menu errors are printed and the loop
//! continues; only quit, wipe and unrecoverable startup errors end the
//! process.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use rpc_http::HttpRpc;
use wallet_core::broadcast::sign_and_broadcast;
use wallet_core::builder::TransactionBuilder;
use wallet_core::{query, ChainInfo, FileStore, Wallet};

#[derive(Parser)]
#[command(name = "wallet", about = "Password-protected multi-chain signing wallet")]
struct Opts {
    /// Path of the wallet store file.
    #[arg(long, default_value = "local_wallet.json")]
    store: String,
}

fn default_chains() -> Vec<ChainInfo> {
    vec![
        ChainInfo {
            id: 1,
            rpc_url: "https://eth.llamarpc.com".into(),
            symbol: "ETH".into(),
            label: "Ethereum".into(),
        },
        ChainInfo {
            id: 11155111,
            rpc_url: "https://rpc.sepolia.org".into(),
            symbol: "ETH".into(),
            label: "Sepolia Testnet".into(),
        },
    ]
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    if let Err(e) = run(&opts).await {
        eprintln!("fatal: {e}");
        std::process::exit(1);
    }
}

async fn run(opts: &Opts) -> Result<(), String> {
    let store = Arc::new(FileStore::open(&opts.store));
    let mut wallet = Wallet::new(store);
    let rpc = HttpRpc::new();

    if wallet.is_initialized().map_err(stringify)? {
        let password = prompt("Wallet password: ")?;
        wallet.start(&password).map_err(stringify)?;
    } else {
        let mnemonic = prompt("Input mnemonic (leave blank to generate new): ")?;
        let password = prompt("Enter a new password for this wallet: ")?;
        let trimmed = mnemonic.trim();
        let supplied = if trimmed.is_empty() { None } else { Some(trimmed) };
        wallet
            .initialize(&default_chains(), &password, supplied)
            .map_err(stringify)?;
        println!("Wallet created.");
    }

    loop {
        match menu(&mut wallet, &rpc).await {
            Ok(MenuOutcome::Continue) => {}
            Ok(MenuOutcome::Quit) => return Ok(()),
            Err(e) => {
                warn!(error = %e, "menu action failed");
                println!("Error: {e}");
            }
        }
    }
}

enum MenuOutcome {
    Continue,
    Quit,
}

async fn menu(wallet: &mut Wallet, rpc: &HttpRpc) -> Result<MenuOutcome, String> {
    let address = wallet.address().map_err(stringify)?;
    let chain = wallet.chains().current().map_err(stringify)?;

    println!();
    println!("Address: {address}");
    println!("Chain:   {} (id {})", chain.label, chain.id);
    match query::native_balance(wallet, rpc).await {
        Ok(balance) => println!("{} balance: {balance} wei", chain.symbol),
        Err(e) => println!("{} balance unavailable: {e}", chain.symbol),
    }
    println!();
    println!("1 - Send {}", chain.symbol);
    println!("2 - Send token");
    println!("3 - Show mnemonic");
    println!("4 - Switch chain");
    println!("5 - Add chain");
    println!("6 - Edit derivation path");
    println!("7 - Delete wallet");
    println!("8 - Quit");

    match prompt(": ")?.trim() {
        "1" => send_native(wallet, rpc).await?,
        "2" => send_token(wallet, rpc).await?,
        "3" => println!("{}", wallet.reveal_mnemonic().map_err(stringify)?),
        "4" => switch_chain(wallet)?,
        "5" => add_chain(wallet)?,
        "6" => edit_path(wallet)?,
        "7" => {
            if prompt("Type 'yes' to delete this wallet: ")?.trim() == "yes" {
                wallet.wipe().map_err(stringify)?;
                println!("Wallet deleted.");
                return Ok(MenuOutcome::Quit);
            }
        }
        "8" => return Ok(MenuOutcome::Quit),
        _ => {}
    }
    Ok(MenuOutcome::Continue)
}

async fn send_native(wallet: &Wallet, rpc: &HttpRpc) -> Result<(), String> {
    let to = prompt("Destination address: ")?;
    let value = prompt_amount("Amount (wei): ")?;

    let tx = TransactionBuilder::new(wallet, rpc)
        .native_transfer(to.trim(), value)
        .await
        .map_err(stringify)?;
    let result = sign_and_broadcast(wallet, rpc, tx)
        .await
        .map_err(stringify)?;

    println!("txid: {}", result.txid);
    println!("Waiting for confirmation...");
    let txid = result.wait().await.map_err(stringify)?;
    println!("Confirmed: {txid}");
    Ok(())
}

async fn send_token(wallet: &Wallet, rpc: &HttpRpc) -> Result<(), String> {
    let token = prompt("Token contract address: ")?;
    let token = token.trim();

    let balance = query::token_balance(wallet, rpc, token)
        .await
        .map_err(stringify)?;
    println!("Token balance: {balance}");

    let to = prompt("Destination address: ")?;
    let amount = prompt_amount("Amount (base units): ")?;

    let tx = TransactionBuilder::new(wallet, rpc)
        .token_transfer(to.trim(), amount, token)
        .await
        .map_err(stringify)?;
    let result = sign_and_broadcast(wallet, rpc, tx)
        .await
        .map_err(stringify)?;

    println!("txid: {}", result.txid);
    println!("Waiting for confirmation...");
    let txid = result.wait().await.map_err(stringify)?;
    println!("Confirmed: {txid}");
    Ok(())
}

fn switch_chain(wallet: &Wallet) -> Result<(), String> {
    for chain in wallet.chains().list().map_err(stringify)? {
        println!("{:>10}  {} ({})", chain.id, chain.label, chain.rpc_url);
    }
    let id = prompt("Enter chain id: ")?
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("chain id: {e}"))?;
    wallet.chains().set_current(id).map_err(stringify)?;
    Ok(())
}

fn add_chain(wallet: &Wallet) -> Result<(), String> {
    let id = prompt("Chain id: ")?
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("chain id: {e}"))?;
    let label = prompt("Label: ")?.trim().to_owned();
    let symbol = prompt("Native symbol: ")?.trim().to_owned();
    let rpc_url = prompt("RPC url: ")?.trim().to_owned();

    wallet
        .chains()
        .upsert(ChainInfo {
            id,
            rpc_url,
            symbol,
            label,
        })
        .map_err(stringify)?;
    Ok(())
}

fn edit_path(wallet: &Wallet) -> Result<(), String> {
    println!("Current path: {}", wallet.bip44_path().map_err(stringify)?);
    let path = prompt("New path: ")?;
    let path = path.trim();
    if !path.is_empty() {
        wallet.set_bip44_path(path).map_err(stringify)?;
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String, String> {
    print!("{label}");
    io::stdout().flush().map_err(stringify)?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(stringify)?;
    Ok(line.trim_end_matches(['\n', '\r']).to_owned())
}

fn prompt_amount(label: &str) -> Result<u128, String> {
    prompt(label)?
        .trim()
        .parse::<u128>()
        .map_err(|e| format!("amount: {e}"))
}

fn stringify(e: impl std::fmt::Display) -> String {
    e.to_string()
}
