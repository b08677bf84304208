//! # Swapdesk Console - Interactive Session Driver
//!
//! Line-oriented console over [`SessionController`]: one command per line,
//! `help` lists them. Mutating operations run on background tasks so the
//! console stays responsive while a transaction confirms; the operation gate
//! is what keeps a second operation from starting in the meantime.

use std::env;
use std::io::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use onchain::NodeWallet;
use swapdesk_session::config::{PairSymbols, SessionConfig};
use swapdesk_session::notify::LogNotifier;
use swapdesk_session::state::TokenSide;
use swapdesk_session::SessionController;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("🚀 Starting Swapdesk session console");

    let config = match env::var("SWAPDESK_CONFIG") {
        Ok(path) => SessionConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        Err(_) => SessionConfig::from_env(),
    };
    config.validate().context("invalid session configuration")?;

    let symbols = config.symbols();
    let wallet = NodeWallet::new(
        config.network.rpc_url.clone(),
        config.network.key_env.clone(),
        config.network.chain_id,
        config.pair_addresses()?,
        config.confirm_policy(),
    );
    let controller = Arc::new(SessionController::new(
        &config,
        Arc::new(wallet),
        Arc::new(LogNotifier),
    )?);

    info!(
        "✅ Console ready for pair {}/{} (exchange {})",
        symbols.base, symbols.quote, config.pair.exchange_address
    );
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("swapdesk> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.context("console input closed")? else {
            break;
        };
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let argument = parts.next().unwrap_or("");

        match command {
            "connect" => {
                if busy(&controller) {
                    continue;
                }
                match controller.connect().await {
                    Ok(account) => {
                        println!("connected as 0x{:x}", account);
                        print_state(&controller, &symbols);
                    }
                    Err(err) => error!("❌ Wallet connect failed: {}", err),
                }
            }
            "from" => {
                if busy(&controller) {
                    continue;
                }
                controller.set_source_amount(argument).await;
                print_swap_line(&controller, &symbols);
            }
            "flip" => {
                if busy(&controller) {
                    continue;
                }
                controller.flip_direction().await;
                print_swap_line(&controller, &symbols);
            }
            "base" => {
                if busy(&controller) {
                    continue;
                }
                controller.set_token_amount(TokenSide::Base, argument);
            }
            "quote" => {
                if busy(&controller) {
                    continue;
                }
                controller.set_token_amount(TokenSide::Quote, argument);
            }
            "share" => {
                if busy(&controller) {
                    continue;
                }
                controller.set_share_amount(argument);
            }
            "swap" => spawn_operation(&controller, |c| async move {
                let _ = c.swap().await;
            }),
            "add" => spawn_operation(&controller, |c| async move {
                let _ = c.add_liquidity().await;
            }),
            "remove" => spawn_operation(&controller, |c| async move {
                let _ = c.remove_liquidity().await;
            }),
            "balances" => {
                controller.refresh_snapshot().await;
                print_state(&controller, &symbols);
            }
            "state" => print_state(&controller, &symbols),
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("unknown command: {} (try help)", other),
        }
    }

    info!("Console session ended");
    Ok(())
}

/// True (after telling the user) when an operation is still in flight.
fn busy(controller: &SessionController) -> bool {
    if controller.in_flight() {
        println!(
            "an operation is still {:?}; wait for it to finish",
            controller.phase()
        );
        return true;
    }
    false
}

/// Run a mutating operation on a background task so the console keeps
/// accepting input while it confirms. Outcomes are reported through the
/// notifier, so the task itself has nothing left to print.
fn spawn_operation<F, Fut>(controller: &Arc<SessionController>, operation: F)
where
    F: FnOnce(Arc<SessionController>) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    if busy(controller) {
        return;
    }
    if controller.account().is_none() {
        println!("not connected (run: connect)");
        return;
    }
    tokio::spawn(operation(Arc::clone(controller)));
}

fn symbol_of(symbols: &PairSymbols, side: TokenSide) -> &str {
    match side {
        TokenSide::Base => &symbols.base,
        TokenSide::Quote => &symbols.quote,
    }
}

fn print_swap_line(controller: &SessionController, symbols: &PairSymbols) {
    let state = controller.state();
    let source = state.source_side();
    let destination = state.destination_side();
    println!(
        "swap     : [{}] {} -> [{}] {}",
        state.field(source).text(),
        symbol_of(symbols, source),
        state.field(destination).text(),
        symbol_of(symbols, destination),
    );
}

fn print_state(controller: &SessionController, symbols: &PairSymbols) {
    let state = controller.state();
    match state.account {
        Some(account) => println!("account  : 0x{:x}", account),
        None => println!("account  : not connected"),
    }
    println!(
        "balances : {} {} | {} {} | {} {}",
        state.balances.base,
        symbols.base,
        state.balances.quote,
        symbols.quote,
        state.balances.pool_share,
        symbols.share,
    );
    print_swap_line(controller, symbols);
    println!(
        "liquidity: add [{}] {} + [{}] {} | remove (burn) [{}] {}",
        state.base_amount.text(),
        symbols.base,
        state.quote_amount.text(),
        symbols.quote,
        state.share_amount.text(),
        symbols.share,
    );
}

fn print_help() {
    println!("commands:");
    println!("  connect          authorize a wallet session and load balances");
    println!("  from [amount]    set the swap source amount and re-quote (omit to clear)");
    println!("  flip             reverse the swap direction and re-quote");
    println!("  base [amount]    set the add-liquidity base amount");
    println!("  quote [amount]   set the add-liquidity quote amount");
    println!("  share [amount]   set the remove-liquidity share amount");
    println!("  swap             approve the source token, then swap");
    println!("  add              approve both tokens, then add liquidity");
    println!("  remove           remove liquidity (burns shares, no approval)");
    println!("  balances         reload the balance snapshot");
    println!("  state            show account, balances, and amount fields");
    println!("  help             show this list");
    println!("  quit             exit");
}
