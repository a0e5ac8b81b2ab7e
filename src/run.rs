//! Command dispatch for the `blockless` binary.
//!
//! - Loads `.env` variables.
//! - Installs the log subscriber (stderr).
//! - Reads the configuration and the persisted merchant state.
//! - Runs one command and prints its output to stdout.

use blockless_deeplink::{TransferRequest, WalletDeeplink, WalletRegistry};
use blockless_types::codec::{
    OrderDataError, decode_from_url_param, order_link, order_param_from_query,
};
use blockless_types::intent::{SwapIntent, SwapParams};
use blockless_types::networks::network_by_name;
use blockless_types::order::Order;
use blockless_types::tokens::find_token;
use blockless_types::util::FiatAmount;
use blockless_types::validation::validate_amount;
use clap::Parser;
use dotenvy::dotenv;
use serde::Serialize;
use serde_json::json;

use crate::cli::{CliArgs, Command, DeeplinksArgs, MerchantCommand, OrderCommand, SwapCommand};
use crate::config::Config;
use crate::state::{AppError, AppState, PaymentSpec};
use crate::telemetry::init_logging;

/// Shown when an order has nothing the payer could send.
pub const NO_PAYMENT_METHOD: &str = "no valid payment method";

/// Runs the command given on the command line.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env variables
    dotenv().ok();
    init_logging();

    let args = CliArgs::parse();
    let config = Config::load(args.config.as_deref())?;
    tracing::info!(
        base_url = %config.base_url(),
        data_dir = %config.data_dir().display(),
        "Config loaded"
    );

    let mut state = AppState::load(config)?;
    let output = execute(&mut state, args.command)?;
    println!("{output}");
    Ok(())
}

/// Runs one command against the state and returns what should be printed.
pub fn execute(state: &mut AppState, command: Command) -> Result<String, AppError> {
    match command {
        Command::Swap(SwapCommand::Encode { dst, src }) => swap_encode(state, &dst, src.as_deref()),
        Command::Swap(SwapCommand::Decode { input }) => swap_decode(&input),
        Command::Order(OrderCommand::Create {
            fiat,
            currency,
            pay,
            session,
        }) => order_create(state, &fiat, currency.as_deref(), &pay, session),
        Command::Order(OrderCommand::Show { input, session }) => {
            order_show(state, input.as_deref(), session.as_deref())
        }
        Command::Merchant(command) => merchant(state, command),
        Command::Deeplinks(args) => deeplinks(&args),
    }
}

/// The query part of a URL, or the input itself if it has none.
fn query_part(input: &str) -> &str {
    let input = input.trim();
    let input = input.split_once('#').map_or(input, |(before, _)| before);
    input.split_once('?').map_or(input, |(_, query)| query)
}

fn swap_encode(state: &AppState, dst: &[String], src: Option<&str>) -> Result<String, AppError> {
    let dst = dst
        .iter()
        .map(|leg| SwapIntent::parse(leg))
        .collect::<Result<Vec<_>, _>>()?;
    let src = src.map(SwapIntent::parse).transpose()?;
    let params = SwapParams { dst, src };
    Ok(state.config().absolute(&params.to_path())?.to_string())
}

fn swap_decode(input: &str) -> Result<String, AppError> {
    let params = SwapParams::from_query(query_part(input))?;
    Ok(serde_json::to_string_pretty(&params)?)
}

fn order_create(
    state: &AppState,
    fiat: &str,
    currency: Option<&str>,
    pay: &[String],
    session: bool,
) -> Result<String, AppError> {
    let fiat_amount = FiatAmount::parse(fiat)?;
    let payments = pay
        .iter()
        .map(|p| p.parse::<PaymentSpec>())
        .collect::<Result<Vec<_>, _>>()?;
    let order = state.build_order(fiat_amount, currency, &payments)?;
    if order.swap_url.is_none() {
        tracing::warn!("Order has no token that can be swapped into");
    }
    let serialized = order.to_serialized();
    if session {
        return Ok(state.store().save_session_order(&serialized)?);
    }
    let link = order_link(&serialized, state.config().order_query_key())?;
    Ok(state.config().absolute(&link)?.to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OptionView<'a> {
    chain: &'a str,
    symbol: &'a str,
    amount: String,
    source: String,
    deeplinks: Vec<WalletDeeplink>,
}

fn order_show(
    state: &AppState,
    input: Option<&str>,
    session: Option<&str>,
) -> Result<String, AppError> {
    let serialized = match (session, input) {
        (Some(id), _) => state.store().load_session_order(id)?,
        (None, Some(input)) => match order_param_from_query(query_part(input)) {
            Some(param) => decode_from_url_param(&param)?,
            None => decode_from_url_param(input)?,
        },
        (None, None) => return Err(OrderDataError::MissingParam.into()),
    };
    let order = Order::rehydrate(&serialized);
    let registry = WalletRegistry::default_wallets();
    let options = order.payment_options();
    let views: Vec<OptionView<'_>> = options
        .iter()
        .map(|option| OptionView {
            chain: &option.chain.name,
            symbol: &option.token.symbol,
            amount: option.amount.to_string(),
            source: option.token.source.to_string(),
            deeplinks: TransferRequest::from_option(option)
                .map(|request| registry.applicable_wallets(&request))
                .unwrap_or_default(),
        })
        .collect();

    let link = order_link(&serialized, state.config().order_query_key())?;
    let swap_url = order
        .swap_url
        .as_deref()
        .map(|path| state.config().absolute(path))
        .transpose()?;
    let status = if views.is_empty() {
        NO_PAYMENT_METHOD
    } else {
        "payable"
    };
    let view = json!({
        "status": status,
        "order": &order,
        "orderLink": state.config().absolute(&link)?.to_string(),
        "swapUrl": swap_url.map(|u| u.to_string()),
        "paymentOptions": views,
    });
    Ok(serde_json::to_string_pretty(&view)?)
}

fn merchant(state: &mut AppState, command: MerchantCommand) -> Result<String, AppError> {
    match command {
        MerchantCommand::Show => {}
        MerchantCommand::Currency { code } => {
            state.set_currency(&code)?;
            state.save()?;
        }
        MerchantCommand::Chain {
            name,
            address,
            tokens,
        } => {
            state.upsert_chain(&name, &address, &tokens)?;
            state.save()?;
        }
        MerchantCommand::RemoveChain { name } => {
            state.remove_chain(&name)?;
            state.save()?;
        }
    }
    Ok(serde_json::to_string_pretty(state.merchant())?)
}

fn deeplinks(args: &DeeplinksArgs) -> Result<String, AppError> {
    let network =
        network_by_name(&args.chain).ok_or_else(|| AppError::UnknownNetwork(args.chain.clone()))?;
    let token = find_token(network, &args.token)
        .ok_or_else(|| AppError::UnknownToken {
            network: network.name.to_string(),
            symbol: args.token.clone(),
        })?
        .into_metadata();
    let amount = validate_amount(args.amount.trim())?;
    let request = TransferRequest {
        network,
        token: &token,
        amount: &amount,
        recipient: args.to.trim(),
    };
    let links = WalletRegistry::default_wallets().applicable_wallets(&request);
    if links.is_empty() {
        return Err(AppError::NoDeeplinks {
            network: network.name.to_string(),
            symbol: token.symbol.clone(),
        });
    }
    Ok(links
        .iter()
        .map(|link| format!("{}: {}", link.name, link.uri))
        .collect::<Vec<_>>()
        .join("\n"))
}
