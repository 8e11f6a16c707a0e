use std::{process, time::Duration};

use clap::{Args, Parser, Subcommand};
use revaddr_core::{
	account::{self, parse_sender, Sender, SignatureSchema},
	client::{self, ClientConfig, NodeClient},
	watch::{wait_for_nonce_advance, WaitError},
	AccountPublicKey, ContractAddress, EthAddress, Nonce,
};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use tracing_indicatif::{span_ext::IndicatifSpanExt, style::ProgressStyle, IndicatifLayer};
use tracing_subscriber::{
	fmt::writer::MakeWriterExt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_URL: &str = "ws://127.0.0.1:9944";
const MAX_COUNT: u32 = 10_000;

#[derive(thiserror::Error, Debug)]
enum Error {
	#[error("account: {0}")]
	Account(#[from] account::Error),
	#[error("client: {0}")]
	Client(#[from] client::Error),
	#[error("watch: {0}")]
	Watch(#[from] WaitError<client::Error>),
	#[error("fetching the nonce needs an account key or ss58 address, not a bare eth address")]
	NonceNeedsAccount,
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
}

type Result<T, E = Error> = std::result::Result<T, E>;

/// Predict pallet-revive contract addresses
#[derive(Parser)]
#[clap(version)]
struct Opts {
	/// Print results as a JSON object
	#[clap(long, global = true)]
	json: bool,
	#[clap(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Print the 20-byte address an account is mapped to
	Eth {
		#[clap(flatten)]
		account: AccountOpts,
	},
	/// Print the addresses of the next contracts an account creates
	Contract {
		#[clap(flatten)]
		account: AccountOpts,
		/// Nonce to start from, read from the node when missing
		#[clap(long)]
		nonce: Option<Nonce>,
		/// How many consecutive nonces to print addresses for
		#[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=MAX_COUNT as i64))]
		count: u32,
		#[clap(long, default_value = DEFAULT_URL)]
		url: String,
	},
	/// Follow finalized blocks until the account nonce advances
	Watch {
		#[clap(flatten)]
		account: AccountOpts,
		#[clap(long, default_value = DEFAULT_URL)]
		url: String,
		/// Give up after this many finalized blocks
		#[clap(long, default_value_t = 64)]
		blocks: usize,
		/// Give up after this many seconds
		#[clap(long, default_value_t = 300)]
		timeout: u64,
	},
}

#[derive(Args)]
struct AccountOpts {
	/// 0x-prefixed public key or 20-byte address, ss58 address, or secret uri such as //Alice
	account: String,
	/// Key scheme used when the account is a secret uri
	#[clap(long, default_value_t = SignatureSchema::Sr25519)]
	scheme: SignatureSchema,
}

impl AccountOpts {
	fn sender(&self) -> Result<Sender> {
		Ok(parse_sender(&self.account, self.scheme)?)
	}
}

#[derive(Serialize)]
struct Predicted {
	nonce: String,
	address: ContractAddress,
	checksummed: String,
}

impl Predicted {
	fn new(sender: &EthAddress, nonce: &Nonce) -> Self {
		let address = sender.create1(nonce);
		Self {
			nonce: nonce.to_string(),
			checksummed: address.to_checksummed(),
			address,
		}
	}
}

/// Addresses of `count` contracts created from consecutive nonces.
fn predict(sender: &EthAddress, start: Nonce, count: u32) -> Vec<Predicted> {
	std::iter::successors(Some(start), |nonce| Some(nonce.next()))
		.take(count as usize)
		.map(|nonce| Predicted::new(sender, &nonce))
		.collect()
}

#[derive(Serialize)]
struct Report {
	#[serde(skip_serializing_if = "Option::is_none")]
	account: Option<AccountPublicKey>,
	eth_address: EthAddress,
	#[serde(skip_serializing_if = "Option::is_none")]
	block: Option<u32>,
	contracts: Vec<Predicted>,
}

impl Report {
	fn lines(&self) -> Vec<String> {
		let mut out = Vec::new();
		if let Some(account) = &self.account {
			out.push(format!("account {account}"));
		}
		out.push(format!("eth address {}", self.eth_address.to_checksummed()));
		if let Some(block) = self.block {
			out.push(format!("nonce advanced at block #{block}"));
		}
		for contract in &self.contracts {
			out.push(format!(
				"nonce {}: contract address {}",
				contract.nonce, contract.checksummed
			));
		}
		out
	}

	fn print(&self, json: bool) -> Result<()> {
		if json {
			println!("{}", serde_json::to_string_pretty(self)?);
		} else {
			for line in self.lines() {
				println!("{line}");
			}
		}
		Ok(())
	}
}

async fn connect(url: &str) -> Result<NodeClient> {
	let config = ClientConfig::from_env()?;
	let client = NodeClient::connect(url, &config).await?;
	info!("connected to {}", client.chain_name().await?);
	Ok(client)
}

async fn run(opts: Opts) -> Result<Report> {
	match opts.command {
		Command::Eth { account } => {
			let sender = account.sender()?;
			Ok(Report {
				account: sender.account().copied(),
				eth_address: sender.eth_address(),
				block: None,
				contracts: Vec::new(),
			})
		}
		Command::Contract {
			account,
			nonce,
			count,
			url,
		} => {
			let sender = account.sender()?;
			let eth_address = sender.eth_address();
			let nonce = match nonce {
				Some(nonce) => nonce,
				None => {
					let account = sender.account().ok_or(Error::NonceNeedsAccount)?;
					connect(&url).await?.next_nonce(account).await?
				}
			};
			Ok(Report {
				account: sender.account().copied(),
				contracts: predict(&eth_address, nonce, count),
				eth_address,
				block: None,
			})
		}
		Command::Watch {
			account,
			url,
			blocks,
			timeout,
		} => {
			let sender = account.sender()?;
			let key = sender.account().ok_or(Error::NonceNeedsAccount)?;
			let eth_address = sender.eth_address();
			let client = connect(&url).await?;
			let start = client.finalized_nonce(key).await?;
			info!("current nonce {start}, next contract at {}", eth_address.create1(&start));

			let span = info_span!("watch", indicatif.pb_show = true);
			span.pb_set_style(&ProgressStyle::default_spinner());
			span.pb_set_message(&format!("waiting for nonce {start} to be used"));

			let nonces = client.finalized_nonces(key).await?;
			let advance = wait_for_nonce_advance(nonces, start, blocks, Duration::from_secs(timeout))
				.instrument(span)
				.await?;
			let contracts = advance
				.created_addresses(&eth_address)
				.into_iter()
				.map(|(nonce, address)| Predicted {
					nonce: nonce.to_string(),
					checksummed: address.to_checksummed(),
					address,
				})
				.collect();
			Ok(Report {
				account: Some(*key),
				eth_address,
				block: Some(advance.block),
				contracts,
			})
		}
	}
}

fn init_tracing() {
	let indicatif_layer = IndicatifLayer::new();
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(
			tracing_subscriber::fmt::layer().without_time().with_writer(
				indicatif_layer
					.get_stderr_writer()
					.with_max_level(tracing::Level::INFO),
			),
		)
		.with(indicatif_layer)
		.init();
}

#[tokio::main]
async fn main() {
	init_tracing();
	let opts = Opts::parse();
	let json = opts.json;
	if let Err(e) = run(opts).await.and_then(|report| report.print(json)) {
		eprintln!("{e}");
		process::exit(1);
	}
}
