//! Scenario runner for the minivm sandbox.
//!
//! Runs one of the three built-in demonstrations and prints the committed
//! event log as JSON:
//!
//! ```bash
//! cargo run -p minivm -- token
//! cargo run -p minivm -- proxy
//! cargo run -p minivm -- -vv reentrancy
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use fern::colors::{Color, ColoredLevelConfig};
use log::{info, LevelFilter};
use minivm_common::{Address, Call, SlotKey};
use minivm::contracts::{AttackerCode, BankCode, CounterLogic, ProxyCode, TokenCode};
use minivm::World;

const ALICE: Address = Address::repeat(0x01);
const BOB: Address = Address::repeat(0x02);
const VICTIM: Address = Address::repeat(0x03);
const TOKEN: Address = Address::repeat(0xA0);
const LOGIC: Address = Address::repeat(0xB0);
const PROXY: Address = Address::repeat(0xB1);
const BANK: Address = Address::repeat(0xC0);
const ATTACKER: Address = Address::repeat(0xC1);

#[derive(Parser)]
#[command(name = "minivm", about = "Sequential contract sandbox demos")]
struct Args {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    scenario: Scenario,
}

#[derive(Subcommand)]
enum Scenario {
    /// Mint and move a fungible token around
    Token,
    /// Drive a counter through a delegatecall-style proxy
    Proxy,
    /// Drain a naive bank through reentrant withdrawals, then show the fix
    Reentrancy,
}

fn setup_logger(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .debug(Color::BrightBlack)
        .trace(Color::BrightBlack)
        .warn(Color::Yellow)
        .error(Color::Red);
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{}] {}: {}",
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()
        .context("logger init")?;
    Ok(())
}

fn token_scenario() -> Result<World> {
    let mut world = World::new();
    world.deploy(
        TOKEN,
        TokenCode::new("Demo Token", "DEMO", 18),
        TokenCode::initial_storage(ALICE),
    )?;

    world.transact(ALICE, TOKEN, &Call::Mint { to: ALICE, amount: 1_000 }, 0)?;
    world.transact(ALICE, TOKEN, &Call::Transfer { to: BOB, amount: 250 }, 0)?;
    world.transact(BOB, TOKEN, &Call::Approve { spender: ALICE, amount: 100 }, 0)?;
    world.transact(
        ALICE,
        TOKEN,
        &Call::TransferFrom { from: BOB, to: VICTIM, amount: 60 },
        0,
    )?;

    for account in [ALICE, BOB, VICTIM] {
        let balance = world
            .transact(account, TOKEN, &Call::BalanceOf(account), 0)?
            .as_amount()
            .unwrap_or(0);
        info!("balance of {}: {}", account, balance);
    }
    Ok(world)
}

fn proxy_scenario() -> Result<World> {
    let mut world = World::new();
    world.deploy(LOGIC, CounterLogic, Default::default())?;
    world.deploy(PROXY, ProxyCode, ProxyCode::initial_storage(ALICE, LOGIC))?;

    for _ in 0..3 {
        world.transact(BOB, PROXY, &Call::Increment, 0)?;
    }
    let through_proxy = world.transact(BOB, PROXY, &Call::CounterValue, 0)?;
    let direct = world.transact(BOB, LOGIC, &Call::CounterValue, 0)?;
    info!(
        "counter through proxy: {:?}, logic's own counter: {:?}",
        through_proxy, direct
    );
    Ok(world)
}

fn reentrancy_scenario() -> Result<World> {
    let mut world = World::new();
    world.deploy(BANK, BankCode::vulnerable(), Default::default())?;
    world.deploy(ATTACKER, AttackerCode, AttackerCode::initial_storage(BANK))?;
    world.fund(VICTIM, 10)?;
    world.fund(ALICE, 1)?;

    world.transact(VICTIM, BANK, &Call::Deposit, 10)?;
    info!("victim deposited 10, bank holds {}", world.balance(&BANK));

    world.transact(ALICE, ATTACKER, &Call::Attack { amount: 1 }, 1)?;
    let reentries = world
        .slot(&ATTACKER, &SlotKey::ReentrySuccesses)
        .and_then(|v| v.amount())
        .unwrap_or(0);
    info!(
        "after attack: bank holds {}, attacker holds {}, successful reentries {}",
        world.balance(&BANK),
        world.balance(&ATTACKER),
        reentries
    );
    info!(
        "victim's recorded balance is still {:?} but the value backing it is gone",
        world.slot(&BANK, &SlotKey::Balance(VICTIM))
    );
    Ok(world)
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logger(args.verbose)?;

    let world = match args.scenario {
        Scenario::Token => token_scenario()?,
        Scenario::Proxy => proxy_scenario()?,
        Scenario::Reentrancy => reentrancy_scenario()?,
    };

    println!("{}", serde_json::to_string_pretty(world.events())?);
    Ok(())
}
