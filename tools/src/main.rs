//! sim-runner: headless runner for the mycelial colony simulation.
//!
//! Usage:
//!   sim-runner --seed 12345 --ticks 600 --db colony.db
//!   sim-runner --config data/sim_config.json --ticks 60 --realtime
//!   sim-runner --db colony.db --ipc-mode

use anyhow::Result;
use mycelium_core::{
    autosave::{export_save, import_save, restore_on_startup, Autosaver},
    command::PlayerCommand,
    config::SimConfig,
    driver::PeriodicDriver,
    engine::SimEngine,
    error::SimError,
    event::SimEvent,
    notice::Notice,
    numbers::{format_number, percent_from_fraction},
    resources::ResourcePool,
    stats::GameStats,
    store::SaveStore,
    types::{Millis, Tick},
    upgrades::GameUpgrades,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick {
        count: u64,
    },
    Command {
        cmd: String,
    },
    Export,
    Import {
        payload: String,
    },
    Save,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    tick:               Tick,
    paused:             bool,
    resources:          ResourcePool,
    stats:              GameStats,
    upgrades:           GameUpgrades,
    node_count:         usize,
    edge_count:         usize,
    explore_cost:       f64,
    hyphae_cost:        f64,
    node_tuning_cost:   Option<f64>,
    last_saved_at:      Option<Millis>,
    events:             Vec<SimEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice:             Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export:             Option<String>,
}

/// Everything the runner drives: engine, save store, autosaver.
struct Session {
    engine:    SimEngine,
    store:     SaveStore,
    autosaver: Autosaver,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = match arg_value(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let seed = parse_arg(&args, "--seed", config.seed);
    let ticks = parse_arg(&args, "--ticks", 600u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let realtime = args.iter().any(|a| a == "--realtime");
    let db = arg_value(&args, "--db").unwrap_or(":memory:");

    if !ipc_mode {
        println!("Mycelial Empire: sim-runner");
        println!("  seed:      {seed}");
        println!("  ticks:     {ticks}");
        println!("  db:        {db}");
        println!("  realtime:  {realtime}");
        println!();
    }

    let store = SaveStore::open(db)?;
    store.migrate()?;

    let autosaver = Autosaver::new(config.autosave);
    let mut session = Session {
        engine: SimEngine::build(seed, config),
        store,
        autosaver,
    };

    if let Some(notice) = restore_on_startup(&mut session.engine, &session.store) {
        report(&notice, ipc_mode);
    }

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        if realtime {
            run_realtime(&mut session, ticks);
        } else {
            run_fast(&mut session, ticks);
        }
        if let Err(notice) = session.autosaver.save_now(&session.engine, &session.store) {
            report(&notice, false);
        }
        print_summary(&session.engine, ticks);
    }

    Ok(())
}

/// Fast-forward: every tick counts as one tick interval of simulated time
/// toward the autosave period.
fn run_fast(session: &mut Session, ticks: u64) {
    let interval = session.engine.config.tick_interval_ms as Millis;
    for _ in 0..ticks {
        if session.engine.step().is_none() {
            break;
        }
        advance_autosave(session, interval);
        session.engine.drain_events();
    }
}

/// Wall-clock pacing: one tick per tick interval until `ticks` ran.
fn run_realtime(session: &mut Session, ticks: u64) {
    let interval = session.engine.config.tick_interval_ms;
    let mut driver = PeriodicDriver::new(interval as Millis);
    let mut last = Instant::now();
    let mut ran = 0;

    while ran < ticks {
        thread::sleep(Duration::from_millis(interval));
        let now = Instant::now();
        let elapsed = now.duration_since(last).as_millis() as Millis;
        last = now;

        let due = driver.advance(elapsed).min(ticks - ran);
        ran += session.engine.run_ticks(due);
        advance_autosave(session, elapsed);
        session.engine.drain_events();

        let resources = session.engine.resources();
        println!(
            "  tick {:>5} | sugar {:>8} | water {:>8} | health {:>4}",
            session.engine.tick(),
            format_number(resources.sugar),
            format_number(resources.water),
            percent_from_fraction(session.engine.stats().network_health),
        );
    }
}

fn advance_autosave(session: &mut Session, elapsed_ms: Millis) {
    if let Some(notice) = session
        .autosaver
        .advance(&session.engine, &session.store, elapsed_ms)
    {
        report(&notice, false);
    }
}

fn run_ipc_loop(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let mut notice = None;
        let mut export = None;
        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::Tick { count } => {
                let interval = session.engine.config.tick_interval_ms as Millis;
                for _ in 0..count {
                    if session.engine.step().is_none() {
                        break;
                    }
                    if let Some(n) = session.autosaver.advance(&session.engine, &session.store, interval) {
                        notice = Some(n);
                    }
                }
            }
            IpcCommand::Command { cmd } => match handle_command(&mut session.engine, &cmd) {
                Ok(n) => notice = Some(n),
                Err(e) => {
                    log::warn!("{e}");
                    let err_json = serde_json::json!({ "error": e.to_string() });
                    writeln!(stdout, "{}", err_json)?;
                    stdout.flush()?;
                    continue;
                }
            },
            IpcCommand::Export => match export_save(&session.engine, &session.store) {
                Ok(text) => export = Some(text),
                Err(n) => notice = Some(n),
            },
            IpcCommand::Import { payload } => {
                notice = Some(import_save(&mut session.engine, &session.store, &payload));
            }
            IpcCommand::Save => {
                if let Err(n) = session.autosaver.save_now(&session.engine, &session.store) {
                    notice = Some(n);
                }
            }
        }

        let state = build_ui_state(session, notice, export);
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(engine: &mut SimEngine, cmd: &str) -> Result<Notice, SimError> {
    let command = PlayerCommand::from_name(cmd)
        .ok_or_else(|| SimError::UnknownCommand { name: cmd.to_string() })?;
    let result = engine.apply(command);
    let title = match command {
        PlayerCommand::Explore         => "Exploration",
        PlayerCommand::UpgradeHyphae   => "Hyphae upgrade",
        PlayerCommand::UpgradeBestNode => "Node tuning",
        PlayerCommand::Pause | PlayerCommand::Resume | PlayerCommand::Reset => "Simulation",
    };
    Ok(Notice::for_action(title, &result))
}

fn build_ui_state(session: &mut Session, notice: Option<Notice>, export: Option<String>) -> UiState {
    let engine = &mut session.engine;
    UiState {
        tick:             engine.tick(),
        paused:           engine.is_paused(),
        resources:        *engine.resources(),
        stats:            *engine.stats(),
        upgrades:         *engine.upgrades(),
        node_count:       engine.nodes().len(),
        edge_count:       engine.edges().len(),
        explore_cost:     engine.explore_cost(),
        hyphae_cost:      engine.hyphae_upgrade_cost(),
        node_tuning_cost: engine.node_tuning_cost(),
        last_saved_at:    session.autosaver.last_saved_at(),
        events:           engine.drain_events(),
        notice,
        export,
    }
}

fn print_summary(engine: &SimEngine, ticks: u64) {
    let resources = engine.resources();
    let stats = engine.stats();
    let upgrades = engine.upgrades();

    println!("=== RUN SUMMARY ===");
    println!("  ticks run:      {ticks}");
    println!("  final tick:     {}", engine.tick());
    println!("  nodes:          {}", engine.nodes().len());
    println!("  hyphae:         {}", engine.edges().len());
    println!("  hyphae level:   {}", upgrades.hyphae_level);
    println!();
    println!("=== RESOURCES ===");
    println!("  sugar:          {}", format_number(resources.sugar));
    println!("  water:          {}", format_number(resources.water));
    println!("  carbon:         {}", format_number(resources.carbon));
    println!("  nutrients:      {}", format_number(resources.nutrients));
    println!("  spores:         {}", format_number(resources.spores));
    println!();
    println!("=== NETWORK ===");
    println!("  net sugar/s:    {}", format_number(stats.net_sugar));
    println!("  maintenance/s:  {}", format_number(stats.maintenance));
    println!("  health:         {}", percent_from_fraction(stats.network_health));
    println!("  flow pressure:  {}", percent_from_fraction(stats.flow_pressure));
}

fn report(notice: &Notice, quiet: bool) {
    if notice.is_error() {
        log::warn!("{}: {}", notice.title, notice.description);
    } else {
        log::info!("{}: {}", notice.title, notice.description);
    }
    if !quiet {
        println!("[{}] {}", notice.title, notice.description);
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
