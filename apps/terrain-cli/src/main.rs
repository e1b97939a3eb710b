use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use terrain_common::{BiomeId, HostContext, WorldName, check_path_component};
use terrain_kernel::{BiomeIdRegistry, ClientLoad, RuntimeWorld, WorldLoader};
use terrain_persist::{BiomeConfig, FileConfigProvider, WorldConfigs, write_client_sync};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "terrain-cli", about = "CLI tool for terrain world configs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding `worlds/<name>/` config folders
    #[arg(short, long, default_value = ".")]
    configs_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Create a world config directory
    Init {
        world: String,
        /// Custom biome as NAME=ID, repeatable
        #[arg(short, long = "biome")]
        biomes: Vec<String>,
    },
    /// Show a world's custom biomes and the ids they claim
    Inspect { world: String },
    /// Write the client sync packet for a world
    Pack {
        world: String,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Load a client sync packet as a client would
    Unpack { packet: PathBuf },
    /// Run a full load/unload session against a fresh biome id registry
    Session {
        world: String,
        /// Simulate an integrated (non-dedicated) host
        #[arg(long)]
        integrated: bool,
    },
}

/// Stand-in for the host's live world object.
struct SessionWorld {
    name: String,
}

impl RuntimeWorld for SessionWorld {
    fn name(&self) -> &str {
        &self.name
    }
}

/// What a lifecycle session did to the registry.
#[derive(Debug, PartialEq, Eq)]
struct SessionReport {
    pre_registered: bool,
    claimed_after_load: BTreeSet<BiomeId>,
    released: BTreeSet<BiomeId>,
    claimed_after_unload: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("terrain-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", terrain_common::crate_info());
            println!("kernel: {}", terrain_kernel::crate_info());
            println!("persist: {}", terrain_persist::crate_info());
        }
        Commands::Init { world, biomes } => {
            let dir = init_world(&cli.configs_root, &world, &biomes)?;
            println!("Created {}", dir.display());
        }
        Commands::Inspect { world } => {
            let configs = read_world(&cli.configs_root, &world)?;
            println!(
                "World \"{world}\": mode={:?}, height_bits={}",
                configs.world.biome_mode, configs.world.world_height_bits
            );
            for (name, id) in &configs.world.custom_biomes {
                let detail = configs
                    .biome(name)
                    .map(|b| format!("temp={}, rain={}", b.temperature, b.rainfall))
                    .unwrap_or_else(|| "no biome file".into());
                println!("  {:>5}  {name} ({detail})", id.0);
            }
        }
        Commands::Pack { world, out } => {
            let name = WorldName::new(world.as_str())?;
            let configs = read_world(&cli.configs_root, &world)?;
            let file = std::fs::File::create(&out)
                .with_context(|| format!("creating {}", out.display()))?;
            let mut writer = BufWriter::new(file);
            write_client_sync(&mut writer, &name, &configs)?;
            writer.flush()?;
            info!(world = %name, out = %out.display(), "wrote client sync packet");
        }
        Commands::Unpack { packet } => {
            let file = std::fs::File::open(&packet)
                .with_context(|| format!("opening {}", packet.display()))?;
            let mut loader =
                WorldLoader::new(&cli.configs_root, FileConfigProvider::new(), BiomeIdRegistry::new())?;
            let world: Arc<dyn RuntimeWorld> = Arc::new(SessionWorld {
                name: "client".into(),
            });
            match loader.demand_client_load(&mut BufReader::new(file), &world)? {
                ClientLoad::Installed(name) => {
                    let ids = loader
                        .active_handle()
                        .map(|h| h.claimed_identifiers())
                        .unwrap_or_default();
                    println!("Loaded \"{name}\", claimed ids: {}", format_ids(&ids));
                }
                ClientLoad::Ignored(name) => println!("Ignored \"{name}\""),
            }
            loader.on_disconnect();
        }
        Commands::Session { world, integrated } => {
            let report = run_session(&cli.configs_root, &world, !integrated)?;
            println!("Pre-registered: {}", report.pre_registered);
            println!("Claimed after load: {}", format_ids(&report.claimed_after_load));
            println!("Released: {}", format_ids(&report.released));
            println!("Claimed after unload: {}", report.claimed_after_unload);
        }
    }

    Ok(())
}

/// Parse a `NAME=ID` biome argument.
fn parse_biome_arg(arg: &str) -> anyhow::Result<(String, BiomeId)> {
    let Some((name, id)) = arg.rsplit_once('=') else {
        bail!("expected NAME=ID, got {arg:?}");
    };
    let name = name.trim();
    check_path_component(name).with_context(|| format!("invalid biome name in {arg:?}"))?;
    let id: u32 = id
        .trim()
        .parse()
        .with_context(|| format!("invalid biome id in {arg:?}"))?;
    Ok((name.to_owned(), BiomeId(id)))
}

fn world_dir(configs_root: &Path, world: &str) -> anyhow::Result<PathBuf> {
    let name = WorldName::new(world)?;
    Ok(configs_root.join("worlds").join(name.as_str()))
}

fn init_world(configs_root: &Path, world: &str, biomes: &[String]) -> anyhow::Result<PathBuf> {
    let dir = world_dir(configs_root, world)?;
    let mut configs = WorldConfigs::default();
    for arg in biomes {
        let (name, id) = parse_biome_arg(arg)?;
        configs.world.custom_biomes.insert(name.clone(), id);
        configs.biomes.insert(
            name.clone(),
            BiomeConfig {
                name,
                ..BiomeConfig::default()
            },
        );
    }
    if let Err(message) = configs.validate() {
        bail!(message);
    }
    FileConfigProvider::new().write_directory(&dir, &configs)?;
    Ok(dir)
}

fn read_world(configs_root: &Path, world: &str) -> anyhow::Result<WorldConfigs> {
    let dir = world_dir(configs_root, world)?;
    if !dir.is_dir() {
        bail!("no config directory at {}", dir.display());
    }
    Ok(FileConfigProvider::new().read_directory(&dir)?)
}

/// Drive the loader the way a host would: pre-registration, demand load,
/// shutdown.
fn run_session(configs_root: &Path, world: &str, dedicated: bool) -> anyhow::Result<SessionReport> {
    let mut loader =
        WorldLoader::new(configs_root, FileConfigProvider::new(), BiomeIdRegistry::new())?;
    let host = HostContext {
        is_dedicated_mode: dedicated,
        session_folder_name: world.to_owned(),
    };
    let pre_registered = loader.on_pre_registration(&host)?.is_some();

    let runtime: Arc<dyn RuntimeWorld> = Arc::new(SessionWorld {
        name: world.to_owned(),
    });
    loader.demand_load(&runtime)?;
    let claimed_after_load = loader.registry().claimed();

    let released = loader.on_shutdown().unwrap_or_default();
    Ok(SessionReport {
        pre_registered,
        claimed_after_load,
        released,
        claimed_after_unload: loader.registry().claimed_count(),
    })
}

fn format_ids(ids: &BTreeSet<BiomeId>) -> String {
    let ids: Vec<String> = ids.iter().map(|id| id.0.to_string()).collect();
    format!("{{{}}}", ids.join(", "))
}
