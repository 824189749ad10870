use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use strata::{Player, PlayerController, ResourcePolicy, bootstrap_registry};
use strata_geom::WorldId;
use strata_runtime::{GenJob, GenRuntime, coords_within};
use strata_world::{
    ChunkCoord, World, WorldGenConfig, WorldInfo, build_generator, load_config_from_path,
};

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Voxel world generation and material tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the chunks around spawn in parallel and load them into a world.
    Pregen {
        /// Worldgen config; built-in flat defaults when omitted
        #[arg(long)]
        worldgen: Option<PathBuf>,
        /// Extra materials registered after the builtins
        #[arg(long)]
        materials: Option<PathBuf>,
        /// Chunk radius around the spawn chunk
        #[arg(long, default_value_t = 2)]
        radius: i32,
        /// Worker threads (defaults to available parallelism)
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Print the properties of one material.
    Inspect {
        #[arg(long)]
        name: String,
        #[arg(long)]
        materials: Option<PathBuf>,
    },
}

fn pregen(
    worldgen: Option<PathBuf>,
    materials: Option<PathBuf>,
    radius: i32,
    workers: Option<usize>,
) -> Result<bool, Box<dyn Error>> {
    let (reg, _) = bootstrap_registry(materials.as_deref())?;
    let reg = strata_blocks::install(reg)?;
    let cfg = match worldgen.as_deref() {
        Some(path) => load_config_from_path(path)?,
        None => WorldGenConfig::default(),
    };
    let dims = cfg.chunk_dims();
    let generator = build_generator(&cfg, &reg)?;
    let mut world = World::new(
        WorldInfo::new(WorldId(0), "world", cfg.seed),
        Arc::clone(&generator),
        Arc::clone(&reg),
        dims,
    )
    .with_update_budget(cfg.update_budget);

    let workers = workers
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1);
    let rt = GenRuntime::new(generator, dims, workers)?;

    let spawn = world.spawn().position.pos;
    let center = ChunkCoord::containing(
        spawn.x.floor() as i32,
        spawn.y.floor() as i32,
        spawn.z.floor() as i32,
        dims,
    );
    let coords = coords_within(center, radius);
    let t0 = Instant::now();
    for (i, coord) in coords.iter().enumerate() {
        rt.submit(GenJob {
            coord: *coord,
            job_id: i as u64,
        });
    }
    let results = rt.wait_all(coords.len(), Duration::from_secs(60));

    let mut failed = coords.len().saturating_sub(results.len());
    let mut t_gen_us: u64 = 0;
    for out in results {
        t_gen_us += u64::from(out.t_gen_us);
        match out.result {
            Ok(buf) => {
                world.insert_chunk(out.coord, buf);
            }
            Err(e) => {
                log::error!("{}", e);
                failed += 1;
            }
        }
    }
    log::info!(
        "generated {} chunks around {:?} on {} workers in {:?} ({} ms worker time, {} failed)",
        world.loaded_chunks(),
        center,
        rt.workers(),
        t0.elapsed(),
        t_gen_us / 1000,
        failed
    );

    let stats = world.tick();
    log::info!(
        "first tick: {} updates, {} deferred",
        stats.processed,
        stats.deferred
    );

    let mut controller = PlayerController::new(
        Player::new("player", world.spawn()),
        ResourcePolicy::Infinite,
    );
    controller.spawn_into(&world);
    log::info!(
        "player spawns at {:?}",
        controller.player().transform.position.pos
    );
    Ok(failed == 0)
}

fn inspect(name: &str, materials: Option<PathBuf>) -> Result<bool, Box<dyn Error>> {
    let (reg, _) = bootstrap_registry(materials.as_deref())?;
    let Some(m) = reg.get_by_name(name) else {
        log::error!("no material named `{}`", name);
        return Ok(false);
    };
    println!("{} (id {})", m.name(), m.id().raw());
    if let Some(parent) = m.parent() {
        println!("  subtype of {:?}, data {}", parent, m.data().unwrap_or(0));
    }
    if let Some(item) = m.as_item() {
        println!("  item, max stack {}", item.max_stack);
    }
    if let Some(b) = m.as_block() {
        let area = b.bounding_area();
        println!("  behavior    {:?}", b.behavior());
        println!("  hardness    {}", b.hardness());
        println!("  friction    {}", b.friction());
        println!("  opacity     {}", b.opacity());
        println!("  light       {}", b.light_level());
        println!("  bounds      {:?} .. {:?}", area.min, area.max);
        println!(
            "  liquid {} / obstacle {} / physics {}",
            b.is_liquid(),
            b.is_placement_obstacle(),
            b.has_physics()
        );
    }
    Ok(true)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let res = match cli.command {
        Command::Pregen {
            worldgen,
            materials,
            radius,
            workers,
        } => pregen(worldgen, materials, radius, workers),
        Command::Inspect { name, materials } => inspect(&name, materials),
    };
    match res {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
