use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

use tewgen::config::{CountryTable, Settings};
use tewgen::cores::{CoreEdit, edit_cores};
use tewgen::cosmetic::{self, CosmeticOptions};
use tewgen::dump::{DumpKind, dump};
use tewgen::{flags, refresh};

#[derive(Parser)]
#[command(name = "tewgen")]
#[command(version, about = "Generate country content for The Empty World", long_about = None)]
struct Cli {
    /// Root of the mod being generated
    #[arg(long, env = "TEW_MOD_PATH", global = true)]
    mod_path: Option<PathBuf>,

    /// Hearts of Iron IV installation (auto-detected if not provided)
    #[arg(long, env = "HOI4_PATH", global = true)]
    game_path: Option<PathBuf>,

    /// Country table to use instead of the built-in one
    #[arg(long, global = true)]
    countries: Option<PathBuf>,

    /// Seed for generated colors, for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate country files and both flag sizes (default)
    All,
    /// Regenerate country tags, names, colors, ideas and effects
    Countries,
    /// Regenerate small and medium flags from gfx/flags
    Flags,
    /// Generate per-ideology cosmetic tags for the game's countries
    Cosmetic {
        /// Prefix of the generated tags and files
        #[arg(long, default_value = cosmetic::DEFAULT_PREFIX)]
        prefix: String,
        /// Localisation language to read names from and write
        #[arg(long, default_value = "simp_chinese")]
        language: String,
        /// Mod to write into (default: --mod-path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add or remove cores in history/states
    Cores {
        /// Only states cored by one of these tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        if_core: Vec<String>,
        /// Only states whose first province is on this continent
        #[arg(long)]
        continent: Option<u32>,
        /// Cores to add (comma-separated)
        #[arg(long, value_delimiter = ',')]
        add: Vec<String>,
        /// Tags to remove from cores and claims (comma-separated)
        #[arg(long, value_delimiter = ',')]
        remove: Vec<String>,
        /// Report the files that would change without writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print parsed data as JSON
    Dump {
        kind: DumpKind,
        /// Read from the game installation instead of the mod
        #[arg(long)]
        game: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let command = cli.command.unwrap_or(Commands::All);
    let settings = Settings::resolve(cli.mod_path, cli.game_path);

    match command {
        Commands::All => {
            let table = CountryTable::load_or_embedded(cli.countries.as_deref())?;
            let mod_root = settings.mod_root()?;
            let (countries, flag_sizes) = rayon::join(
                || refresh::refresh_countries(mod_root, &table, &mut rng),
                || flags::regenerate_all(mod_root),
            );
            countries?;
            flag_sizes?;
        }
        Commands::Countries => {
            let table = CountryTable::load_or_embedded(cli.countries.as_deref())?;
            refresh::refresh_countries(settings.mod_root()?, &table, &mut rng)?;
        }
        Commands::Flags => flags::regenerate_all(settings.mod_root()?)?,
        Commands::Cosmetic {
            prefix,
            language,
            output,
        } => {
            let out_root = match output {
                Some(path) => path,
                None => settings.mod_root()?.to_path_buf(),
            };
            let options = CosmeticOptions { prefix, language };
            cosmetic::generate(settings.game_root()?, &out_root, &options, &mut rng)?;
        }
        Commands::Cores {
            if_core,
            continent,
            add,
            remove,
            dry_run,
        } => {
            let edit = CoreEdit {
                if_core,
                continent,
                add,
                remove,
                dry_run,
            };
            for path in edit_cores(settings.mod_root()?, &edit)? {
                println!("{}", path.display());
            }
        }
        Commands::Dump { kind, game } => {
            let root = if game {
                settings.game_root()?
            } else {
                settings.mod_root()?
            };
            dump(root, kind, &mut std::io::stdout().lock())?;
        }
    }

    log::info!("done");
    Ok(())
}
