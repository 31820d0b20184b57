//! Command-line driver: run one decomposition step over blanket descriptors.
//!
//! ```text
//! deco --q "S0:1,2,3; S1:4; S2:5; S3:6,7,8; S4:9; S5:10;" \
//!      --i "1,2,4,5,7,9,10; 1,4,5,7,8,9,10; 2,4,5,6,9,10; 3,4,5,8,9,10;" \
//!      --g "0:1,2,5,6,10; 1:3,4,7,8,9;" --h "0:1,2,4,6,9; 1:3,5,7,8,10;"
//! ```

use clap::Parser;
use color_eyre::eyre::{bail, eyre, Result};

use deco_rs::blanket::Blanket;
use deco_rs::decompose::{self, SerialOptions};
use deco_rs::result::Joint;

#[derive(Parser)]
#[command(name = "deco", about = "One functional-decomposition step over blanket descriptors")]
struct Cli {
    /// Blanket of the variable under encoding, e.g. "S0:1,2,3; S1:4;".
    #[arg(long)]
    q: String,

    /// Binary-input blanket shared by both sub-functions (parallel only).
    #[arg(long, conflicts_with_all = ["iv", "iu"])]
    i: Option<String>,

    /// Binary-input blanket of sub-function G.
    #[arg(long)]
    iv: Option<String>,

    /// Binary-input blanket of sub-function H.
    #[arg(long)]
    iu: Option<String>,

    /// Target blanket of G; together with --h selects parallel decomposition.
    #[arg(long, requires = "h")]
    g: Option<String>,

    /// Target blanket of H.
    #[arg(long, requires = "g")]
    h: Option<String>,

    /// Target output blanket; selects serial decomposition.
    #[arg(long, conflicts_with_all = ["g", "h", "i"])]
    y: Option<String>,

    /// LUT cell input width (serial pacing).
    #[arg(long, default_value_t = 4)]
    lut_inputs: u32,

    /// Desired Qv block count, 0 = automatic (serial only).
    #[arg(long, default_value_t = 0)]
    qv_blocks: usize,

    /// Prefer a minimal G over a minimal Qu (serial only).
    #[arg(long)]
    minimize_g: bool,

    /// Log verbosity.
    #[arg(long, default_value = "warn")]
    log_level: simplelog::LevelFilter,
}

fn parse_blanket(label: &str, descriptor: &str) -> Result<Blanket> {
    Blanket::parse(descriptor)
        .ok_or_else(|| eyre!("{} is not a valid blanket descriptor: {:?}", label, descriptor))
}

fn parse_optional(label: &str, descriptor: Option<&String>) -> Result<Option<Blanket>> {
    descriptor.map(|d| parse_blanket(label, d)).transpose()
}

fn print_blanket(label: &str, blanket: Option<&Blanket>) {
    match blanket {
        Some(blanket) => println!("{:<11} {}", label, blanket),
        None => println!("{:<11} -", label),
    }
}

fn print_joint(joint: Option<&Joint>) {
    match joint {
        Some(Joint::QvWithinQu { partial }) => {
            println!("joint       Qv <= Qu");
            print_blanket("Qv partial", partial.as_ref());
        }
        Some(Joint::QuWithinQv { partial }) => {
            println!("joint       Qu <= Qv");
            print_blanket("Qu partial", partial.as_ref());
        }
        None => println!("joint       -"),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    simplelog::TermLogger::init(
        cli.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let q = parse_blanket("--q", &cli.q)?;
    let iv = parse_optional("--iv", cli.iv.as_ref())?;
    let iu = parse_optional("--iu", cli.iu.as_ref())?;

    if let Some(y) = &cli.y {
        let y = parse_blanket("--y", y)?;
        let options = SerialOptions {
            lut_inputs: cli.lut_inputs,
            qv_expected_blocks: cli.qv_blocks,
            minimize_g: cli.minimize_g,
        };
        match decompose::serial(iv.as_ref(), iu.as_ref(), &q, &y, &options) {
            Some(result) => {
                println!("serial decomposition found");
                print_blanket("Qv", Some(&result.qv));
                print_blanket("Qu", Some(&result.qu));
                print_blanket("G", Some(&result.g));
                print_joint(result.joint.as_ref());
            }
            None => println!("not decomposable under this split"),
        }
        return Ok(());
    }

    let (Some(g), Some(h)) = (&cli.g, &cli.h) else {
        bail!("either --y (serial) or --g with --h (parallel) is required");
    };
    let g = parse_blanket("--g", g)?;
    let h = parse_blanket("--h", h)?;

    let result = if cli.i.is_some() {
        let i = parse_optional("--i", cli.i.as_ref())?;
        decompose::parallel(i.as_ref(), &q, &g, &h)
    } else {
        decompose::parallel_split(iv.as_ref(), iu.as_ref(), &q, &g, &h)
    };

    match result {
        Some(result) => {
            println!("parallel decomposition found");
            print_blanket("Qv", result.qv.as_ref());
            print_blanket("Qu", result.qu.as_ref());
            print_joint(result.joint.as_ref());
            match result.g_dependency {
                Some(dependency) => println!("G depends on {}", dependency),
                None => println!("G dependency unresolved"),
            }
            match result.h_dependency {
                Some(dependency) => println!("H depends on {}", dependency),
                None => println!("H dependency unresolved"),
            }
        }
        None => println!("not decomposable under this split"),
    }

    Ok(())
}
